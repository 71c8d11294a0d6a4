//! The source of the current date and time.
//!
//! Reports default to "the current month", so handlers never read the wall
//! clock directly. They go through a [Clock] stored in the app state, which
//! tests replace with a [FixedClock].

use std::fmt::Debug;

use time::{Date, OffsetDateTime};

use crate::{Error, timezone::get_local_offset};

/// A source of the current local date and time.
pub trait Clock: Send + Sync + Debug {
    /// The current date and time in the user's local timezone.
    ///
    /// # Errors
    /// Returns an error if the local timezone cannot be resolved.
    fn now(&self) -> Result<OffsetDateTime, Error>;

    /// Today's date in the user's local timezone.
    ///
    /// # Errors
    /// Returns an error if the local timezone cannot be resolved.
    fn today(&self) -> Result<Date, Error> {
        self.now().map(|now| now.date())
    }
}

/// Reads the system clock and shifts it into a canonical timezone.
#[derive(Debug, Clone)]
pub struct SystemClock {
    local_timezone: String,
}

impl SystemClock {
    /// Create a clock for a canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if the timezone name is not recognised.
    pub fn new(local_timezone: &str) -> Result<Self, Error> {
        match get_local_offset(local_timezone) {
            Some(_) => Ok(Self {
                local_timezone: local_timezone.to_owned(),
            }),
            None => Err(Error::InvalidTimezoneError(local_timezone.to_owned())),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Result<OffsetDateTime, Error> {
        // The offset is looked up on every call so that daylight saving changes are picked up.
        let offset = get_local_offset(&self.local_timezone).ok_or_else(|| {
            tracing::error!("Invalid timezone {}", self.local_timezone);
            Error::InvalidTimezoneError(self.local_timezone.clone())
        })?;

        Ok(OffsetDateTime::now_utc().to_offset(offset))
    }
}

/// A clock that always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> Result<OffsetDateTime, Error> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use crate::{Clock, Error, FixedClock, SystemClock};

    #[test]
    fn fixed_clock_returns_pinned_date() {
        let clock = FixedClock(datetime!(2024-03-05 23:30:00 +13:00));

        assert_eq!(clock.today(), Ok(date!(2024 - 03 - 05)));
    }

    #[test]
    fn system_clock_rejects_unknown_timezone() {
        let result = SystemClock::new("Middle/Earth");

        assert!(matches!(result, Err(Error::InvalidTimezoneError(name)) if name == "Middle/Earth"));
    }

    #[test]
    fn system_clock_accepts_canonical_timezone() {
        let clock = SystemClock::new("Pacific/Auckland").unwrap();

        assert!(clock.now().is_ok());
    }
}
