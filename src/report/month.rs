//! The calendar month key used to group and select transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::Date;

use crate::{Clock, Error};

/// A calendar month, written as `YYYY-MM`.
///
/// Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u8,
}

impl YearMonth {
    /// Create a month key.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if `year` is not a four digit year or
    /// `month` is not in 1..=12.
    pub fn new(year: i32, month: u8) -> Result<Self, Error> {
        if !(0..=9999).contains(&year) || !(1..=12).contains(&month) {
            return Err(Error::InvalidMonth(format!("{year:04}-{month:02}")));
        }

        Ok(Self { year, month })
    }

    /// The month that `date` falls in.
    pub fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            month: u8::from(date.month()),
        }
    }

    /// The current month in the clock's local timezone.
    ///
    /// # Errors
    /// Returns an error if the clock cannot resolve the local time.
    pub fn current(clock: &dyn Clock) -> Result<Self, Error> {
        clock.today().map(Self::from_date)
    }

    /// The year, e.g. 2024.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month of the year, 1 for January through 12 for December.
    pub fn month(&self) -> u8 {
        self.month
    }
}

/// Use `month` if given, otherwise fall back to the current month of `clock`.
pub(crate) fn resolve_month(
    month: Option<YearMonth>,
    clock: &dyn Clock,
) -> Result<YearMonth, Error> {
    match month {
        Some(month) => Ok(month),
        None => YearMonth::current(clock),
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidMonth(s.to_owned());

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;

        if year.len() != 4
            || month.len() != 2
            || !year.bytes().all(|b| b.is_ascii_digit())
            || !month.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;

        Self::new(year, month).map_err(|_| invalid())
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;

        text.parse().map_err(serde::de::Error::custom)
    }
}

impl ToSql for YearMonth {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for YearMonth {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use crate::{Error, FixedClock};

    use super::{YearMonth, resolve_month};

    #[test]
    fn parses_year_month() {
        let month: YearMonth = "2024-03".parse().unwrap();

        assert_eq!(month.year(), 2024);
        assert_eq!(month.month(), 3);
        assert_eq!(month.to_string(), "2024-03");
    }

    #[test]
    fn rejects_malformed_months() {
        for text in [
            "",
            "2024",
            "2024-3",
            "24-03",
            "2024-13",
            "2024-00",
            "2024-03-01",
            "abcd-ef",
            "+024-03",
        ] {
            assert_eq!(
                text.parse::<YearMonth>(),
                Err(Error::InvalidMonth(text.to_owned())),
                "want invalid month for {text:?}"
            );
        }
    }

    #[test]
    fn orders_chronologically() {
        let mut months: Vec<YearMonth> = ["2024-02", "2023-12", "2024-10"]
            .iter()
            .map(|text| text.parse().unwrap())
            .collect();

        months.sort();

        let got: Vec<String> = months.iter().map(ToString::to_string).collect();
        assert_eq!(got, ["2023-12", "2024-02", "2024-10"]);
    }

    #[test]
    fn from_date_drops_the_day() {
        assert_eq!(
            YearMonth::from_date(date!(2024 - 03 - 31)),
            "2024-03".parse().unwrap()
        );
    }

    #[test]
    fn resolve_month_defaults_to_clock_month() {
        let clock = FixedClock(datetime!(2025-01-31 23:59:59 +13:00));

        let explicit = resolve_month(Some("2024-03".parse().unwrap()), &clock);
        let current = resolve_month(None, &clock);

        assert_eq!(explicit, Ok("2024-03".parse().unwrap()));
        assert_eq!(current, Ok("2025-01".parse().unwrap()));
    }

    #[test]
    fn serializes_as_string() {
        let month: YearMonth = "2024-03".parse().unwrap();

        assert_eq!(serde_json::to_string(&month).unwrap(), "\"2024-03\"");
        assert_eq!(
            serde_json::from_str::<YearMonth>("\"2024-03\"").unwrap(),
            month
        );
    }
}
