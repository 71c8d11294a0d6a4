//! The filters for listing a user's transactions.

use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{CategoryId, Error, TransactionKind};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Which of the user's transactions to list.
///
/// A field set to `None` places no constraint on the listing, so the default
/// filter matches every transaction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransactionFilter {
    /// Only list income or only list expenses.
    pub kind: Option<TransactionKind>,
    /// Only list transactions in this category.
    pub category_id: Option<CategoryId>,
    /// Only list transactions on or after this date.
    pub start_date: Option<Date>,
    /// Only list transactions on or before this date.
    pub end_date: Option<Date>,
}

/// The raw query string parameters for [TransactionFilter].
///
/// Empty strings are treated the same as a missing parameter.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionFilterParams {
    /// "income" or "expense".
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// A category ID.
    pub category: Option<String>,
    /// An ISO date, `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// An ISO date, `YYYY-MM-DD`.
    pub end_date: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn parse_date(field: &'static str, value: Option<String>) -> Result<Option<Date>, Error> {
    non_empty(value)
        .map(|value| {
            Date::parse(value.trim(), DATE_FORMAT).map_err(|_| Error::InvalidFilter(field, value))
        })
        .transpose()
}

impl TryFrom<TransactionFilterParams> for TransactionFilter {
    type Error = Error;

    fn try_from(params: TransactionFilterParams) -> Result<Self, Self::Error> {
        let kind = non_empty(params.kind)
            .map(|kind| {
                kind.trim()
                    .parse()
                    .map_err(|_| Error::InvalidFilter("type", kind))
            })
            .transpose()?;

        let category_id = non_empty(params.category)
            .map(|category| {
                category
                    .trim()
                    .parse()
                    .map_err(|_| Error::InvalidFilter("category", category))
            })
            .transpose()?;

        let start_date = parse_date("start_date", params.start_date)?;
        let end_date = parse_date("end_date", params.end_date)?;

        match (start_date, end_date) {
            (Some(start), Some(end)) if start > end => {
                return Err(Error::InvalidDateRange(start, end));
            }
            _ => {}
        }

        Ok(Self {
            kind,
            category_id,
            start_date,
            end_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{Error, TransactionKind};

    use super::{TransactionFilter, TransactionFilterParams};

    fn params(
        kind: Option<&str>,
        category: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> TransactionFilterParams {
        TransactionFilterParams {
            kind: kind.map(str::to_owned),
            category: category.map(str::to_owned),
            start_date: start_date.map(str::to_owned),
            end_date: end_date.map(str::to_owned),
        }
    }

    #[test]
    fn missing_and_empty_params_are_no_filter() {
        let missing = TransactionFilter::try_from(TransactionFilterParams::default());
        let empty = TransactionFilter::try_from(params(Some(""), Some(""), Some(""), Some(" ")));

        assert_eq!(missing, Ok(TransactionFilter::default()));
        assert_eq!(empty, Ok(TransactionFilter::default()));
    }

    #[test]
    fn parses_every_field() {
        let got = TransactionFilter::try_from(params(
            Some("expense"),
            Some("3"),
            Some("2024-03-01"),
            Some("2024-03-31"),
        ));

        assert_eq!(
            got,
            Ok(TransactionFilter {
                kind: Some(TransactionKind::Expense),
                category_id: Some(3),
                start_date: Some(date!(2024 - 03 - 01)),
                end_date: Some(date!(2024 - 03 - 31)),
            })
        );
    }

    #[test]
    fn malformed_values_name_the_field() {
        let cases = [
            (params(Some("transfer"), None, None, None), "type", "transfer"),
            (params(None, Some("food"), None, None), "category", "food"),
            (params(None, None, Some("2024-13-01"), None), "start_date", "2024-13-01"),
            (params(None, None, None, Some("01/03/2024")), "end_date", "01/03/2024"),
        ];

        for (params, field, value) in cases {
            assert_eq!(
                TransactionFilter::try_from(params),
                Err(Error::InvalidFilter(field, value.to_owned()))
            );
        }
    }

    #[test]
    fn start_after_end_is_invalid_range() {
        let got = TransactionFilter::try_from(params(
            None,
            None,
            Some("2024-03-02"),
            Some("2024-03-01"),
        ));

        assert_eq!(
            got,
            Err(Error::InvalidDateRange(date!(2024 - 03 - 02), date!(2024 - 03 - 01)))
        );
    }

    #[test]
    fn single_day_range_is_valid() {
        let got = TransactionFilter::try_from(params(
            None,
            None,
            Some("2024-03-01"),
            Some("2024-03-01"),
        ));

        assert!(got.is_ok());
    }
}
