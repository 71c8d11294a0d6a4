//! Income and expense totals per month and across all time.

use rusqlite::Connection;
use serde::Serialize;

use crate::{Error, UserID, report::YearMonth};

/// The sum of income and expenses over some period.
///
/// Sums default to zero when there are no transactions in the period.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Totals {
    income: f64,
    expense: f64,
    net: f64,
}

impl Totals {
    /// Create totals from the income and expense sums, deriving the net amount.
    pub fn new(income: f64, expense: f64) -> Self {
        Self {
            income,
            expense,
            net: income - expense,
        }
    }

    /// The total amount earned.
    pub fn income(&self) -> f64 {
        self.income
    }

    /// The total amount spent.
    pub fn expense(&self) -> f64 {
        self.expense
    }

    /// Income minus expenses, negative when more was spent than earned.
    pub fn net(&self) -> f64 {
        self.net
    }
}

/// The totals for one month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyTotals {
    /// The month the totals cover.
    pub month: YearMonth,
    /// Income, expense and net for the month.
    #[serde(flatten)]
    pub totals: Totals,
}

const SUM_BY_KIND: &str = "COALESCE(SUM(CASE WHEN kind = 'income' THEN amount END), 0.0), \
    COALESCE(SUM(CASE WHEN kind = 'expense' THEN amount END), 0.0)";

/// Sum the user's income and expenses for the transactions dated in `month`.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn monthly_totals(
    user_id: UserID,
    month: YearMonth,
    connection: &Connection,
) -> Result<Totals, Error> {
    let totals = connection
        .prepare(&format!(
            "SELECT {SUM_BY_KIND} FROM \"transaction\"
             WHERE user_id = ?1 AND strftime('%Y-%m', date) = ?2"
        ))?
        .query_row((user_id.as_i64(), month), |row| {
            Ok(Totals::new(row.get(0)?, row.get(1)?))
        })?;

    Ok(totals)
}

/// Sum all of the user's income and expenses.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn overall_totals(user_id: UserID, connection: &Connection) -> Result<Totals, Error> {
    let totals = connection
        .prepare(&format!(
            "SELECT {SUM_BY_KIND} FROM \"transaction\" WHERE user_id = ?1"
        ))?
        .query_row([user_id.as_i64()], |row| {
            Ok(Totals::new(row.get(0)?, row.get(1)?))
        })?;

    Ok(totals)
}

/// The months that have at least one of the user's transactions, most recent first.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn distinct_months(user_id: UserID, connection: &Connection) -> Result<Vec<YearMonth>, Error> {
    connection
        .prepare(
            "SELECT DISTINCT strftime('%Y-%m', date) AS month FROM \"transaction\"
             WHERE user_id = ?1
             ORDER BY month DESC",
        )?
        .query_map([user_id.as_i64()], |row| row.get(0))?
        .map(|month_result| month_result.map_err(Error::SqlError))
        .collect()
}

/// The totals for every month that has at least one of the user's
/// transactions, most recent first.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn monthly_breakdown(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<MonthlyTotals>, Error> {
    connection
        .prepare(&format!(
            "SELECT strftime('%Y-%m', date) AS month, {SUM_BY_KIND} FROM \"transaction\"
             WHERE user_id = ?1
             GROUP BY month
             ORDER BY month DESC"
        ))?
        .query_map([user_id.as_i64()], |row| {
            Ok(MonthlyTotals {
                month: row.get(0)?,
                totals: Totals::new(row.get(1)?, row.get(2)?),
            })
        })?
        .map(|totals_result| totals_result.map_err(Error::SqlError))
        .collect()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        TransactionKind, delete_category,
        report::YearMonth,
        test_utils::{
            create_test_category, create_test_transaction, create_test_user, get_test_connection,
        },
    };

    use super::{Totals, distinct_months, monthly_breakdown, monthly_totals, overall_totals};

    fn month(text: &str) -> YearMonth {
        text.parse().unwrap()
    }

    #[test]
    fn totals_are_zero_without_transactions() {
        let conn = get_test_connection();
        let user = create_test_user("a@example.com", &conn);

        assert_eq!(
            monthly_totals(user.id, month("2024-03"), &conn),
            Ok(Totals::new(0.0, 0.0))
        );
        assert_eq!(overall_totals(user.id, &conn), Ok(Totals::new(0.0, 0.0)));
        assert_eq!(distinct_months(user.id, &conn), Ok(vec![]));
        assert_eq!(monthly_breakdown(user.id, &conn), Ok(vec![]));
    }

    #[test]
    fn monthly_totals_only_counts_the_month() {
        let conn = get_test_connection();
        let user = create_test_user("a@example.com", &conn);
        let salary = create_test_category("Salary", user.id, &conn);
        let food = create_test_category("Food", user.id, &conn);
        create_test_transaction(
            100.0,
            TransactionKind::Income,
            &salary,
            date!(2024 - 03 - 01),
            &conn,
        );
        create_test_transaction(
            40.0,
            TransactionKind::Expense,
            &food,
            date!(2024 - 03 - 05),
            &conn,
        );
        create_test_transaction(
            10.0,
            TransactionKind::Expense,
            &food,
            date!(2024 - 02 - 01),
            &conn,
        );
        create_test_transaction(
            5.0,
            TransactionKind::Expense,
            &food,
            date!(2024 - 03 - 31),
            &conn,
        );

        let got = monthly_totals(user.id, month("2024-03"), &conn).unwrap();

        assert_eq!(got, Totals::new(100.0, 45.0));
        assert_eq!(got.net(), 55.0);
    }

    #[test]
    fn net_may_be_negative() {
        let conn = get_test_connection();
        let user = create_test_user("a@example.com", &conn);
        let food = create_test_category("Food", user.id, &conn);
        create_test_transaction(
            25.5,
            TransactionKind::Expense,
            &food,
            date!(2024 - 03 - 05),
            &conn,
        );

        let got = overall_totals(user.id, &conn).unwrap();

        assert_eq!(got.income(), 0.0);
        assert_eq!(got.expense(), 25.5);
        assert_eq!(got.net(), -25.5);
    }

    #[test]
    fn distinct_months_are_unique_and_descending() {
        let conn = get_test_connection();
        let user = create_test_user("a@example.com", &conn);
        let food = create_test_category("Food", user.id, &conn);
        for date in [
            date!(2024 - 02 - 01),
            date!(2023 - 12 - 24),
            date!(2024 - 03 - 05),
            date!(2024 - 02 - 28),
        ] {
            create_test_transaction(1.0, TransactionKind::Expense, &food, date, &conn);
        }

        let got = distinct_months(user.id, &conn).unwrap();

        assert_eq!(got, vec![month("2024-03"), month("2024-02"), month("2023-12")]);
    }

    #[test]
    fn breakdown_nets_sum_to_overall_net() {
        let conn = get_test_connection();
        let user = create_test_user("a@example.com", &conn);
        let salary = create_test_category("Salary", user.id, &conn);
        let food = create_test_category("Food", user.id, &conn);
        create_test_transaction(
            100.0,
            TransactionKind::Income,
            &salary,
            date!(2024 - 03 - 01),
            &conn,
        );
        create_test_transaction(
            40.0,
            TransactionKind::Expense,
            &food,
            date!(2024 - 03 - 05),
            &conn,
        );
        create_test_transaction(
            10.0,
            TransactionKind::Expense,
            &food,
            date!(2024 - 02 - 01),
            &conn,
        );
        create_test_transaction(
            80.0,
            TransactionKind::Income,
            &salary,
            date!(2024 - 01 - 15),
            &conn,
        );

        let breakdown = monthly_breakdown(user.id, &conn).unwrap();
        let overall = overall_totals(user.id, &conn).unwrap();

        let months: Vec<YearMonth> = breakdown.iter().map(|totals| totals.month).collect();
        assert_eq!(months, vec![month("2024-03"), month("2024-02"), month("2024-01")]);
        assert_eq!(breakdown[0].totals, Totals::new(100.0, 40.0));
        assert_eq!(breakdown[1].totals, Totals::new(0.0, 10.0));
        let net_sum: f64 = breakdown.iter().map(|totals| totals.totals.net()).sum();
        assert_eq!(net_sum, overall.net());
    }

    #[test]
    fn totals_ignore_other_users() {
        let conn = get_test_connection();
        let user = create_test_user("a@example.com", &conn);
        let other = create_test_user("b@example.com", &conn);
        let their_food = create_test_category("Food", other.id, &conn);
        create_test_transaction(
            99.0,
            TransactionKind::Expense,
            &their_food,
            date!(2024 - 03 - 05),
            &conn,
        );

        assert_eq!(overall_totals(user.id, &conn), Ok(Totals::default()));
        assert_eq!(distinct_months(user.id, &conn), Ok(vec![]));
    }

    #[test]
    fn deleted_category_no_longer_counts() {
        let conn = get_test_connection();
        let user = create_test_user("a@example.com", &conn);
        let food = create_test_category("Food", user.id, &conn);
        create_test_transaction(
            40.0,
            TransactionKind::Expense,
            &food,
            date!(2024 - 03 - 05),
            &conn,
        );

        delete_category(food.id, user.id, &conn).unwrap();

        assert_eq!(overall_totals(user.id, &conn), Ok(Totals::default()));
    }

    #[test]
    fn monthly_totals_serialize_flat() {
        let totals = super::MonthlyTotals {
            month: month("2024-03"),
            totals: Totals::new(100.0, 40.0),
        };

        let json = serde_json::to_value(totals).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"month": "2024-03", "income": 100.0, "expense": 40.0, "net": 60.0})
        );
    }
}
