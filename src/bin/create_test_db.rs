use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Month};

use tallybook_rs::{
    CategoryName, NewUser, PasswordHash, Transaction, TransactionKind, create_category,
    create_transaction, create_user, initialize_db,
};

/// A utility for creating a test database for the JSON API server of tallybook_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");

    let user = create_user(
        NewUser {
            name: "Test User".to_owned(),
            email: "test@example.com".to_owned(),
            password_hash: PasswordHash::new("test", PasswordHash::DEFAULT_COST)?,
        },
        &conn,
    )?;

    println!("Creating categories...");

    let salary = create_category(CategoryName::new("Salary")?, user.id, &conn)?;
    let groceries = create_category(CategoryName::new("Groceries")?, user.id, &conn)?;
    let rent = create_category(CategoryName::new("Rent")?, user.id, &conn)?;
    let fun = create_category(CategoryName::new("Eating Out")?, user.id, &conn)?;

    println!("Creating transactions...");

    let months = [
        (2024, Month::October),
        (2024, Month::November),
        (2024, Month::December),
        (2025, Month::January),
        (2025, Month::February),
        (2025, Month::March),
    ];

    let mut count = 0;
    for (index, (year, month)) in months.into_iter().enumerate() {
        let step = index as f64;
        let entries = [
            (3200.0, TransactionKind::Income, salary.id, 1, "Pay"),
            (1450.0, TransactionKind::Expense, rent.id, 2, "Rent"),
            (85.4 + step * 3.5, TransactionKind::Expense, groceries.id, 6, "Supermarket"),
            (92.1 - step * 2.0, TransactionKind::Expense, groceries.id, 20, "Supermarket"),
            (38.0 + step * 7.25, TransactionKind::Expense, fun.id, 14, "Dinner"),
        ];

        for (amount, kind, category_id, day, description) in entries {
            let date = Date::from_calendar_date(year, month, day)?;

            create_transaction(
                Transaction::build(amount, kind, category_id, date)
                    .description(Some(description.to_owned())),
                user.id,
                &conn,
            )?;
            count += 1;
        }
    }

    println!("Created {count} transactions for {}.", user.email);
    println!("Success!");

    Ok(())
}
