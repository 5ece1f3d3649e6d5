use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Month, OffsetDateTime};

use fluxo_rs::{
    DebtorStatus, NewDebtor, Transaction, TransactionKind, create_debtor, create_transaction,
    initialize_db,
};

/// A utility for creating a demo database for the Fluxo server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The year to create transactions for, defaults to the current year.
    #[arg(long, short)]
    year: Option<i32>,
}

/// Monthly expenses as (category, description, amount, day of month).
const EXPENSES: [(&str, &str, f64, u8); 5] = [
    ("Housing", "Rent", 1450.0, 5),
    ("Food", "Groceries", 612.4, 9),
    ("Transport", "Bus pass", 180.0, 2),
    ("Utilities", "Power bill", 215.75, 18),
    ("Leisure", "Cinema", 64.9, 23),
];

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

    let year = args.year.unwrap_or_else(|| OffsetDateTime::now_utc().year());
    println!("Creating transactions for {year}...");

    let mut month = Month::January;
    for month_number in 1..=12u8 {
        let salary = 5200.0 + f64::from(month_number) * 25.0;
        create_transaction(
            Transaction::build(
                TransactionKind::Income,
                salary,
                Date::from_calendar_date(year, month, 1)?,
                "Monthly salary",
            )
            .category("Salary")
            .source("Salary"),
            &conn,
        )?;

        if month_number % 3 == 0 {
            // Freelance income without a source shows up as "Outros" on the dashboard.
            create_transaction(
                Transaction::build(
                    TransactionKind::Income,
                    850.0,
                    Date::from_calendar_date(year, month, 15)?,
                    "Freelance job",
                )
                .category("Freelance"),
                &conn,
            )?;
        }

        for (category, description, amount, day) in EXPENSES {
            create_transaction(
                Transaction::build(
                    TransactionKind::Expense,
                    amount + f64::from(month_number),
                    Date::from_calendar_date(year, month, day)?,
                    description,
                )
                .category(category),
                &conn,
            )?;
        }

        month = month.next();
    }

    println!("Creating debtors...");

    create_debtor(
        NewDebtor::new("Ana Souza", 120.0)
            .email("ana@example.com")
            .due_date(Date::from_calendar_date(year, Month::March, 10)?),
        &conn,
    )?;
    create_debtor(
        NewDebtor::new("Bruno Lima", 45.5).status(DebtorStatus::Paid),
        &conn,
    )?;
    create_debtor(
        NewDebtor::new("Carla Mendes", 300.0)
            .status(DebtorStatus::Overdue)
            .due_date(Date::from_calendar_date(year, Month::January, 31)?),
        &conn,
    )?;

    println!("Success!");

    Ok(())
}
