use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use wallet_core::{Family, Label, create_category, create_payment_method, initialize_db};

/// A utility for creating a test database for the REST API server of wallet_core.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const INCOME_CATEGORIES: [&str; 3] = ["Salary", "Dividends", "Gifts"];
const EXPENSE_CATEGORIES: [&str; 5] = ["Rent", "Groceries", "Transport", "Utilities", "Leisure"];
const PAYMENT_METHODS: [&str; 3] = ["Cash", "Debit card", "Credit card"];

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

    println!("Creating categories...");
    for (family, labels) in [
        (Family::Income, INCOME_CATEGORIES.as_slice()),
        (Family::Expense, EXPENSE_CATEGORIES.as_slice()),
    ] {
        for label in labels {
            create_category(family, Label::new(label)?, &conn)?;
        }
    }

    println!("Creating payment methods...");
    for label in PAYMENT_METHODS {
        create_payment_method(Label::new(label)?, &conn)?;
    }

    println!("Success!");

    Ok(())
}
