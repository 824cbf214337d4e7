//! Sets up the application's SQLite database.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    category::{create_category_table, create_payment_method_table},
    family::Family,
    projection::create_projection_table,
    record::create_record_table,
};

/// Create the tables for categories, payment methods, projections and records
/// of every family if they do not exist yet.
///
/// Foreign key enforcement is switched on for `connection`, since the stores
/// rely on it to reject unknown categories and payment methods.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_payment_method_table(&transaction)?;

    for family in Family::ALL {
        create_category_table(family, &transaction)?;
        create_projection_table(family, &transaction)?;
        create_record_table(family, &transaction)?;
    }

    transaction.commit()?;

    Ok(())
}
