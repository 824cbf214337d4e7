//! Database operations for categories and payment methods.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Category, Label, PaymentMethod},
    family::Family,
};

/// Create a category for `family` and return it with its generated ID.
pub fn create_category(
    family: Family,
    label: Label,
    connection: &Connection,
) -> Result<Category, Error> {
    connection.execute(
        &format!("INSERT INTO {} (label) VALUES (?1);", family.category_table()),
        (label.as_ref(),),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Category { id, label })
}

/// Retrieve all categories of `family` ordered alphabetically by label.
pub fn get_all_categories(family: Family, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(&format!(
            "SELECT id, label FROM {} ORDER BY label ASC;",
            family.category_table()
        ))?
        .query_map([], map_category_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Create a payment method and return it with its generated ID.
pub fn create_payment_method(label: Label, connection: &Connection) -> Result<PaymentMethod, Error> {
    connection.execute(
        "INSERT INTO payment_method (label) VALUES (?1);",
        (label.as_ref(),),
    )?;

    let id = connection.last_insert_rowid();

    Ok(PaymentMethod { id, label })
}

/// Retrieve all payment methods ordered alphabetically by label.
pub fn get_all_payment_methods(connection: &Connection) -> Result<Vec<PaymentMethod>, Error> {
    connection
        .prepare("SELECT id, label FROM payment_method ORDER BY label ASC;")?
        .query_map([], |row| {
            let (id, label) = map_label_row(row)?;
            Ok(PaymentMethod { id, label })
        })?
        .map(|maybe_method| maybe_method.map_err(|error| error.into()))
        .collect()
}

/// Initialize the category table for `family`.
pub fn create_category_table(family: Family, connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            id INTEGER PRIMARY KEY,
            label TEXT NOT NULL UNIQUE
        );",
        table = family.category_table()
    ))?;

    Ok(())
}

/// Initialize the payment method table.
pub fn create_payment_method_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS payment_method (
            id INTEGER PRIMARY KEY,
            label TEXT NOT NULL UNIQUE
        );",
    )?;

    Ok(())
}

fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let (id, label) = map_label_row(row)?;

    Ok(Category { id, label })
}

fn map_label_row(row: &Row) -> Result<(i64, Label), rusqlite::Error> {
    let id = row.get(0)?;
    let raw_label: String = row.get(1)?;

    Ok((id, Label::new_unchecked(&raw_label)))
}
