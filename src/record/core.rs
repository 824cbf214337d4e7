//! Defines the materialized record model and its table.

use rusqlite::{Connection, Row};
use time::{Date, OffsetDateTime};

use crate::{
    category::Reference,
    database_id::{ProjectionId, RecordId},
    family::Family,
    owner::OwnerId,
};

// ============================================================================
// MODELS
// ============================================================================

/// An income or expense that actually happened.
///
/// A record is either created directly or produced once from a projection,
/// in which case `projection_id` names that projection.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterializedRecord {
    /// The ID of the record.
    pub id: RecordId,
    /// When the record was created.
    pub created_at: OffsetDateTime,
    /// The date the income or expense applies to.
    pub scheduled_date: Date,
    /// When the income was earned or the expense was bought.
    pub incurred_date: Date,
    /// A text description of the record.
    pub description: String,
    /// The amount of money, in no particular currency.
    pub value: f64,
    /// Whether the income is passive, e.g. interest.
    pub is_passive: bool,
    /// Who the record belongs to.
    pub owner: OwnerId,
    /// The category the record is grouped under.
    pub category: Reference,
    /// How an expense was paid. Always `None` for income.
    pub payment_method: Option<Reference>,
    /// The projection this record was materialized from.
    pub projection_id: Option<ProjectionId>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Initialize the record table for `family`.
///
/// The projection table of the same family must already exist. Each
/// projection can be referenced by at most one record.
pub fn create_record_table(family: Family, connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            id TEXT PRIMARY KEY,
            created_at TEXT NOT NULL,
            scheduled_date TEXT NOT NULL,
            incurred_date TEXT NOT NULL,
            description TEXT NOT NULL,
            value REAL NOT NULL,
            is_passive INTEGER NOT NULL DEFAULT 0,
            owner_id TEXT NOT NULL,
            category_id INTEGER NOT NULL REFERENCES {category}(id),
            payment_method_id INTEGER REFERENCES payment_method(id),
            projection_id TEXT UNIQUE REFERENCES {projection}(id) ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_{table}_owner_date ON {table}(owner_id, scheduled_date);",
        table = family.record_table(),
        category = family.category_table(),
        projection = family.projection_table(),
    ))?;

    Ok(())
}

/// Insert `record` into the record table of `family`.
///
/// Also used by the projection store so that a record and the projection's
/// flag can be written in one database transaction.
pub(crate) fn insert_record(
    family: Family,
    record: &MaterializedRecord,
    connection: &Connection,
) -> Result<(), rusqlite::Error> {
    connection.execute(
        &format!(
            "INSERT INTO {} (id, created_at, scheduled_date, incurred_date, description, value,
                is_passive, owner_id, category_id, payment_method_id, projection_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            family.record_table()
        ),
        rusqlite::params![
            record.id,
            record.created_at,
            record.scheduled_date,
            record.incurred_date,
            record.description,
            record.value,
            record.is_passive,
            record.owner.as_str(),
            record.category.id,
            record.payment_method.as_ref().map(|method| method.id),
            record.projection_id,
        ],
    )?;

    Ok(())
}

/// The SELECT clause shared by record queries, joined with the labels of the
/// referenced category and payment method. The record table is aliased `r`.
pub(crate) fn select_record_sql(family: Family) -> String {
    format!(
        "SELECT r.id, r.created_at, r.scheduled_date, r.incurred_date, r.description, r.value,
            r.is_passive, r.owner_id, r.category_id, c.label, r.payment_method_id, m.label,
            r.projection_id
         FROM {table} r
         INNER JOIN {category} c ON c.id = r.category_id
         LEFT JOIN payment_method m ON m.id = r.payment_method_id",
        table = family.record_table(),
        category = family.category_table(),
    )
}

/// Map a row selected with [select_record_sql] to a record.
pub(crate) fn map_record_row(row: &Row) -> Result<MaterializedRecord, rusqlite::Error> {
    let owner: String = row.get(7)?;
    let payment_method_id: Option<i64> = row.get(10)?;

    Ok(MaterializedRecord {
        id: row.get(0)?,
        created_at: row.get(1)?,
        scheduled_date: row.get(2)?,
        incurred_date: row.get(3)?,
        description: row.get(4)?,
        value: row.get(5)?,
        is_passive: row.get(6)?,
        owner: OwnerId::new(owner),
        category: Reference {
            id: row.get(8)?,
            label: row.get(9)?,
        },
        payment_method: match payment_method_id {
            Some(id) => Some(Reference {
                id,
                label: row.get(11)?,
            }),
            None => None,
        },
        projection_id: row.get(12)?,
    })
}
