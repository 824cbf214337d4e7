//! Defines the projection model and its table.

use rusqlite::{Connection, Row};
use time::{Date, OffsetDateTime};

use crate::{
    category::Reference, database_id::ProjectionId, family::Family, owner::OwnerId,
};

// ============================================================================
// MODELS
// ============================================================================

/// An income or expense that is expected to happen.
///
/// A projection starts out pending and is turned into a
/// [MaterializedRecord](crate::record::MaterializedRecord) at most once, after
/// which `is_materialized` stays `true`.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// The ID of the projection.
    pub id: ProjectionId,
    /// When the projection was created.
    pub created_at: OffsetDateTime,
    /// The date the expected income or expense applies to.
    pub scheduled_date: Date,
    /// When the income is expected to be earned or the expense bought.
    pub incurred_date: Date,
    /// A text description of the projection.
    pub description: String,
    /// The expected amount of money, in no particular currency.
    pub value: f64,
    /// Whether the income is passive, e.g. interest.
    pub is_passive: bool,
    /// Whether a record has been materialized from this projection.
    pub is_materialized: bool,
    /// Who the projection belongs to.
    pub owner: OwnerId,
    /// The category the projection is grouped under.
    pub category: Reference,
    /// How an expense will be paid. Always `None` for income.
    pub payment_method: Option<Reference>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Initialize the projection table for `family`.
///
/// The category table of the same family and the payment method table must
/// already exist.
pub fn create_projection_table(
    family: Family,
    connection: &Connection,
) -> Result<(), rusqlite::Error> {
    connection.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            id TEXT PRIMARY KEY,
            created_at TEXT NOT NULL,
            scheduled_date TEXT NOT NULL,
            incurred_date TEXT NOT NULL,
            description TEXT NOT NULL,
            value REAL NOT NULL,
            is_passive INTEGER NOT NULL DEFAULT 0,
            is_materialized INTEGER NOT NULL DEFAULT 0,
            owner_id TEXT NOT NULL,
            category_id INTEGER NOT NULL REFERENCES {category}(id),
            payment_method_id INTEGER REFERENCES payment_method(id)
        );

        CREATE INDEX IF NOT EXISTS idx_{table}_owner_date ON {table}(owner_id, scheduled_date);",
        table = family.projection_table(),
        category = family.category_table(),
    ))?;

    Ok(())
}

/// The SELECT clause shared by projection queries, joined with the labels of
/// the referenced category and payment method. The projection table is
/// aliased `p`.
pub(crate) fn select_projection_sql(family: Family) -> String {
    format!(
        "SELECT p.id, p.created_at, p.scheduled_date, p.incurred_date, p.description, p.value,
            p.is_passive, p.is_materialized, p.owner_id, p.category_id, c.label,
            p.payment_method_id, m.label
         FROM {table} p
         INNER JOIN {category} c ON c.id = p.category_id
         LEFT JOIN payment_method m ON m.id = p.payment_method_id",
        table = family.projection_table(),
        category = family.category_table(),
    )
}

/// Map a row selected with [select_projection_sql] to a projection.
pub(crate) fn map_projection_row(row: &Row) -> Result<Projection, rusqlite::Error> {
    let owner: String = row.get(8)?;
    let payment_method_id: Option<i64> = row.get(11)?;

    Ok(Projection {
        id: row.get(0)?,
        created_at: row.get(1)?,
        scheduled_date: row.get(2)?,
        incurred_date: row.get(3)?,
        description: row.get(4)?,
        value: row.get(5)?,
        is_passive: row.get(6)?,
        is_materialized: row.get(7)?,
        owner: OwnerId::new(owner),
        category: Reference {
            id: row.get(9)?,
            label: row.get(10)?,
        },
        payment_method: match payment_method_id {
            Some(id) => Some(Reference {
                id,
                label: row.get(12)?,
            }),
            None => None,
        },
    })
}
