//! Implements a SQLite backed projection store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, ffi};

use crate::{
    Error,
    family::Family,
    owner::OwnerId,
    period::{MonthPeriod, PeriodQuery},
    projection::{
        Projection, ProjectionStore,
        core::{map_projection_row, select_projection_sql},
    },
    record::{MaterializedRecord, insert_record},
};

/// Stores the projections of one family in a SQLite database.
///
/// The tables created by [initialize](crate::db::initialize) must exist and
/// foreign keys must be enabled on the connection.
#[derive(Debug, Clone)]
pub struct SQLiteProjectionStore {
    connection: Arc<Mutex<Connection>>,
    family: Family,
}

impl SQLiteProjectionStore {
    /// Create a new store for `family` using the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>, family: Family) -> Self {
        Self { connection, family }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl ProjectionStore for SQLiteProjectionStore {
    fn family(&self) -> Family {
        self.family
    }

    fn save(&self, projection: Projection) -> Result<Projection, Error> {
        let connection = self.lock()?;

        connection.execute(
            &format!(
                "INSERT INTO {} (id, created_at, scheduled_date, incurred_date, description, value,
                    is_passive, is_materialized, owner_id, category_id, payment_method_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                self.family.projection_table()
            ),
            rusqlite::params![
                projection.id,
                projection.created_at,
                projection.scheduled_date,
                projection.incurred_date,
                projection.description,
                projection.value,
                projection.is_passive,
                projection.is_materialized,
                projection.owner.as_str(),
                projection.category.id,
                projection.payment_method.as_ref().map(|method| method.id),
            ],
        )?;

        Ok(projection)
    }

    fn get_by_id(&self, id: &str, owner: &OwnerId) -> Result<Option<Projection>, Error> {
        let connection = self.lock()?;

        let result = connection
            .prepare(&format!(
                "{} WHERE p.id = :id AND p.owner_id = :owner_id",
                select_projection_sql(self.family)
            ))?
            .query_row(
                rusqlite::named_params! { ":id": id, ":owner_id": owner.as_str() },
                map_projection_row,
            );

        match result {
            Ok(projection) => Ok(Some(projection)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn edit(&self, projection: Projection) -> Result<Projection, Error> {
        let connection = self.lock()?;

        let rows_affected = connection.execute(
            &format!(
                "UPDATE {} SET scheduled_date = ?1, incurred_date = ?2, description = ?3,
                    value = ?4, is_passive = ?5, category_id = ?6, payment_method_id = ?7
                 WHERE id = ?8 AND owner_id = ?9",
                self.family.projection_table()
            ),
            rusqlite::params![
                projection.scheduled_date,
                projection.incurred_date,
                projection.description,
                projection.value,
                projection.is_passive,
                projection.category.id,
                projection.payment_method.as_ref().map(|method| method.id),
                projection.id,
                projection.owner.as_str(),
            ],
        )?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(projection)
    }

    fn remove(&self, id: &str, owner: &OwnerId) -> Result<(), Error> {
        let connection = self.lock()?;

        let rows_affected = connection.execute(
            &format!(
                "DELETE FROM {} WHERE id = ?1 AND owner_id = ?2",
                self.family.projection_table()
            ),
            (id, owner.as_str()),
        )?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    fn get_total_records(&self, period: MonthPeriod, owner: &OwnerId) -> Result<u64, Error> {
        let connection = self.lock()?;

        let count: i64 = connection.query_row(
            &format!(
                "SELECT COUNT(*) FROM {} WHERE owner_id = ?1 AND scheduled_date BETWEEN ?2 AND ?3",
                self.family.projection_table()
            ),
            (owner.as_str(), period.first_day(), period.last_day()),
            |row| row.get(0),
        )?;

        Ok(count as u64)
    }

    fn get_all(&self, query: &PeriodQuery) -> Result<Vec<Projection>, Error> {
        let connection = self.lock()?;

        connection
            .prepare(&format!(
                "{} WHERE p.owner_id = :owner_id AND p.scheduled_date BETWEEN :first_day AND :last_day
                 ORDER BY p.scheduled_date ASC, p.created_at ASC, p.id ASC
                 LIMIT :limit OFFSET :offset",
                select_projection_sql(self.family)
            ))?
            .query_map(
                rusqlite::named_params! {
                    ":owner_id": query.owner.as_str(),
                    ":first_day": query.period.first_day(),
                    ":last_day": query.period.last_day(),
                    ":limit": i64::try_from(query.limit).unwrap_or(i64::MAX),
                    ":offset": i64::try_from(query.offset).unwrap_or(i64::MAX),
                },
                map_projection_row,
            )?
            .map(|maybe_projection| maybe_projection.map_err(|error| error.into()))
            .collect()
    }

    fn save_materialized(&self, record: MaterializedRecord) -> Result<MaterializedRecord, Error> {
        let projection_id = record
            .projection_id
            .clone()
            .ok_or(Error::MissingProjectionReference)?;
        let connection = self.lock()?;
        let transaction = connection.unchecked_transaction()?;

        let is_materialized: bool = transaction.query_row(
            &format!(
                "SELECT is_materialized FROM {} WHERE id = ?1 AND owner_id = ?2",
                self.family.projection_table()
            ),
            (&projection_id, record.owner.as_str()),
            |row| row.get(0),
        )?;

        if is_materialized {
            return Err(Error::AlreadyMaterialized(projection_id));
        }

        let rows_affected = transaction.execute(
            &format!(
                "UPDATE {} SET is_materialized = 1
                 WHERE id = ?1 AND owner_id = ?2 AND is_materialized = 0",
                self.family.projection_table()
            ),
            (&projection_id, record.owner.as_str()),
        )?;

        if rows_affected == 0 {
            return Err(Error::AlreadyMaterialized(projection_id));
        }

        insert_record(self.family, &record, &transaction).map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                ffi::Error {
                    extended_code: ffi::SQLITE_CONSTRAINT_UNIQUE,
                    ..
                },
                _,
            ) => Error::AlreadyMaterialized(projection_id.clone()),
            error => error.into(),
        })?;

        transaction.commit()?;

        Ok(record)
    }
}
