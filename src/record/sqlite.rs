//! Implements a SQLite backed record store.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::{
    Error,
    family::Family,
    owner::OwnerId,
    period::{MonthPeriod, PeriodQuery},
    record::{
        MaterializedRecord, RecordStore,
        core::{insert_record, map_record_row, select_record_sql},
    },
};

/// Stores the materialized records of one family in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteRecordStore {
    connection: Arc<Mutex<Connection>>,
    family: Family,
}

impl SQLiteRecordStore {
    /// Create a new store for `family` using the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>, family: Family) -> Self {
        Self { connection, family }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl RecordStore for SQLiteRecordStore {
    fn family(&self) -> Family {
        self.family
    }

    fn save(&self, record: MaterializedRecord) -> Result<MaterializedRecord, Error> {
        let connection = self.lock()?;

        insert_record(self.family, &record, &connection)?;

        Ok(record)
    }

    fn get_by_id(&self, id: &str, owner: &OwnerId) -> Result<Option<MaterializedRecord>, Error> {
        let connection = self.lock()?;

        let result = connection
            .prepare(&format!(
                "{} WHERE r.id = :id AND r.owner_id = :owner_id",
                select_record_sql(self.family)
            ))?
            .query_row(
                rusqlite::named_params! { ":id": id, ":owner_id": owner.as_str() },
                map_record_row,
            );

        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn edit(&self, record: MaterializedRecord) -> Result<MaterializedRecord, Error> {
        let connection = self.lock()?;

        let rows_affected = connection.execute(
            &format!(
                "UPDATE {} SET scheduled_date = ?1, incurred_date = ?2, description = ?3,
                    value = ?4, is_passive = ?5, category_id = ?6, payment_method_id = ?7
                 WHERE id = ?8 AND owner_id = ?9",
                self.family.record_table()
            ),
            rusqlite::params![
                record.scheduled_date,
                record.incurred_date,
                record.description,
                record.value,
                record.is_passive,
                record.category.id,
                record.payment_method.as_ref().map(|method| method.id),
                record.id,
                record.owner.as_str(),
            ],
        )?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(record)
    }

    fn remove(&self, id: &str, owner: &OwnerId) -> Result<(), Error> {
        let connection = self.lock()?;

        let rows_affected = connection.execute(
            &format!(
                "DELETE FROM {} WHERE id = ?1 AND owner_id = ?2",
                self.family.record_table()
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
                self.family.record_table()
            ),
            (owner.as_str(), period.first_day(), period.last_day()),
            |row| row.get(0),
        )?;

        Ok(count as u64)
    }

    fn get_all(&self, query: &PeriodQuery) -> Result<Vec<MaterializedRecord>, Error> {
        let connection = self.lock()?;

        connection
            .prepare(&format!(
                "{} WHERE r.owner_id = :owner_id AND r.scheduled_date BETWEEN :first_day AND :last_day
                 ORDER BY r.scheduled_date ASC, r.created_at ASC, r.id ASC
                 LIMIT :limit OFFSET :offset",
                select_record_sql(self.family)
            ))?
            .query_map(
                rusqlite::named_params! {
                    ":owner_id": query.owner.as_str(),
                    ":first_day": query.period.first_day(),
                    ":last_day": query.period.last_day(),
                    ":limit": i64::try_from(query.limit).unwrap_or(i64::MAX),
                    ":offset": i64::try_from(query.offset).unwrap_or(i64::MAX),
                },
                map_record_row,
            )?
            .map(|maybe_record| maybe_record.map_err(|error| error.into()))
            .collect()
    }
}
