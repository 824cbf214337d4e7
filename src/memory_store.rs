//! In-memory projection and record stores for tests and tooling.

use std::{
    collections::{HashMap, hash_map::Entry},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{
    Error,
    category::Reference,
    database_id::{CategoryId, PaymentMethodId, ProjectionId, RecordId},
    family::Family,
    owner::OwnerId,
    period::{MonthPeriod, PeriodQuery},
    projection::{Projection, ProjectionStore},
    record::{MaterializedRecord, RecordStore},
};

#[derive(Debug, Default)]
struct Tables {
    projections: HashMap<ProjectionId, Projection>,
    records: HashMap<RecordId, MaterializedRecord>,
    categories: HashMap<CategoryId, String>,
    payment_methods: HashMap<PaymentMethodId, String>,
}

impl Tables {
    fn check_references(
        &self,
        category: &Reference,
        payment_method: Option<&Reference>,
    ) -> Result<(), Error> {
        if !self.categories.contains_key(&category.id) {
            return Err(Error::InvalidReference);
        }

        match payment_method {
            Some(method) if !self.payment_methods.contains_key(&method.id) => {
                Err(Error::InvalidReference)
            }
            _ => Ok(()),
        }
    }

    fn label(&self, reference: &Reference, labels: &HashMap<i64, String>) -> Reference {
        Reference {
            id: reference.id,
            label: labels.get(&reference.id).cloned(),
        }
    }

    fn read_projection(&self, projection: &Projection) -> Projection {
        Projection {
            category: self.label(&projection.category, &self.categories),
            payment_method: projection
                .payment_method
                .as_ref()
                .map(|method| self.label(method, &self.payment_methods)),
            ..projection.clone()
        }
    }

    fn read_record(&self, record: &MaterializedRecord) -> MaterializedRecord {
        MaterializedRecord {
            category: self.label(&record.category, &self.categories),
            payment_method: record
                .payment_method
                .as_ref()
                .map(|method| self.label(method, &self.payment_methods)),
            ..record.clone()
        }
    }
}

/// Projections, records and reference data of one family, held in memory.
///
/// Clones share the same data. Use [InMemoryStore::projection_store] and
/// [InMemoryStore::record_store] to get the two store views.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    family: Family,
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    /// Create an empty store for `family`.
    pub fn new(family: Family) -> Self {
        Self {
            family,
            tables: Arc::new(Mutex::new(Tables::default())),
        }
    }

    /// Register a category that projections and records may reference.
    pub fn add_category(&self, id: CategoryId, label: &str) {
        self.lock().categories.insert(id, label.to_owned());
    }

    /// Register a payment method that projections and records may reference.
    pub fn add_payment_method(&self, id: PaymentMethodId, label: &str) {
        self.lock().payment_methods.insert(id, label.to_owned());
    }

    /// A projection store backed by this store's data.
    pub fn projection_store(&self) -> InMemoryProjectionStore {
        InMemoryProjectionStore(self.clone())
    }

    /// A record store backed by this store's data.
    pub fn record_store(&self) -> InMemoryRecordStore {
        InMemoryRecordStore(self.clone())
    }

    /// Every stored projection of every owner, in no particular order.
    pub fn projections(&self) -> Vec<Projection> {
        self.lock().projections.values().cloned().collect()
    }

    /// Every stored record of every owner, in no particular order.
    pub fn records(&self) -> Vec<MaterializedRecord> {
        self.lock().records.values().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // The tables are never left half-updated, so a poisoned lock is still usable.
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn page<T: Clone>(
    mut items: Vec<T>,
    query: &PeriodQuery,
    sort_key: impl Fn(&T) -> (time::Date, time::OffsetDateTime, String),
) -> Vec<T> {
    items.sort_by_key(|item| sort_key(item));

    items
        .into_iter()
        .skip(usize::try_from(query.offset).unwrap_or(usize::MAX))
        .take(usize::try_from(query.limit).unwrap_or(usize::MAX))
        .collect()
}

/// The projection view of an [InMemoryStore].
#[derive(Debug, Clone)]
pub struct InMemoryProjectionStore(InMemoryStore);

impl ProjectionStore for InMemoryProjectionStore {
    fn family(&self) -> Family {
        self.0.family
    }

    fn save(&self, projection: Projection) -> Result<Projection, Error> {
        let mut tables = self.0.lock();
        tables.check_references(&projection.category, projection.payment_method.as_ref())?;

        match tables.projections.entry(projection.id.clone()) {
            Entry::Occupied(_) => return Err(Error::DuplicateId),
            Entry::Vacant(entry) => entry.insert(projection.clone()),
        };

        Ok(projection)
    }

    fn get_by_id(&self, id: &str, owner: &OwnerId) -> Result<Option<Projection>, Error> {
        let tables = self.0.lock();

        Ok(tables
            .projections
            .get(id)
            .filter(|projection| &projection.owner == owner)
            .map(|projection| tables.read_projection(projection)))
    }

    fn edit(&self, projection: Projection) -> Result<Projection, Error> {
        let mut tables = self.0.lock();
        tables.check_references(&projection.category, projection.payment_method.as_ref())?;

        let stored = tables
            .projections
            .get_mut(&projection.id)
            .filter(|stored| stored.owner == projection.owner)
            .ok_or(Error::NotFound)?;

        *stored = Projection {
            created_at: stored.created_at,
            is_materialized: stored.is_materialized,
            ..projection.clone()
        };

        Ok(projection)
    }

    fn remove(&self, id: &str, owner: &OwnerId) -> Result<(), Error> {
        let mut tables = self.0.lock();

        match tables.projections.get(id) {
            Some(projection) if &projection.owner == owner => {}
            _ => return Err(Error::NotFound),
        }

        tables.projections.remove(id);
        for record in tables.records.values_mut() {
            if record.projection_id.as_deref() == Some(id) {
                record.projection_id = None;
            }
        }

        Ok(())
    }

    fn get_total_records(&self, period: MonthPeriod, owner: &OwnerId) -> Result<u64, Error> {
        let tables = self.0.lock();

        let count = tables
            .projections
            .values()
            .filter(|projection| {
                &projection.owner == owner && period.contains(projection.scheduled_date)
            })
            .count();

        Ok(count as u64)
    }

    fn get_all(&self, query: &PeriodQuery) -> Result<Vec<Projection>, Error> {
        let tables = self.0.lock();

        let matching = tables
            .projections
            .values()
            .filter(|projection| {
                projection.owner == query.owner && query.period.contains(projection.scheduled_date)
            })
            .map(|projection| tables.read_projection(projection))
            .collect();

        Ok(page(matching, query, |projection: &Projection| {
            (
                projection.scheduled_date,
                projection.created_at,
                projection.id.clone(),
            )
        }))
    }

    fn save_materialized(&self, record: MaterializedRecord) -> Result<MaterializedRecord, Error> {
        let projection_id = record
            .projection_id
            .clone()
            .ok_or(Error::MissingProjectionReference)?;
        let mut tables = self.0.lock();

        let projection = tables
            .projections
            .get(&projection_id)
            .filter(|projection| projection.owner == record.owner)
            .ok_or(Error::NotFound)?;

        let already_referenced = tables
            .records
            .values()
            .any(|existing| existing.projection_id.as_deref() == Some(projection_id.as_str()));

        if projection.is_materialized || already_referenced {
            return Err(Error::AlreadyMaterialized(projection_id));
        }

        tables.check_references(&record.category, record.payment_method.as_ref())?;

        match tables.records.entry(record.id.clone()) {
            Entry::Occupied(_) => return Err(Error::DuplicateId),
            Entry::Vacant(entry) => entry.insert(record.clone()),
        };
        if let Some(projection) = tables.projections.get_mut(&projection_id) {
            projection.is_materialized = true;
        }

        Ok(record)
    }
}

/// The record view of an [InMemoryStore].
#[derive(Debug, Clone)]
pub struct InMemoryRecordStore(InMemoryStore);

impl RecordStore for InMemoryRecordStore {
    fn family(&self) -> Family {
        self.0.family
    }

    fn save(&self, record: MaterializedRecord) -> Result<MaterializedRecord, Error> {
        let mut tables = self.0.lock();
        tables.check_references(&record.category, record.payment_method.as_ref())?;

        if let Some(projection_id) = &record.projection_id {
            if !tables.projections.contains_key(projection_id) {
                return Err(Error::InvalidReference);
            }
        }

        match tables.records.entry(record.id.clone()) {
            Entry::Occupied(_) => return Err(Error::DuplicateId),
            Entry::Vacant(entry) => entry.insert(record.clone()),
        };

        Ok(record)
    }

    fn get_by_id(&self, id: &str, owner: &OwnerId) -> Result<Option<MaterializedRecord>, Error> {
        let tables = self.0.lock();

        Ok(tables
            .records
            .get(id)
            .filter(|record| &record.owner == owner)
            .map(|record| tables.read_record(record)))
    }

    fn edit(&self, record: MaterializedRecord) -> Result<MaterializedRecord, Error> {
        let mut tables = self.0.lock();
        tables.check_references(&record.category, record.payment_method.as_ref())?;

        let stored = tables
            .records
            .get_mut(&record.id)
            .filter(|stored| stored.owner == record.owner)
            .ok_or(Error::NotFound)?;

        *stored = MaterializedRecord {
            created_at: stored.created_at,
            projection_id: stored.projection_id.clone(),
            ..record.clone()
        };

        Ok(record)
    }

    fn remove(&self, id: &str, owner: &OwnerId) -> Result<(), Error> {
        let mut tables = self.0.lock();

        match tables.records.get(id) {
            Some(record) if &record.owner == owner => {
                tables.records.remove(id);
                Ok(())
            }
            _ => Err(Error::NotFound),
        }
    }

    fn get_total_records(&self, period: MonthPeriod, owner: &OwnerId) -> Result<u64, Error> {
        let tables = self.0.lock();

        let count = tables
            .records
            .values()
            .filter(|record| &record.owner == owner && period.contains(record.scheduled_date))
            .count();

        Ok(count as u64)
    }

    fn get_all(&self, query: &PeriodQuery) -> Result<Vec<MaterializedRecord>, Error> {
        let tables = self.0.lock();

        let matching = tables
            .records
            .values()
            .filter(|record| {
                record.owner == query.owner && query.period.contains(record.scheduled_date)
            })
            .map(|record| tables.read_record(record))
            .collect();

        Ok(page(matching, query, |record: &MaterializedRecord| {
            (record.scheduled_date, record.created_at, record.id.clone())
        }))
    }
}
