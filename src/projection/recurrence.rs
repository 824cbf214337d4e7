//! Expands one projection into a series of monthly projections.

use time::Date;

use crate::{
    Error,
    database_id::generate_id,
    period::add_months,
    projection::{Projection, ProjectionStore},
};

/// The outcome of [expand_recurrence].
#[derive(Debug, Clone, PartialEq)]
pub struct Expansion {
    /// The projection saved at the original scheduled date.
    pub first: Projection,
    /// How many projections were saved, at least 1.
    pub recurrence: u32,
}

/// Save `template` and, when `recurrence` is more than 1, `recurrence - 1`
/// copies of it scheduled one, two, ... months later.
///
/// Each copy gets its own ID and starts out pending. Its incurred date is
/// `incurred_date` if one was given, otherwise its own scheduled date. Days
/// that do not exist in a later month are clamped to the last day of that
/// month.
///
/// The projections are saved one at a time. If a save fails the error is
/// returned and the projections saved before it are kept.
///
/// # Errors
/// Returns [Error::DateOutOfRange] before anything is saved if a later
/// scheduled date cannot be represented, or any error from the store.
pub fn expand_recurrence(
    template: Projection,
    recurrence: u32,
    incurred_date: Option<Date>,
    store: &dyn ProjectionStore,
) -> Result<Expansion, Error> {
    let recurrence = recurrence.max(1);

    let siblings = (1..recurrence)
        .map(|months| {
            let scheduled_date = add_months(template.scheduled_date, months)?;

            Ok(Projection {
                id: generate_id(),
                scheduled_date,
                incurred_date: incurred_date.unwrap_or(scheduled_date),
                is_materialized: false,
                ..template.clone()
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let first = store.save(template)?;

    for (saved, sibling) in siblings.into_iter().enumerate() {
        store.save(sibling).inspect_err(|error| {
            tracing::warn!(
                "Recurrence for {} projection {} stopped after saving {} of {recurrence} projections: {error}",
                store.family(),
                first.id,
                saved + 1,
            )
        })?;
    }

    Ok(Expansion { first, recurrence })
}

#[cfg(test)]
mod expand_recurrence_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use time::{Date, macros::date, macros::datetime};

    use crate::{
        Error,
        category::Reference,
        family::Family,
        memory_store::InMemoryStore,
        owner::OwnerId,
        period::{MonthPeriod, PeriodQuery},
        projection::{Projection, ProjectionStore},
        record::MaterializedRecord,
    };

    use super::expand_recurrence;

    fn get_test_store() -> InMemoryStore {
        let store = InMemoryStore::new(Family::Expense);
        store.add_category(1, "Rent");
        store
    }

    fn template(scheduled_date: Date) -> Projection {
        Projection {
            id: "first".to_owned(),
            created_at: datetime!(2024-01-01 09:00 UTC),
            scheduled_date,
            incurred_date: scheduled_date,
            description: "Rent".to_owned(),
            value: 450.0,
            is_passive: false,
            is_materialized: false,
            owner: OwnerId::new("alice"),
            category: Reference::to(1),
            payment_method: None,
        }
    }

    fn scheduled_dates(store: &InMemoryStore) -> Vec<Date> {
        let mut dates: Vec<_> = store
            .projections()
            .into_iter()
            .map(|projection| projection.scheduled_date)
            .collect();
        dates.sort();
        dates
    }

    #[test]
    fn zero_and_one_save_single_projection() {
        for recurrence in [0, 1] {
            let store = get_test_store();

            let projections = store.projection_store();

            let expansion =
                expand_recurrence(template(date!(2024 - 01 - 15)), recurrence, None, &projections)
                    .unwrap();

            assert_eq!(expansion.recurrence, 1);
            assert_eq!(expansion.first.id, "first");
            assert_eq!(store.projections().len(), 1);
        }
    }

    #[test]
    fn saves_one_projection_per_month() {
        let store = get_test_store();
        let projections = store.projection_store();

        let expansion =
            expand_recurrence(template(date!(2024 - 01 - 15)), 3, None, &projections).unwrap();

        assert_eq!(expansion.recurrence, 3);
        assert_eq!(
            scheduled_dates(&store),
            vec![
                date!(2024 - 01 - 15),
                date!(2024 - 02 - 15),
                date!(2024 - 03 - 15)
            ]
        );
        for projection in store.projections() {
            assert!(!projection.is_materialized);
            assert_eq!(projection.description, "Rent");
            assert_eq!(projection.value, 450.0);
            assert_eq!(projection.category.id, 1);
            assert_eq!(projection.owner, OwnerId::new("alice"));
        }
    }

    #[test]
    fn siblings_get_distinct_ids() {
        let store = get_test_store();
        let projections = store.projection_store();

        expand_recurrence(template(date!(2024 - 01 - 15)), 12, None, &projections).unwrap();

        let mut ids: Vec<_> = store
            .projections()
            .into_iter()
            .map(|projection| projection.id)
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 12);
    }

    #[test]
    fn end_of_month_is_clamped() {
        let store = get_test_store();
        let projections = store.projection_store();

        expand_recurrence(template(date!(2024 - 01 - 31)), 3, None, &projections).unwrap();

        assert_eq!(
            scheduled_dates(&store),
            vec![
                date!(2024 - 01 - 31),
                date!(2024 - 02 - 29),
                date!(2024 - 03 - 31)
            ]
        );
    }

    #[test]
    fn incurred_date_follows_schedule_unless_given() {
        let store = get_test_store();
        expand_recurrence(
            template(date!(2024 - 01 - 15)),
            2,
            None,
            &store.projection_store(),
        )
        .unwrap();
        let given = get_test_store();
        expand_recurrence(
            template(date!(2024 - 01 - 15)),
            2,
            Some(date!(2024 - 01 - 10)),
            &given.projection_store(),
        )
        .unwrap();

        for projection in store.projections() {
            assert_eq!(projection.incurred_date, projection.scheduled_date);
        }
        for projection in given.projections() {
            if projection.id != "first" {
                assert_eq!(projection.incurred_date, date!(2024 - 01 - 10));
            }
        }
    }

    #[test]
    fn out_of_range_date_saves_nothing() {
        let store = get_test_store();
        let projections = store.projection_store();

        let result = expand_recurrence(template(date!(9999 - 11 - 15)), 3, None, &projections);

        assert_eq!(
            result,
            Err(Error::DateOutOfRange(date!(9999 - 11 - 15), 2))
        );
        assert!(store.projections().is_empty());
    }

    /// Delegates to an in-memory store but fails every save after the first `limit`.
    #[derive(Debug)]
    struct FailingStore {
        inner: InMemoryStore,
        limit: usize,
        saves: AtomicUsize,
    }

    impl ProjectionStore for FailingStore {
        fn family(&self) -> Family {
            self.inner.projection_store().family()
        }

        fn save(&self, projection: Projection) -> Result<Projection, Error> {
            if self.saves.fetch_add(1, Ordering::SeqCst) >= self.limit {
                return Err(Error::DatabaseLockError);
            }

            self.inner.projection_store().save(projection)
        }

        fn get_by_id(&self, id: &str, owner: &OwnerId) -> Result<Option<Projection>, Error> {
            self.inner.projection_store().get_by_id(id, owner)
        }

        fn edit(&self, projection: Projection) -> Result<Projection, Error> {
            self.inner.projection_store().edit(projection)
        }

        fn remove(&self, id: &str, owner: &OwnerId) -> Result<(), Error> {
            self.inner.projection_store().remove(id, owner)
        }

        fn get_total_records(&self, period: MonthPeriod, owner: &OwnerId) -> Result<u64, Error> {
            self.inner.projection_store().get_total_records(period, owner)
        }

        fn get_all(&self, query: &PeriodQuery) -> Result<Vec<Projection>, Error> {
            self.inner.projection_store().get_all(query)
        }

        fn save_materialized(
            &self,
            record: MaterializedRecord,
        ) -> Result<MaterializedRecord, Error> {
            self.inner.projection_store().save_materialized(record)
        }
    }

    #[test]
    fn partial_failure_keeps_saved_siblings() {
        let store = FailingStore {
            inner: get_test_store(),
            limit: 2,
            saves: AtomicUsize::new(0),
        };

        let result = expand_recurrence(template(date!(2024 - 01 - 15)), 4, None, &store);

        assert_eq!(result, Err(Error::DatabaseLockError));
        assert_eq!(
            scheduled_dates(&store.inner),
            vec![date!(2024 - 01 - 15), date!(2024 - 02 - 15)]
        );
    }
}
