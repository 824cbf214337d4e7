//! Creating, changing, deleting and reading projections.

use time::OffsetDateTime;

use crate::{
    Error,
    category::Reference,
    database_id::generate_id,
    owner::OwnerId,
    pagination::{Page, PageFilter, read_page},
    projection::{
        CreateProjectionRequest, Projection, ProjectionResponse, ProjectionStore,
        UpdateProjectionRequest, expand_recurrence,
    },
};

/// Create a projection from `request` for `owner`, repeated monthly when
/// `request.recurrence` is more than 1.
///
/// Returns the first projection as stored, along with the number of
/// projections created.
///
/// # Errors
/// Returns [Error::InvalidReference] for an unknown category or payment
/// method, [Error::DateOutOfRange] when a repeat falls outside the supported
/// dates, or any other error from the store. Projections saved before a
/// failing save are kept.
pub fn create_projection(
    request: CreateProjectionRequest,
    owner: &OwnerId,
    store: &dyn ProjectionStore,
) -> Result<ProjectionResponse, Error> {
    let payment_method = request
        .payment_method_id
        .filter(|_| store.family().supports_payment_method())
        .map(Reference::to);

    let template = Projection {
        id: generate_id(),
        created_at: OffsetDateTime::now_utc(),
        scheduled_date: request.scheduled_date,
        incurred_date: request.incurred_date.unwrap_or(request.scheduled_date),
        description: request.description,
        value: request.value,
        is_passive: request.is_passive,
        is_materialized: false,
        owner: owner.clone(),
        category: Reference::to(request.category_id),
        payment_method,
    };

    let expansion = expand_recurrence(template, request.recurrence, request.incurred_date, store)?;

    let projection = store
        .get_by_id(&expansion.first.id, owner)?
        .ok_or(Error::NotFound)?;

    Ok(ProjectionResponse {
        recurrence: Some(expansion.recurrence),
        ..ProjectionResponse::from(projection)
    })
}

/// Replace the fields of the projection `id` belonging to `owner` with those in `request`.
///
/// The owner, creation time and materialization flag are kept. Returns `None`
/// if there is no such projection.
///
/// # Errors
/// Returns [Error::InvalidReference] for an unknown category or payment
/// method, or any other error from the store.
pub fn update_projection(
    id: &str,
    request: UpdateProjectionRequest,
    owner: &OwnerId,
    store: &dyn ProjectionStore,
) -> Result<Option<ProjectionResponse>, Error> {
    let Some(existing) = store.get_by_id(id, owner)? else {
        return Ok(None);
    };

    let payment_method = request
        .payment_method_id
        .filter(|_| store.family().supports_payment_method())
        .map(Reference::to);

    let projection = Projection {
        id: existing.id,
        created_at: existing.created_at,
        scheduled_date: request.scheduled_date,
        incurred_date: request.incurred_date.unwrap_or(request.scheduled_date),
        description: request.description,
        value: request.value,
        is_passive: request.is_passive,
        is_materialized: existing.is_materialized,
        owner: existing.owner,
        category: Reference::to(request.category_id),
        payment_method,
    };

    match store.edit(projection) {
        Ok(_) => {}
        Err(Error::NotFound) => return Ok(None),
        Err(error) => return Err(error),
    }

    Ok(store.get_by_id(id, owner)?.map(ProjectionResponse::from))
}

/// Delete the projection `id` belonging to `owner`.
///
/// # Errors
/// Returns [Error::NotFound] if there is no such projection, or any other error from the store.
pub fn delete_projection(id: &str, owner: &OwnerId, store: &dyn ProjectionStore) -> Result<(), Error> {
    store.remove(id, owner)
}

/// Get the projection `id` belonging to `owner`, or `None` if there is no such projection.
pub fn get_projection(
    id: &str,
    owner: &OwnerId,
    store: &dyn ProjectionStore,
) -> Result<Option<ProjectionResponse>, Error> {
    Ok(store.get_by_id(id, owner)?.map(ProjectionResponse::from))
}

/// Get one page of the projections matching `filter`.
pub fn get_projection_page(
    filter: &PageFilter,
    store: &dyn ProjectionStore,
) -> Result<Page<ProjectionResponse>, Error> {
    read_page(
        filter,
        |period, owner| store.get_total_records(period, owner),
        |query| store.get_all(query),
        ProjectionResponse::from,
    )
}

#[cfg(test)]
mod create_projection_tests {
    use time::macros::date;

    use crate::{
        Error,
        family::Family,
        memory_store::InMemoryStore,
        owner::OwnerId,
        projection::CreateProjectionRequest,
    };

    use super::create_projection;

    fn get_test_store(family: Family) -> InMemoryStore {
        let store = InMemoryStore::new(family);
        store.add_category(1, "Rent");
        store.add_payment_method(1, "Debit");
        store
    }

    fn request(recurrence: u32) -> CreateProjectionRequest {
        CreateProjectionRequest {
            scheduled_date: date!(2024 - 01 - 15),
            incurred_date: None,
            description: "Rent".to_owned(),
            value: 450.0,
            is_passive: false,
            recurrence,
            category_id: 1,
            payment_method_id: Some(1),
        }
    }

    #[test]
    fn creates_single_projection() {
        let store = get_test_store(Family::Expense);

        let got = create_projection(request(0), &OwnerId::new("alice"), &store.projection_store())
            .unwrap();

        assert_eq!(got.recurrence, Some(1));
        assert_eq!(got.scheduled_date, date!(2024 - 01 - 15));
        assert_eq!(got.incurred_date, date!(2024 - 01 - 15));
        assert_eq!(got.category.as_deref(), Some("Rent"));
        assert_eq!(got.payment_method.as_deref(), Some("Debit"));
        assert!(!got.is_materialized);
        assert_eq!(store.projections().len(), 1);
    }

    #[test]
    fn recurrence_of_three_creates_three_months() {
        let store = get_test_store(Family::Expense);

        let got = create_projection(request(3), &OwnerId::new("alice"), &store.projection_store())
            .unwrap();

        assert_eq!(got.recurrence, Some(3));
        assert_eq!(got.scheduled_date, date!(2024 - 01 - 15));
        let mut projections = store.projections();
        projections.sort_by_key(|projection| projection.scheduled_date);
        let dates: Vec<_> = projections
            .iter()
            .map(|projection| projection.scheduled_date)
            .collect();
        assert_eq!(
            dates,
            vec![
                date!(2024 - 01 - 15),
                date!(2024 - 02 - 15),
                date!(2024 - 03 - 15)
            ]
        );
        for projection in projections {
            assert!(!projection.is_materialized);
            assert_eq!(projection.description, "Rent");
            assert_eq!(projection.value, 450.0);
            assert_eq!(projection.category.id, 1);
        }
    }

    #[test]
    fn income_ignores_payment_method() {
        let store = get_test_store(Family::Income);

        let got = create_projection(request(1), &OwnerId::new("alice"), &store.projection_store())
            .unwrap();

        assert_eq!(got.payment_method_id, None);
        assert_eq!(store.projections()[0].payment_method, None);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let store = get_test_store(Family::Expense);
        let mut request = request(2);
        request.category_id = 42;

        let result = create_projection(request, &OwnerId::new("alice"), &store.projection_store());

        assert_eq!(result, Err(Error::InvalidReference));
        assert!(store.projections().is_empty());
    }
}

#[cfg(test)]
mod update_projection_tests {
    use time::macros::date;

    use crate::{
        family::Family,
        memory_store::InMemoryStore,
        owner::OwnerId,
        projection::{
            CreateProjectionRequest, MaterializeOverride, UpdateProjectionRequest, materialize,
        },
    };

    use super::{create_projection, get_projection, update_projection};

    fn get_test_store() -> InMemoryStore {
        let store = InMemoryStore::new(Family::Expense);
        store.add_category(1, "Rent");
        store.add_category(2, "Utilities");
        store
    }

    fn update() -> UpdateProjectionRequest {
        UpdateProjectionRequest {
            scheduled_date: date!(2024 - 02 - 01),
            incurred_date: None,
            description: "Power".to_owned(),
            value: 99.0,
            is_passive: false,
            category_id: 2,
            payment_method_id: None,
        }
    }

    fn create(store: &InMemoryStore, owner: &OwnerId) -> String {
        create_projection(
            CreateProjectionRequest {
                scheduled_date: date!(2024 - 01 - 15),
                incurred_date: Some(date!(2024 - 01 - 10)),
                description: "Rent".to_owned(),
                value: 450.0,
                is_passive: false,
                recurrence: 1,
                category_id: 1,
                payment_method_id: None,
            },
            owner,
            &store.projection_store(),
        )
        .unwrap()
        .id
    }

    #[test]
    fn replaces_fields() {
        let store = get_test_store();
        let owner = OwnerId::new("alice");
        let id = create(&store, &owner);
        let before = get_projection(&id, &owner, &store.projection_store())
            .unwrap()
            .unwrap();

        let got = update_projection(&id, update(), &owner, &store.projection_store())
            .unwrap()
            .unwrap();

        assert_eq!(got.id, id);
        assert_eq!(got.created_at, before.created_at);
        assert_eq!(got.scheduled_date, date!(2024 - 02 - 01));
        assert_eq!(got.incurred_date, date!(2024 - 02 - 01));
        assert_eq!(got.description, "Power");
        assert_eq!(got.value, 99.0);
        assert_eq!(got.category.as_deref(), Some("Utilities"));
        assert_eq!(got.recurrence, None);
    }

    #[test]
    fn preserves_materialization_flag() {
        let store = get_test_store();
        let owner = OwnerId::new("alice");
        let id = create(&store, &owner);
        materialize(
            &id,
            &owner,
            &MaterializeOverride::default(),
            &store.projection_store(),
        )
        .unwrap();

        update_projection(&id, update(), &owner, &store.projection_store()).unwrap();

        let got = get_projection(&id, &owner, &store.projection_store())
            .unwrap()
            .unwrap();
        assert!(got.is_materialized);
        assert_eq!(got.description, "Power");
    }

    #[test]
    fn missing_projection_returns_none() {
        let store = get_test_store();

        let got = update_projection(
            "missing",
            update(),
            &OwnerId::new("alice"),
            &store.projection_store(),
        );

        assert_eq!(got, Ok(None));
    }

    #[test]
    fn other_owner_returns_none_and_changes_nothing() {
        let store = get_test_store();
        let id = create(&store, &OwnerId::new("alice"));

        let got = update_projection(&id, update(), &OwnerId::new("bob"), &store.projection_store());

        assert_eq!(got, Ok(None));
        assert_eq!(store.projections()[0].description, "Rent");
    }
}
