//! Endpoints for reading one projection or a page of projections.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    database_id::ProjectionId,
    owner::OwnerId,
    pagination::PageQueryParams,
    projection::{ProjectionState, get_projection, get_projection_page},
};

/// Respond with the projection in the path, or 404 if the caller has no such projection.
pub async fn get_projection_endpoint(
    Path(projection_id): Path<ProjectionId>,
    State(state): State<ProjectionState>,
    Extension(owner): Extension<OwnerId>,
) -> Result<Response, Error> {
    match get_projection(&projection_id, &owner, state.store.as_ref())? {
        Some(projection) => Ok(Json(projection).into_response()),
        None => Err(Error::NotFound),
    }
}

/// Respond with one page of the caller's projections for a month.
pub async fn list_projections_endpoint(
    State(state): State<ProjectionState>,
    Extension(owner): Extension<OwnerId>,
    Query(params): Query<PageQueryParams>,
) -> Result<Response, Error> {
    let filter = params.into_filter(owner, &state.pagination_config)?;

    let page = get_projection_page(&filter, state.store.as_ref()).inspect_err(|error| {
        tracing::error!("Could not read {} projections: {error}", state.store.family())
    })?;

    Ok(Json(page).into_response())
}

#[cfg(test)]
mod get_projection_endpoint_tests {
    use std::sync::Arc;

    use axum::{Extension, Router, routing::get};
    use axum_test::TestServer;
    use time::macros::date;

    use crate::{
        endpoints::{self, format_endpoint},
        family::Family,
        memory_store::InMemoryStore,
        owner::OwnerId,
        pagination::{Page, PaginationConfig},
        projection::{CreateProjectionRequest, ProjectionResponse, ProjectionState, create_projection},
    };

    use super::{get_projection_endpoint, list_projections_endpoint};

    fn get_test_server(store: &InMemoryStore, owner: &str) -> TestServer {
        let app = Router::new()
            .route(endpoints::INCOME_PROJECTIONS, get(list_projections_endpoint))
            .route(endpoints::INCOME_PROJECTION, get(get_projection_endpoint))
            .layer(Extension(OwnerId::new(owner)))
            .with_state(ProjectionState {
                store: Arc::new(store.projection_store()),
                pagination_config: PaginationConfig::default(),
            });

        TestServer::try_new(app).expect("Could not create test server.")
    }

    fn create(store: &InMemoryStore, recurrence: u32) -> ProjectionResponse {
        create_projection(
            CreateProjectionRequest {
                scheduled_date: date!(2024 - 01 - 25),
                incurred_date: None,
                description: "Salary".to_owned(),
                value: 1000.0,
                is_passive: false,
                recurrence,
                category_id: 1,
                payment_method_id: None,
            },
            &OwnerId::new("alice"),
            &store.projection_store(),
        )
        .unwrap()
    }

    fn get_test_store() -> InMemoryStore {
        let store = InMemoryStore::new(Family::Income);
        store.add_category(1, "Salary");
        store
    }

    #[tokio::test]
    async fn get_returns_projection() {
        let store = get_test_store();
        let created = create(&store, 1);
        let server = get_test_server(&store, "alice");

        let response = server
            .get(&format_endpoint(endpoints::INCOME_PROJECTION, &created.id))
            .await;

        response.assert_status_ok();
        let got = response.json::<ProjectionResponse>();
        assert_eq!(got.id, created.id);
        assert_eq!(got.recurrence, None);
    }

    #[tokio::test]
    async fn get_for_other_owner_is_not_found() {
        let store = get_test_store();
        let created = create(&store, 1);
        let server = get_test_server(&store, "bob");

        server
            .get(&format_endpoint(endpoints::INCOME_PROJECTION, &created.id))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn list_returns_page_for_month() {
        let store = get_test_store();
        create(&store, 3);
        let server = get_test_server(&store, "alice");

        let response = server
            .get(endpoints::INCOME_PROJECTIONS)
            .add_query_param("month", 2)
            .add_query_param("year", 2024)
            .await;

        response.assert_status_ok();
        let page = response.json::<Page<ProjectionResponse>>();
        assert_eq!(page.current_page, 1);
        assert_eq!(page.page_limit, 10);
        assert_eq!(page.total_records, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.records[0].scheduled_date, date!(2024 - 02 - 25));
    }

    #[tokio::test]
    async fn list_with_invalid_month_is_bad_request() {
        let store = get_test_store();
        let server = get_test_server(&store, "alice");

        server
            .get(endpoints::INCOME_PROJECTIONS)
            .add_query_param("month", 13)
            .add_query_param("year", 2024)
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn list_without_year_is_bad_request() {
        let store = get_test_store();
        let server = get_test_server(&store, "alice");

        server
            .get(endpoints::INCOME_PROJECTIONS)
            .add_query_param("month", 1)
            .await
            .assert_status_bad_request();
    }
}
