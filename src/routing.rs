//! Application router configuration.

use axum::{
    Router,
    extract::FromRef,
    http::StatusCode,
    middleware,
    response::Response,
    routing::{get, post},
};

use crate::{
    AppState,
    auth::{OwnerGuardState, owner_guard},
    category::{
        CategoryListState, PaymentMethodListState, list_categories_endpoint,
        list_payment_methods_endpoint,
    },
    endpoints,
    family::Family,
    logging_middleware,
    projection::{
        ProjectionState, create_projection_endpoint, delete_projection_endpoint,
        edit_projection_endpoint, get_projection_endpoint, list_projections_endpoint,
        materialize_projection_endpoint,
    },
    record::{
        RecordState, create_record_endpoint, delete_record_endpoint, edit_record_endpoint,
        get_record_endpoint, list_records_endpoint,
    },
    render_message,
};

/// Return a router with all the app's routes.
///
/// Every route requires an access token that resolves to an owner.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new().merge(
        Router::new()
            .route(endpoints::PAYMENT_METHODS, get(list_payment_methods_endpoint))
            .with_state(PaymentMethodListState::from_ref(&state)),
    );

    for family in Family::ALL {
        router = router
            .merge(projection_routes(&state, family))
            .merge(record_routes(&state, family))
            .merge(category_routes(&state, family));
    }

    router
        .route_layer(middleware::from_fn_with_state(
            OwnerGuardState::from_ref(&state),
            owner_guard,
        ))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
}

fn projection_routes(state: &AppState, family: Family) -> Router {
    Router::new()
        .route(
            family.projections_endpoint(),
            get(list_projections_endpoint).post(create_projection_endpoint),
        )
        .route(
            family.projection_endpoint(),
            get(get_projection_endpoint)
                .put(edit_projection_endpoint)
                .delete(delete_projection_endpoint),
        )
        .route(
            family.materialize_endpoint(),
            post(materialize_projection_endpoint),
        )
        .with_state(ProjectionState::for_family(state, family))
}

fn record_routes(state: &AppState, family: Family) -> Router {
    Router::new()
        .route(
            family.records_endpoint(),
            get(list_records_endpoint).post(create_record_endpoint),
        )
        .route(
            family.record_endpoint(),
            get(get_record_endpoint)
                .put(edit_record_endpoint)
                .delete(delete_record_endpoint),
        )
        .with_state(RecordState::for_family(state, family))
}

fn category_routes(state: &AppState, family: Family) -> Router {
    Router::new()
        .route(family.categories_endpoint(), get(list_categories_endpoint))
        .with_state(CategoryListState::for_family(state, family))
}

async fn get_404_not_found() -> Response {
    render_message(StatusCode::NOT_FOUND, "The requested resource does not exist")
}
