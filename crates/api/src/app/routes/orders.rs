use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use freshcart_core::OrderId;

use crate::app::{dto, errors, services::AppServices};
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(place_order).get(list_my_orders))
        .route("/:id", get(get_order))
}

pub async fn place_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    body: Result<Json<dto::PlaceOrderRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                rejection.body_text(),
            );
        }
    };

    match services.place_order(body.into(), session.user_id()).await {
        Ok(order) => (
            StatusCode::CREATED,
            Json(dto::OrderPlacedResponse::from(&order)),
        )
            .into_response(),
        Err(e) => errors::place_order_error_to_response(e),
    }
}

pub async fn list_my_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    let Some(user_id) = session.user_id() else {
        return errors::json_error(
            StatusCode::UNAUTHORIZED,
            "not_authenticated",
            "Sign in to view your orders",
        );
    };

    match services.orders_for_user(user_id).await {
        Ok(orders) => Json(
            orders
                .iter()
                .map(dto::OrderResponse::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let not_found = || errors::json_error(StatusCode::NOT_FOUND, "not_found", "Order not found");

    let Ok(id) = id.parse::<OrderId>() else {
        return not_found();
    };

    match services.find_order(id).await {
        Ok(Some(order)) => Json(dto::OrderResponse::from(&order)).into_response(),
        Ok(None) => not_found(),
        Err(e) => errors::store_error_to_response(e),
    }
}
