use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::{json, Value};

use freshcart_inventory::StoreError;
use freshcart_orders::PlaceOrderError;

pub fn place_order_error_to_response(err: PlaceOrderError) -> axum::response::Response {
    match err {
        PlaceOrderError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        PlaceOrderError::ProductNotFound { product_id } => json_error_with(
            StatusCode::NOT_FOUND,
            "product_not_found",
            format!("Product {product_id} not found"),
            json!({ "product_id": product_id }),
        ),
        PlaceOrderError::InsufficientStock {
            product_id,
            product_name,
            requested,
            available,
        } => json_error_with(
            StatusCode::BAD_REQUEST,
            "insufficient_stock",
            format!("Insufficient stock for {product_name}"),
            json!({
                "product_id": product_id.to_string(),
                "product_name": product_name,
                "requested": requested,
                "available": available,
            }),
        ),
        PlaceOrderError::Store(e) => store_error_to_response(e),
    }
}

/// Log the store failure and answer with a generic 500.
pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    tracing::error!(error = %err, "store failure while handling request");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "Failed to process request",
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    json_error_with(status, code, message, Value::Null)
}

/// Like [`json_error`], with extra top-level fields merged into the payload.
pub fn json_error_with(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
    extra: Value,
) -> axum::response::Response {
    let mut body = json!({
        "error": code,
        "message": message.into(),
    });
    if let (Some(body), Value::Object(extra)) = (body.as_object_mut(), extra) {
        body.extend(extra);
    }
    (status, axum::Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use freshcart_core::ProductId;

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn insufficient_stock_names_the_product() {
        let id = ProductId::new();
        let response = place_order_error_to_response(PlaceOrderError::InsufficientStock {
            product_id: id,
            product_name: "Organic Bananas".to_string(),
            requested: 5,
            available: 3,
        });

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "insufficient_stock");
        assert_eq!(body["message"], "Insufficient stock for Organic Bananas");
        assert_eq!(body["product_id"], id.to_string());
        assert_eq!(body["available"], 3);
    }

    #[tokio::test]
    async fn store_failures_hide_internal_detail() {
        let response = place_order_error_to_response(PlaceOrderError::Store(
            StoreError::backend("connection refused to 10.0.0.7"),
        ));

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "internal_error");
        assert!(!body.to_string().contains("10.0.0.7"));
    }

    #[tokio::test]
    async fn plain_errors_carry_only_code_and_message() {
        let response = json_error(StatusCode::NOT_FOUND, "not_found", "Order not found");
        let body = body_json(response).await;
        assert_eq!(body, json!({ "error": "not_found", "message": "Order not found" }));
    }
}
