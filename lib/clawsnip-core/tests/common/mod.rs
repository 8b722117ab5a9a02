use clawsnip_core::{Operation, OperationRequest, OperationResponse};
use http::{Method, StatusCode};
use rstest::fixture;
use tracing::info;

pub fn init_tracing() {
    // should be run once, fail otherwise, we skip that error
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    info!("Tracing initialized");
}

/// Creation of an item, answered with a HAL document.
#[fixture]
pub fn create_item() -> Operation {
    init_tracing();

    let request = match OperationRequest::new(Method::POST, "http://localhost:8080/items") {
        Ok(request) => request,
        Err(error) => panic!("invalid request url: {error}"),
    };
    let request = request
        .with_context_path("/shop")
        .with_header("Content-Type", "application/json")
        .with_content(r#"{"name": "widget", "tags": ["new", "sale"]}"#);

    let response = OperationResponse::new(StatusCode::CREATED)
        .with_header("Content-Type", "application/hal+json")
        .with_content(
            r#"{
                "id": 42,
                "name": "widget",
                "tags": ["new", "sale"],
                "variants": [
                    {"sku": "W-1", "price": 10},
                    {"sku": "W-2", "price": "on request"}
                ],
                "_links": {
                    "self": {"href": "http://localhost:8080/shop/items/42"},
                    "collection": {"href": "http://localhost:8080/shop/items"}
                }
            }"#,
        );

    Operation::new(request, response)
}
