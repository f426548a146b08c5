use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use landed_cost::{app, config::Config, AppState};

fn router() -> Router {
    app(AppState::new(Config::default()))
}

async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn assert_close(actual: &Value, expected: f64) {
    let actual = actual.as_f64().expect("number");
    assert!(
        (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
        "expected {expected}, got {actual}"
    );
}

fn tea() -> Value {
    json!({
        "type_of_packaging": "carton",
        "product_name": "Tea in 15-piece packs (30 grams)",
        "weight_per_carton": 4.0,
        "quantity_per_package": 10,
        "packages_per_carton": 5,
        "cartons_per_container": 20,
        "price_per_carton": 50.0
    })
}

#[tokio::test]
async fn health_reports_healthy() {
    let response = router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn unit_costs_reference_scenario() {
    let (status, json) = post_json(
        "/costing/unit-costs",
        json!({
            "product": tea(),
            "shipping": {
                "shipping_cost_per_shipment": 200.0,
                "customs_fees_per_shipment": 100.0,
                "sales_tax_percentage": 16.0
            }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["items_per_carton"], 50);
    assert_eq!(json["items_per_container"], 1000);
    assert_close(&json["total_cost_per_item"], 1.46);
    assert_close(&json["total_cost_per_carton"], 73.0);
    assert_close(&json["total_cost_per_container"], 1460.0);
    assert_close(&json["total_cost_per_carton_jod"], 73.0 * 0.710);
}

#[tokio::test]
async fn unit_costs_rejects_zero_quantity() {
    let mut product = tea();
    product["packages_per_carton"] = json!(0);

    let (status, json) = post_json(
        "/costing/unit-costs",
        json!({
            "product": product,
            "shipping": { "shipping_cost_per_shipment": 0.0, "customs_fees_per_shipment": 0.0 }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error_type"], "invalid_quantity");
    assert_eq!(json["details"]["field"], "packages_per_carton");
}

#[tokio::test]
async fn apportion_two_products() {
    let mut a = tea();
    a["packages_per_carton"] = json!(6);
    a["cartons_per_container"] = json!(10);
    let mut b = tea();
    b["packages_per_carton"] = json!(4);
    b["cartons_per_container"] = json!(10);

    let (status, json) = post_json(
        "/costing/apportion",
        json!({
            "products": [a, b],
            "shipping": { "shipping_cost_per_shipment": 100.0, "customs_fees_per_shipment": 0.0 }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_close(&json[0]["shipping_cost_per_shipment"], 60.0);
    assert_close(&json[1]["shipping_cost_per_shipment"], 40.0);
}

#[tokio::test]
async fn apportion_empty_shipment() {
    let (status, json) = post_json(
        "/costing/apportion",
        json!({
            "products": [],
            "shipping": { "shipping_cost_per_shipment": 100.0, "customs_fees_per_shipment": 0.0 }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error_type"], "empty_shipment");
}

#[tokio::test]
async fn selling_price_tiers() {
    for (tier, expected) in [
        ("bulk", 200.0),
        ("distributor", 250.0),
        ("retail", 300.0),
        ("vip", 100.0),
    ] {
        let (status, json) = post_json(
            "/costing/selling-price",
            json!({ "cost_per_carton": 100.0, "buyer_type": tier, "cartons_for_sale": 2 }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["buyer_type"], tier);
        assert_close(&json["selling_price"], expected);
        assert_close(&json["profit"], (expected - 100.0) * 2.0);
    }
}

#[tokio::test]
async fn container_recalculates_everything() {
    let id = "6f1c1d2e-0a4b-4c3d-9e8f-1a2b3c4d5e6f";
    let mut item = tea();
    item["id"] = json!(id);
    item["buyer_type"] = json!("retail");

    let (status, json) = post_json(
        "/costing/container",
        json!({
            "items": [item],
            "shipping": {
                "shipping_cost_per_shipment": 200.0,
                "customs_fees_per_shipment": 100.0,
                "sales_tax_percentage": 16.0
            },
            "cartons_to_sell": { id: 5 }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["items"][0]["id"], id);
    assert_close(&json["items"][0]["results"]["total_cost_per_carton"], 73.0);
    assert_eq!(json["positions"][0]["cartons_to_sell"], 5);
    assert_eq!(json["positions"][0]["available_cartons"], 15);
    assert_close(&json["positions"][0]["profit"], 146.0 * 5.0);
    assert_eq!(json["totals"]["total_items"], 1000);
    assert_close(&json["totals"]["total_profit"], 730.0);
    assert_close(&json["summary"]["rows"][0]["percentage_of_container_cost"], 100.0);
}

#[tokio::test]
async fn document_quotation_in_jod() {
    let id = "0d9b6b8e-7c55-4e0e-b8a0-5b8f8c1f2a10";
    let mut item = tea();
    item["id"] = json!(id);

    let (status, json) = post_json(
        "/costing/documents",
        json!({
            "kind": "quotation",
            "items": [item],
            "shipping": {
                "shipping_cost_per_shipment": 200.0,
                "customs_fees_per_shipment": 100.0,
                "sales_tax_percentage": 16.0
            },
            "selected_products": [{ "id": id, "quantity": 10 }],
            "buyer_type": "bulk",
            "currency": "JOD",
            "last_reference_number": 4,
            "buyer_name": "Amman Traders"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["reference"].as_str().unwrap().starts_with("Rabsin"));
    assert!(json["reference"].as_str().unwrap().ends_with("/005"));
    assert_eq!(json["currency"], "JOD");
    // 146 USD per carton, 10 cartons, 16% tax
    assert_eq!(json["subtotal"], "1036.600");
    assert_eq!(json["sales_tax"], "165.856");
    assert_eq!(json["total"], "1202.456");
}

#[tokio::test]
async fn voucher_requires_invoice_number() {
    let (status, json) = post_json(
        "/costing/documents",
        json!({
            "kind": "voucher",
            "items": [tea()],
            "shipping": { "shipping_cost_per_shipment": 0.0, "customs_fees_per_shipment": 0.0 },
            "selected_products": []
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error_type"], "missing_field");
    assert_eq!(json["details"]["field"], "invoice_number");
}

#[tokio::test]
async fn import_keeps_unset_cells_unset() {
    let csv = "Type of Packaging,Product Name,Weight per Carton (kg),Quantity of Sticks,Packages per Carton,Cartons per Container,Price per Carton ($),Sales Tax (%)\n\
               Box,500-piece tea,9.5,500,,30,,16\n";

    let response = router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/costing/import")
                .header(header::CONTENT_TYPE, "text/csv")
                .body(Body::from(csv))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json[0]["product_name"], "500-piece tea");
    assert_eq!(json[0]["quantity_per_package"], 500);
    assert_eq!(json[0]["packages_per_carton"], Value::Null);
    assert_eq!(json[0]["price_per_carton"], Value::Null);
    assert_eq!(json[0]["buyer_type"], "bulk");
}

#[tokio::test]
async fn print_summary_renders_html() {
    let response = router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/costing/print/summary")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "items": [tea()],
                        "shipping": { "shipping_cost_per_shipment": 200.0, "customs_fees_per_shipment": 100.0 }
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Rabsin"));
    assert!(html.contains("Tea in 15-piece packs (30 grams)"));
    assert!(html.contains("100.00%"));
    // landed per-carton, per-item and per-package figures
    assert!(html.contains("$65.00"));
    assert!(html.contains("$1.3000"));
    assert!(html.contains("$13.00"));
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let mut product = tea();
    product["quantity_per_package"] = json!(2.5);

    let (status, json) = post_json("/costing/unit-costs", json!({ "product": product })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_type"], "invalid_body");
    assert!(json["message"]
        .as_str()
        .unwrap()
        .contains("quantity_per_package"));
}
