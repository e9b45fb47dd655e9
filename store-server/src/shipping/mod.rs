//! Delivery-partner integration via REST API (no SDK dependency)
//!
//! Calls are synchronously awaited with the HTTP client's default timeout;
//! there is no retry policy here. A failed call surfaces as a 500 so the
//! admin UI can offer a retry.

use crate::db::models::Order;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shipment created by the delivery partner
#[derive(Debug, Clone)]
pub struct Shipment {
    pub tracking_number: String,
    pub manifest_id: String,
}

/// Register a shipment for a dispatched order.
///
/// Returns the partner's tracking number and manifest id.
pub async fn create_shipment(
    base_url: &str,
    api_token: &str,
    order: &Order,
) -> Result<Shipment, BoxError> {
    let client = reqwest::Client::new();
    let resp: serde_json::Value = client
        .post(format!("{base_url}/v1/shipments"))
        .bearer_auth(api_token)
        .json(&serde_json::json!({
            "order_id": order.id_string(),
            "consignee": {
                "name": order.shipping_address.name,
                "line1": order.shipping_address.line1,
                "line2": order.shipping_address.line2,
                "city": order.shipping_address.city,
                "state": order.shipping_address.state,
                "postal_code": order.shipping_address.postal_code,
                "phone": order.shipping_address.phone,
            },
            "cod": false,
            "declared_value": order.total,
            "items": order
                .items
                .iter()
                .map(|item| serde_json::json!({
                    "name": item.name,
                    "quantity": item.quantity,
                    "price": item.price,
                }))
                .collect::<Vec<_>>(),
        }))
        .send()
        .await?
        .json()
        .await?;

    let tracking_number = resp["tracking_number"]
        .as_str()
        .ok_or_else(|| format!("Shipping partner create_shipment failed: {resp}"))?
        .to_string();
    let manifest_id = resp["manifest_id"].as_str().unwrap_or_default().to_string();

    tracing::info!(
        order_id = %order.id_string(),
        tracking_number = %tracking_number,
        "Shipment created"
    );

    Ok(Shipment {
        tracking_number,
        manifest_id,
    })
}

/// Fetch the partner's current delivery status for a tracking number
pub async fn track_shipment(
    base_url: &str,
    api_token: &str,
    tracking_number: &str,
) -> Result<String, BoxError> {
    let client = reqwest::Client::new();
    let resp: serde_json::Value = client
        .get(format!("{base_url}/v1/shipments/{tracking_number}"))
        .bearer_auth(api_token)
        .send()
        .await?
        .json()
        .await?;

    resp["status"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| format!("Shipping partner track_shipment failed: {resp}").into())
}
