//! Razorpay integration via REST API (no SDK dependency)

use hmac::{Hmac, Mac};
use sha2::Sha256;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Provider tag recorded on payments confirmed through this module
pub const PROVIDER: &str = "razorpay";

/// Create a Razorpay Order for a checkout.
///
/// `notes.order_id` carries our order id; the webhook handler requires it to
/// correlate the payment back to the order, so it MUST be set here.
pub async fn create_order(
    key_id: &str,
    key_secret: &str,
    amount_paise: i64,
    currency: &str,
    order_id: &str,
) -> Result<String, BoxError> {
    let client = reqwest::Client::new();
    let resp: serde_json::Value = client
        .post("https://api.razorpay.com/v1/orders")
        .basic_auth(key_id, Some(key_secret))
        .json(&serde_json::json!({
            "amount": amount_paise,
            "currency": currency,
            "receipt": order_id,
            "notes": { "order_id": order_id },
        }))
        .send()
        .await?
        .json()
        .await?;

    resp["id"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| format!("Razorpay create_order failed: {resp}").into())
}

/// Verify a Razorpay webhook signature (hex HMAC-SHA256 of the raw body)
///
/// Must run over the exact bytes received, before any JSON parsing.
pub fn verify_webhook_signature(
    payload: &[u8],
    sig_header: &str,
    secret: &str,
) -> Result<(), &'static str> {
    if sig_header.is_empty() {
        return Err("Empty signature header");
    }

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).map_err(|_| "HMAC key error")?;
    mac.update(payload);

    // Decode hex signature and use constant-time comparison via verify_slice
    let sig_bytes = hex::decode(sig_header).map_err(|_| "Invalid signature hex")?;
    mac.verify_slice(&sig_bytes)
        .map_err(|_| "Webhook signature mismatch")?;

    Ok(())
}

/// Rupees to paise, the unit Razorpay bills in
pub fn to_paise(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(payload: &[u8], secret: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_valid_signature_accepted() {
        let payload = br#"{"event":"payment.captured","payload":{}}"#;
        let sig = sign(payload, "whsec_test");
        assert!(verify_webhook_signature(payload, &sig, "whsec_test").is_ok());
    }

    #[test]
    fn test_tampered_body_rejected() {
        // Well-formed JSON with an inflated amount but a stale signature
        let original = br#"{"event":"payment.captured","amount":100}"#;
        let tampered = br#"{"event":"payment.captured","amount":100000}"#;
        let sig = sign(original, "whsec_test");
        assert!(verify_webhook_signature(tampered, &sig, "whsec_test").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let payload = br#"{"event":"order.paid"}"#;
        let sig = sign(payload, "whsec_other");
        assert!(verify_webhook_signature(payload, &sig, "whsec_test").is_err());
    }

    #[test]
    fn test_malformed_signature_rejected() {
        let payload = br#"{"event":"order.paid"}"#;
        assert!(verify_webhook_signature(payload, "not-hex!", "whsec_test").is_err());
        assert!(verify_webhook_signature(payload, "", "whsec_test").is_err());
    }

    #[test]
    fn test_to_paise() {
        assert_eq!(to_paise(899.0), 89900);
        assert_eq!(to_paise(0.5), 50);
        assert_eq!(to_paise(1798.99), 179899);
    }
}
