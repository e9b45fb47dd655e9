//! Application state

use aws_sdk_sesv2::Client as SesClient;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::config::Config;
use crate::db::DbService;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
///
/// Cloned into every handler; everything inside is cheap shared ownership.
#[derive(Clone)]
pub struct AppState {
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// AWS SES client for transactional email
    pub ses: SesClient,
    /// JWT signing secret
    pub jwt_secret: String,
    /// Razorpay API key id
    pub razorpay_key_id: String,
    /// Razorpay API key secret
    pub razorpay_key_secret: String,
    /// Razorpay webhook signing secret (None = webhooks rejected)
    pub razorpay_webhook_secret: Option<String>,
    /// Billing currency
    pub currency: String,
    /// SES sender address
    pub ses_from_email: String,
    /// Staff notification inbox
    pub support_email: String,
    /// Delivery partner API base URL
    pub shipping_api_url: String,
    /// Delivery partner API token
    pub shipping_api_token: String,
}

impl AppState {
    /// Initialize state: database (schema registered once here) + AWS clients
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let db_service = DbService::new(&config.database_path).await?;

        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let ses = SesClient::new(&aws_config);

        Ok(Self {
            db: db_service.db,
            ses,
            jwt_secret: config.jwt_secret.clone(),
            razorpay_key_id: config.razorpay_key_id.clone(),
            razorpay_key_secret: config.razorpay_key_secret.clone(),
            razorpay_webhook_secret: config.razorpay_webhook_secret.clone(),
            currency: config.currency.clone(),
            ses_from_email: config.ses_from_email.clone(),
            support_email: config.support_email.clone(),
            shipping_api_url: config.shipping_api_url.clone(),
            shipping_api_token: config.shipping_api_token.clone(),
        })
    }
}
