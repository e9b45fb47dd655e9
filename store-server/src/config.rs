//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Storefront server configuration
///
/// All settings come from environment variables (a `.env` file is loaded in
/// development). Secrets are mandatory outside the development environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Embedded database path
    pub database_path: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT signing secret
    pub jwt_secret: String,
    /// Razorpay API key id
    pub razorpay_key_id: String,
    /// Razorpay API key secret
    pub razorpay_key_secret: String,
    /// Razorpay webhook signing secret; webhooks are rejected with 500 when
    /// unset
    pub razorpay_webhook_secret: Option<String>,
    /// Billing currency (Razorpay minor units)
    pub currency: String,
    /// SES sender email address
    pub ses_from_email: String,
    /// Inbox for staff notifications (cancellation requests)
    pub support_email: String,
    /// Delivery partner API base URL
    pub shipping_api_url: String,
    /// Delivery partner API token
    pub shipping_api_token: String,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development
    /// environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/store.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            razorpay_key_id: Self::require_secret("RAZORPAY_KEY_ID", &environment)?,
            razorpay_key_secret: Self::require_secret("RAZORPAY_KEY_SECRET", &environment)?,
            razorpay_webhook_secret: std::env::var("RAZORPAY_WEBHOOK_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            currency: std::env::var("CURRENCY").unwrap_or_else(|_| "INR".into()),
            ses_from_email: std::env::var("SES_FROM_EMAIL")
                .unwrap_or_else(|_| "noreply@example.com".into()),
            support_email: std::env::var("SUPPORT_EMAIL")
                .unwrap_or_else(|_| "support@example.com".into()),
            shipping_api_url: std::env::var("SHIPPING_API_URL")
                .unwrap_or_else(|_| "https://api.shipping-partner.example".into()),
            shipping_api_token: Self::require_secret("SHIPPING_API_TOKEN", &environment)?,
            environment,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
