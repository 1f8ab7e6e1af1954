//! Client Configuration

/// Default API origin of a locally running storefront backend
pub const DEFAULT_API_URL: &str = "http://localhost:8001";

/// Storefront client configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// API origin; endpoints live under `{base_url}/api`
    pub base_url: String,

    /// Bearer token for authenticated endpoints
    pub token: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.into(),
            token: None,
        }
    }
}

impl StorefrontConfig {
    /// Read `STOREFRONT_API_URL` and `STOREFRONT_TOKEN`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("STOREFRONT_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.into());
        let token = lookup("STOREFRONT_TOKEN").filter(|v| !v.trim().is_empty());

        Self { base_url, token }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}
