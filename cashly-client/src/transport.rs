use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use serde_json::Value;
use surf::{Client, Url};
use utils::query::QueryParams;
use utils::surf_logging::SurfLogging;

/// Fetches JSON documents from the Cashly backend
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, path: &str, query: &QueryParams) -> ApiResult<Value>;
}

/// HTTP transport over `surf`
#[derive(Clone)]
pub struct SurfTransport {
    http: Client,
    base_url: Url,
}

impl SurfTransport {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            http: Client::new().with(SurfLogging),
            base_url,
        })
    }

    fn url_for(&self, path: &str, query: &QueryParams) -> Url {
        let mut url = self.base_url.clone();
        let base_path = self.base_url.path().trim_end_matches('/');
        url.set_path(&format!("{}{}", base_path, path));
        url.set_query(None);
        query.apply_to(&mut url);
        url
    }
}

#[async_trait]
impl Transport for SurfTransport {
    async fn get_json(&self, path: &str, query: &QueryParams) -> ApiResult<Value> {
        let url = self.url_for(path, query);
        let mut response = self
            .http
            .get(url)
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.body_string().await.unwrap_or_default();
            return Err(ApiError::Http {
                status: u16::from(status),
                message,
            });
        }

        response
            .body_json::<Value>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_keeps_base_path() {
        let transport = SurfTransport::new("https://cashly.test/api/").unwrap();
        let url = transport.url_for(
            "/budgets/progress",
            &QueryParams::new().with("walletId", 42),
        );

        assert_eq!(
            url.as_str(),
            "https://cashly.test/api/budgets/progress?walletId=42"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            SurfTransport::new("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            SurfTransport::new("mailto:team@cashly.test"),
            Err(ApiError::InvalidUrl(_))
        ));
    }
}
