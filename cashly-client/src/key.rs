use crate::Endpoint;
use sha2::{Digest, Sha256};
use std::fmt;
use utils::query::QueryParams;

/// Coordinator key for a request: the endpoint plus everything that changes
/// its response
#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub struct RequestKey(String);

impl RequestKey {
    /// Key for an endpoint and its query parameters.
    /// The parameters are hashed in canonical order, so the same filter set
    /// always maps to the same key.
    pub fn new(endpoint: Endpoint, params: &QueryParams) -> Self {
        if params.is_empty() {
            return RequestKey(endpoint.to_string());
        }

        let mut hasher = Sha256::new();
        for (name, value) in params.canonical_pairs() {
            hasher.update(name.as_bytes());
            hasher.update(b"=");
            hasher.update(value.as_bytes());
            hasher.update(b"&");
        }

        let hash = hex::encode(hasher.finalize());
        RequestKey(format!("{}-{}", endpoint, &hash[..16]))
    }

    /// Key for an endpoint scoped to a single wallet
    pub fn for_wallet(endpoint: Endpoint, wallet_id: i64) -> Self {
        RequestKey(format!("{}-wallet-{}", endpoint, wallet_id))
    }

    /// Key shared by every call to an endpoint, whatever its parameters
    pub fn for_endpoint(endpoint: Endpoint) -> Self {
        RequestKey(endpoint.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<RequestKey> for String {
    fn from(key: RequestKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_key_generation() {
        let params = QueryParams::new().with("walletId", 7).with("search", "rent");

        let key1 = RequestKey::new(Endpoint::Transactions, &params);
        let key2 = RequestKey::new(Endpoint::Transactions, &params.clone());

        assert_eq!(key1, key2);
        assert!(key1.as_str().starts_with("transactions-"));

        // Different filters should produce different keys
        let other = QueryParams::new().with("walletId", 8).with("search", "rent");
        assert_ne!(key1, RequestKey::new(Endpoint::Transactions, &other));
    }

    #[test]
    fn test_parameter_order_does_not_matter() {
        let first = QueryParams::new().with("from", "2024-01-01").with("to", "2024-01-31");
        let second = QueryParams::new().with("to", "2024-01-31").with("from", "2024-01-01");

        assert_eq!(
            RequestKey::new(Endpoint::Transactions, &first),
            RequestKey::new(Endpoint::Transactions, &second)
        );
    }

    #[test]
    fn test_same_params_on_different_endpoints_do_not_collide() {
        let params = QueryParams::new().with("period", "month");

        assert_ne!(
            RequestKey::new(Endpoint::DashboardSummary, &params),
            RequestKey::new(Endpoint::DashboardReport, &params)
        );
    }

    #[test]
    fn test_readable_keys() {
        assert_eq!(
            RequestKey::for_wallet(Endpoint::BudgetProgress, 42).to_string(),
            "budget-progress-wallet-42"
        );
        assert_eq!(
            RequestKey::new(Endpoint::Wallets, &QueryParams::new()).as_str(),
            "wallets"
        );
        assert_eq!(
            String::from(RequestKey::for_endpoint(Endpoint::TransactionsSearch)),
            "transactions-search"
        );
    }
}
