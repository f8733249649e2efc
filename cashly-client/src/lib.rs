mod endpoint;
mod error;
mod key;
pub mod models;
mod transport;


pub use endpoint::Endpoint;
pub use error::{ApiError, ApiResult};
pub use key::RequestKey;
pub use models::budget::{Budget, BudgetProgress};
pub use models::category::{Category, Flow};
pub use models::dashboard::{CategoryTotal, DashboardReport, DashboardSummary, Period, ReportPoint};
pub use models::reminder::{Reminder, ReminderKind};
pub use models::transaction::{Transaction, TransactionFilter};
pub use models::wallet::{FamilyWalletMember, Wallet};
pub use transport::{SurfTransport, Transport};

// Re-export coordinator types
pub use request_coordinator::{CoordinatorConfig, CoordinatorStats, RequestCoordinator};

use getset::Getters;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use utils::query::QueryParams;

/// Coordinator shared by every request of a client. Responses are shared as
/// raw JSON and decoded by each caller.
pub type ResponseCoordinator = RequestCoordinator<ApiResult<Value>>;

/// Client for the Cashly REST API.
///
/// Identical requests issued while one is in flight are sent once, and
/// search-as-you-type requests are debounced.
#[derive(Clone, Getters)]
pub struct CashlyClient {
    transport: Arc<dyn Transport>,
    #[get = "pub"]
    coordinator: ResponseCoordinator,
}

impl CashlyClient {
    /// Create a client talking HTTP to `base_url`
    pub fn new(base_url: &str, config: CoordinatorConfig) -> ApiResult<Self> {
        let transport = SurfTransport::new(base_url)?;
        Ok(Self::with_transport(
            Arc::new(transport),
            RequestCoordinator::new(config),
        ))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, coordinator: ResponseCoordinator) -> Self {
        Self {
            transport,
            coordinator,
        }
    }

    pub async fn wallets(&self) -> ApiResult<Vec<Wallet>> {
        self.get(Endpoint::Wallets, QueryParams::new()).await
    }

    pub async fn categories(&self) -> ApiResult<Vec<Category>> {
        self.get(Endpoint::Categories, QueryParams::new()).await
    }

    /// Budgets of a month (`YYYY-MM`)
    pub async fn budgets(&self, month: &str) -> ApiResult<Vec<Budget>> {
        self.get(Endpoint::Budgets, QueryParams::new().with("month", month))
            .await
    }

    pub async fn budget_progress(&self, wallet_id: i64) -> ApiResult<Vec<BudgetProgress>> {
        let key = RequestKey::for_wallet(Endpoint::BudgetProgress, wallet_id);
        let query = QueryParams::new().with("walletId", wallet_id);
        let payload = self.fetch(Endpoint::BudgetProgress, key, query).await?;
        Self::decode(payload)
    }

    pub async fn reminders(&self) -> ApiResult<Vec<Reminder>> {
        self.get(Endpoint::Reminders, QueryParams::new()).await
    }

    pub async fn transactions(&self, filter: &TransactionFilter) -> ApiResult<Vec<Transaction>> {
        self.get(Endpoint::Transactions, filter.to_query()).await
    }

    pub async fn dashboard_summary(&self, period: Period) -> ApiResult<DashboardSummary> {
        self.get(
            Endpoint::DashboardSummary,
            QueryParams::new().with("period", period),
        )
        .await
    }

    pub async fn dashboard_report(&self, period: Period) -> ApiResult<DashboardReport> {
        self.get(
            Endpoint::DashboardReport,
            QueryParams::new().with("period", period),
        )
        .await
    }

    /// Search transactions as the user types.
    ///
    /// Calls made while the user is still typing are collapsed: once the
    /// configured delay passes without a new call, the most recent query is
    /// sent and every pending search resolves with its results. A query still
    /// in flight is never reused for a different one.
    pub async fn search_transactions(&self, query: &str) -> ApiResult<Vec<Transaction>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(vec![]);
        }

        let transport = Arc::clone(&self.transport);
        let params = QueryParams::new().with("search", query);
        log::debug!("Queueing transaction search for: {:?}", query);

        // One debounce timer for the search box, one request per distinct query
        let request_key = RequestKey::new(Endpoint::TransactionsSearch, &params);
        let payload = self
            .coordinator
            .debounced_request_as(
                RequestKey::for_endpoint(Endpoint::TransactionsSearch),
                request_key,
                move || async move {
                    transport
                        .get_json(Endpoint::TransactionsSearch.path(), &params)
                        .await
                },
            )
            .await?;
        Self::decode(payload)
    }

    /// Get coordinator statistics
    pub fn coordinator_stats(&self) -> CoordinatorStats {
        self.coordinator.stats()
    }

    /// Forget in-flight requests and cancel pending searches
    pub fn clear_pending(&self) {
        self.coordinator.clear();
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: Endpoint, query: QueryParams) -> ApiResult<T> {
        let key = RequestKey::new(endpoint, &query);
        let payload = self.fetch(endpoint, key, query).await?;
        Self::decode(payload)
    }

    async fn fetch(&self, endpoint: Endpoint, key: RequestKey, query: QueryParams) -> ApiResult<Value> {
        let transport = Arc::clone(&self.transport);
        self.coordinator
            .deduplicate(key, move || async move {
                transport.get_json(endpoint.path(), &query).await
            })
            .await
    }

    fn decode<T: DeserializeOwned>(payload: Value) -> ApiResult<T> {
        serde_json::from_value(payload).map_err(|e| ApiError::Decode(e.to_string()))
    }
}
