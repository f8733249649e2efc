use super::category::Flow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utils::query::QueryParams;

#[cfg(feature = "graphql")]
use async_graphql::SimpleObject;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(SimpleObject))]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub wallet_id: i64,
    pub category_id: i64,
    pub amount: f64,
    #[serde(rename = "type")]
    pub flow: Flow,
    pub note: Option<String>,
    pub date: NaiveDate,
}

impl Transaction {
    /// Amount with its sign: negative for expenses
    pub fn signed_amount(&self) -> f64 {
        match self.flow {
            Flow::Income => self.amount,
            Flow::Expense => -self.amount,
        }
    }
}

/// Filters accepted by the transactions endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub wallet_id: Option<i64>,
    pub category_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub search: Option<String>,
}

impl TransactionFilter {
    pub fn for_wallet(wallet_id: i64) -> Self {
        Self {
            wallet_id: Some(wallet_id),
            ..Self::default()
        }
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn matching(mut self, search: &str) -> Self {
        self.search = Some(search.to_string());
        self
    }

    pub fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .with_opt("walletId", self.wallet_id)
            .with_opt("categoryId", self.category_id)
            .with_opt("from", self.from.map(|date| date.format("%Y-%m-%d")))
            .with_opt("to", self.to.map(|date| date.format("%Y-%m-%d")))
            .with_opt("search", self.search.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_query() {
        let filter = TransactionFilter::for_wallet(3)
            .between(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            )
            .matching("coffee");

        assert_eq!(
            filter.to_query().to_query_string(),
            "from=2024-01-01&search=coffee&to=2024-01-31&walletId=3"
        );
        assert!(TransactionFilter::default().to_query().is_empty());
    }

    #[test]
    fn test_signed_amount() {
        let transaction: Transaction = serde_json::from_str(
            r#"{ "id": 1, "walletId": 3, "categoryId": 9, "amount": 4.5, "type": "expense", "note": "Coffee", "date": "2024-01-12" }"#,
        )
        .unwrap();

        assert_eq!(transaction.flow, Flow::Expense);
        assert_eq!(transaction.signed_amount(), -4.5);
    }
}
