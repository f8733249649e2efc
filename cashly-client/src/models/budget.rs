use serde::{Deserialize, Serialize};

#[cfg(feature = "graphql")]
use async_graphql::SimpleObject;

/// Monthly spending limit for a category of a wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(SimpleObject))]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: i64,
    pub wallet_id: i64,
    pub category_id: i64,
    pub amount: f64,
    /// `YYYY-MM`
    pub month: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(SimpleObject))]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgress {
    pub budget_id: i64,
    pub category_name: String,
    pub limit: f64,
    pub spent: f64,
}

impl BudgetProgress {
    pub fn remaining(&self) -> f64 {
        self.limit - self.spent
    }

    pub fn is_exceeded(&self) -> bool {
        self.spent > self.limit
    }

    /// Share of the limit already spent, 0 when there is no limit
    pub fn ratio(&self) -> f64 {
        if self.limit <= 0.0 {
            return 0.0;
        }
        self.spent / self.limit
    }
}
