use strum_macros::{Display, EnumIter, EnumString};

/// REST endpoints served by the Cashly backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Endpoint {
    Wallets,
    Categories,
    Budgets,
    BudgetProgress,
    Reminders,
    Transactions,
    TransactionsSearch,
    DashboardSummary,
    DashboardReport,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Wallets => "/wallets",
            Endpoint::Categories => "/categories",
            Endpoint::Budgets => "/budgets",
            Endpoint::BudgetProgress => "/budgets/progress",
            Endpoint::Reminders => "/reminders",
            Endpoint::Transactions | Endpoint::TransactionsSearch => "/transactions",
            Endpoint::DashboardSummary => "/dashboard/summary",
            Endpoint::DashboardReport => "/dashboard/report",
        }
    }
}
