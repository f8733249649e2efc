use crate::error::DashboardError;
use crate::models::context::Context;
use cashly_client::{BudgetProgress, DashboardSummary, Period, Reminder, ReminderKind, Wallet};
use chrono::{Local, NaiveDate};

/// Mount every widget of the dashboard at once.
///
/// The overview and budget widgets both show the wallet's budget progress;
/// the coordinator sends that request only once.
pub async fn run(ctx: &Context, period: Period) -> Result<(), DashboardError> {
    let client = ctx.client();
    let wallet_id = *ctx.config().wallet_id();

    let (wallets, overview, budgets, reminders, summary) = tokio::join!(
        client.wallets(),
        client.budget_progress(wallet_id),
        client.budget_progress(wallet_id),
        client.reminders(),
        client.dashboard_summary(period),
    );
    let today = Local::now().date_naive();

    println!("{}", render_wallets(&wallets?));
    println!("{}", render_summary(&summary?, &overview?));
    println!("{}", render_budgets(&budgets?));
    println!("{}", render_reminders(&reminders?, today));

    log::debug!("Coordinator stats after summary: {:?}", ctx.stats());
    Ok(())
}

fn render_wallets(wallets: &[Wallet]) -> String {
    let mut lines = vec!["Wallets".to_string()];
    for wallet in wallets {
        let shared = if wallet.is_family { " (family)" } else { "" };
        lines.push(format!(
            "  {:<20} {:>12.2} {}{}",
            wallet.name, wallet.balance, wallet.currency, shared
        ));
    }
    lines.join("\n")
}

fn render_summary(summary: &DashboardSummary, progress: &[BudgetProgress]) -> String {
    let exceeded = progress.iter().filter(|budget| budget.is_exceeded()).count();
    let mut lines = vec![
        format!("Overview ({})", summary.period),
        format!("  Income   {:>12.2}", summary.total_income),
        format!("  Expenses {:>12.2}", summary.total_expense),
        format!("  Net      {:>12.2}", summary.net()),
        format!("  Budgets over limit: {}", exceeded),
    ];
    for category in &summary.top_categories {
        lines.push(format!("  - {:<18} {:>10.2}", category.category_name, category.total));
    }
    lines.join("\n")
}

fn render_budgets(progress: &[BudgetProgress]) -> String {
    let mut lines = vec!["Budgets".to_string()];
    for budget in progress {
        let filled = ((budget.ratio().min(1.0)) * 20.0).round() as usize;
        lines.push(format!(
            "  {:<16} [{}{}] {:>9.2} left",
            budget.category_name,
            "#".repeat(filled),
            ".".repeat(20 - filled),
            budget.remaining()
        ));
    }
    lines.join("\n")
}

fn render_reminders(reminders: &[Reminder], today: NaiveDate) -> String {
    let mut upcoming: Vec<_> = reminders.iter().filter(|r| !r.is_done).collect();
    upcoming.sort_by_key(|reminder| reminder.due_date);

    let mut lines = vec!["Reminders".to_string()];
    for reminder in upcoming {
        let direction = match reminder.kind {
            ReminderKind::Payment => "pay",
            ReminderKind::Receivable => "collect",
        };
        let due = if reminder.is_overdue(today) {
            format!("overdue by {} days", -reminder.days_left(today))
        } else {
            format!("in {} days", reminder.days_left(today))
        };
        lines.push(format!(
            "  {:<20} {} {:.2}, {}",
            reminder.title, direction, reminder.amount, due
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget(name: &str, limit: f64, spent: f64) -> BudgetProgress {
        BudgetProgress {
            budget_id: 1,
            category_name: name.to_string(),
            limit,
            spent,
        }
    }

    #[test]
    fn test_budget_bar_is_capped() {
        let rendered = render_budgets(&[budget("Groceries", 100.0, 50.0), budget("Taxi", 10.0, 30.0)]);
        let lines: Vec<_> = rendered.lines().collect();

        assert!(lines[1].contains("[##########..........]"));
        assert!(lines[2].contains("[####################]"));
        assert!(lines[2].contains("-20.00 left"));
    }

    #[test]
    fn test_reminders_sorted_and_done_hidden() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let reminder = |title: &str, due: (i32, u32, u32), kind, is_done| Reminder {
            id: 1,
            title: title.to_string(),
            amount: 10.0,
            due_date: NaiveDate::from_ymd_opt(due.0, due.1, due.2).unwrap(),
            kind,
            is_done,
        };
        let rendered = render_reminders(
            &[
                reminder("Internet", (2024, 6, 20), ReminderKind::Payment, false),
                reminder("Loan to Sam", (2024, 6, 7), ReminderKind::Receivable, false),
                reminder("Gym", (2024, 6, 1), ReminderKind::Payment, true),
            ],
            today,
        );
        let lines: Vec<_> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("Loan to Sam"));
        assert!(lines[1].contains("collect 10.00, overdue by 3 days"));
        assert!(lines[2].contains("pay 10.00, in 10 days"));
    }

    #[test]
    fn test_summary_counts_exceeded_budgets() {
        let summary = DashboardSummary {
            period: Period::Week,
            total_income: 500.0,
            total_expense: 200.0,
            top_categories: vec![],
        };
        let rendered = render_summary(&summary, &[budget("Taxi", 10.0, 30.0)]);

        assert!(rendered.starts_with("Overview (week)"));
        assert!(rendered.contains("Net            300.00"));
        assert!(rendered.contains("Budgets over limit: 1"));
    }
}
