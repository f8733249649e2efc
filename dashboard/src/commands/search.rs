use crate::error::DashboardError;
use crate::models::context::Context;
use cashly_client::Transaction;
use std::time::Duration;

/// Replay `text` as if typed into the search box, one keystroke per
/// configured interval, and print the results every keystroke receives.
pub async fn run(ctx: &Context, text: &str) -> Result<(), DashboardError> {
    let interval = Duration::from_millis(*ctx.config().keystroke_interval_ms());

    let mut searches = vec![];
    for query in keystrokes(text) {
        let client = ctx.client().clone();
        log::debug!("Typed: {:?}", query);
        searches.push(tokio::spawn(async move {
            client.search_transactions(&query).await
        }));
        tokio::time::sleep(interval).await;
    }

    let mut results = vec![];
    for search in searches {
        match search.await {
            Ok(found) => results = found?,
            Err(e) => log::warn!("Search task failed: {}", e),
        }
    }

    println!("{}", render_results(text, &results));
    log::debug!("Coordinator stats after search: {:?}", ctx.stats());
    Ok(())
}

/// Every prefix of `text`, the way a search box sees it while typing
fn keystrokes(text: &str) -> Vec<String> {
    text.char_indices()
        .map(|(index, c)| text[..index + c.len_utf8()].to_string())
        .collect()
}

fn render_results(text: &str, transactions: &[Transaction]) -> String {
    let mut lines = vec![format!(
        "{} transactions matching {:?}",
        transactions.len(),
        text
    )];
    for transaction in transactions {
        lines.push(format!(
            "  {}  {:>10.2}  {}",
            transaction.date,
            transaction.signed_amount(),
            transaction.note.as_deref().unwrap_or("-")
        ));
    }
    lines.join("\n")
}
