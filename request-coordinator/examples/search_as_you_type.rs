use request_coordinator::{CoordinatorConfig, RequestCoordinator};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    let coordinator = RequestCoordinator::<Vec<String>>::new(CoordinatorConfig::new(
        Duration::from_millis(300),
    ));
    let fetches = Arc::new(AtomicUsize::new(0));

    // Example 1: Two widgets mounting at once share one request
    println!("=== Deduplication ===");
    let fetch_wallets = |fetches: Arc<AtomicUsize>| {
        move || async move {
            fetches.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(200)).await;
            vec!["Cash".to_string(), "Savings".to_string()]
        }
    };
    let start = Instant::now();
    let (sidebar, overview) = tokio::join!(
        coordinator.deduplicate("wallets", fetch_wallets(fetches.clone())),
        coordinator.deduplicate("wallets", fetch_wallets(fetches.clone())),
    );
    println!("Both widgets got {:?} in {:?}", sidebar, start.elapsed());
    println!("Network calls: {}", fetches.load(Ordering::SeqCst));
    assert_eq!(sidebar, overview);

    // Example 2: Typing a search query only fetches once the user pauses
    println!("\n=== Debouncing ===");
    let search = coordinator.debounce("transactions-search", |query: String| async move {
        println!("Searching transactions for {:?}", query);
        vec![format!("{} (3 matches)", query)]
    });
    let mut last = None;
    for query in ["g", "gr", "gro", "groc"] {
        last = Some(search.call(query.to_string()));
        tokio::time::sleep(Duration::from_millis(120)).await;
    }
    if let Some(last) = last {
        println!("Results: {:?}", last.await);
    }

    println!("\nCoordinator stats: {:?}", coordinator.stats());
    coordinator.dispose();

    Ok(())
}
