use std::time::Duration;

use bookstock::{
    book::{Book, BookQuery},
    core::store::{InventoryStore, StoreError},
    runtime::{
        events::InventoryEvent,
        handle::{spawn_inventory, RuntimeConfig, RuntimeError},
    },
    telemetry,
};

async fn next_event(sub: &mut tokio::sync::broadcast::Receiver<InventoryEvent>) -> InventoryEvent {
    tokio::time::timeout(Duration::from_secs(1), sub.recv())
        .await
        .expect("event timeout")
        .expect("recv")
}

#[tokio::test]
async fn runtime_mutations_queries_and_events_ordered() {
    telemetry::init();
    let handle = spawn_inventory(InventoryStore::new(), RuntimeConfig::default());
    let mut sub = handle.subscribe();

    handle
        .add_book(Book::new(1, "Dune", "Frank Herbert", 350.0, 5))
        .await
        .expect("add");
    handle
        .add_book(Book::new(2, "Clean Code", "Robert C. Martin", 500.0, 1))
        .await
        .expect("add");
    assert_eq!(handle.purchase_book(1, 3).await.expect("purchase"), 2);
    assert_eq!(handle.restock_book(2, 4).await.expect("restock"), 5);
    handle.delete_book(1).await.expect("delete");

    let hits = handle
        .search_books(BookQuery::default().title("code"))
        .await
        .expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(handle.get(1).await.expect("get"), None);

    let expected = [
        InventoryEvent::BookAdded { id: 1 },
        InventoryEvent::BookAdded { id: 2 },
        InventoryEvent::StockChanged { id: 1, stock: 2 },
        InventoryEvent::StockChanged { id: 2, stock: 5 },
        InventoryEvent::BookDeleted { id: 1 },
    ];
    for want in expected {
        assert_eq!(next_event(&mut sub).await, want);
    }

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn store_errors_pass_through_without_events() {
    let mut store = InventoryStore::new();
    store
        .add_book(Book::new(1, "Dune", "Frank Herbert", 350.0, 2))
        .expect("seed");
    let handle = spawn_inventory(store, RuntimeConfig::default());
    let mut sub = handle.subscribe();

    let err = handle.purchase_book(1, 10).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Store(StoreError::InsufficientStock { available: 2, .. })
    ));
    let err = handle.delete_book(9).await.unwrap_err();
    assert_eq!(err, RuntimeError::Store(StoreError::MissingBook(9)));
    assert_eq!(err.to_string(), "Book with this ID does not exist");

    handle.reset().await.expect("reset");
    assert_eq!(next_event(&mut sub).await, InventoryEvent::Cleared);
    assert!(handle.books().await.expect("books").is_empty());

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_purchases_never_oversell() {
    let mut store = InventoryStore::new();
    store
        .add_book(Book::new(7, "Atomic Habits", "James Clear", 250.0, 50))
        .expect("seed");
    let handle = spawn_inventory(store, RuntimeConfig::default());

    let mut tasks = Vec::new();
    for _ in 0..80 {
        let h = handle.clone();
        tasks.push(tokio::spawn(async move { h.purchase_book(7, 1).await }));
    }

    let mut sold = 0;
    for task in tasks {
        if task.await.expect("join").is_ok() {
            sold += 1;
        }
    }

    assert_eq!(sold, 50);
    let snapshot = handle.snapshot().await.expect("snapshot");
    assert_eq!(snapshot.books[0].stock, 0);

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn calls_after_shutdown_report_closed_channel() {
    let cfg = RuntimeConfig {
        command_queue_bound: 0,
        event_capacity: 0,
    };
    let handle = spawn_inventory(InventoryStore::new(), cfg);
    handle.shutdown().await.expect("shutdown");

    assert_eq!(handle.books().await, Err(RuntimeError::ChannelClosed));
}

#[test]
fn runtime_config_reads_partial_json() {
    let cfg: RuntimeConfig = serde_json::from_str(r#"{"event_capacity":16}"#).expect("parse");
    assert_eq!(cfg.event_capacity, 16);
    assert_eq!(cfg.command_queue_bound, RuntimeConfig::default().command_queue_bound);
}
