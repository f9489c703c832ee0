use std::time::Duration;

use bookmark_sync::{
    api::{create_router, AppState},
    models::{BookmarkQuery, BookmarkSnapshot},
    BookmarkError, BookmarkStore, HttpBookmarkStore, ItemId, MediaItem, UserId,
};

/// Serves the reference bookmark service on an ephemeral port
async fn spawn_service() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(AppState::new());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/api", addr)
}

async fn client() -> HttpBookmarkStore {
    HttpBookmarkStore::new(spawn_service().await, Duration::from_secs(5)).unwrap()
}

fn snapshot(item: &MediaItem) -> BookmarkSnapshot {
    BookmarkSnapshot::from(item)
}

#[tokio::test]
async fn test_round_trip_over_http() {
    let store = client().await;
    let user = UserId::from("u1");
    let dune = MediaItem::movie("7", "Dune", "2021-10-22").with_backdrop("/dune.jpg");

    let created = store.add(&user, &dune.id, &snapshot(&dune)).await.unwrap();
    assert_eq!(created.item_id, dune.id);
    assert_eq!(created.snapshot.backdrop_path.as_deref(), Some("/dune.jpg"));

    let listed = store
        .list(&BookmarkQuery::new(user.clone(), None))
        .await
        .unwrap();
    assert_eq!(listed, vec![created]);

    store.remove(&user, &dune.id).await.unwrap();
    let listed = store.list(&BookmarkQuery::new(user, None)).await.unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_server_errors_map_to_taxonomy() {
    let store = client().await;
    let user = UserId::from("u1");
    let dune = MediaItem::movie("7", "Dune", "2021-10-22");

    store.add(&user, &dune.id, &snapshot(&dune)).await.unwrap();

    let conflict = store.add(&user, &dune.id, &snapshot(&dune)).await.unwrap_err();
    assert_eq!(conflict, BookmarkError::Conflict("Item is already bookmarked".to_string()));

    let missing = store.remove(&user, &ItemId::from("404")).await.unwrap_err();
    assert_eq!(missing, BookmarkError::NotFound("Bookmark not found".to_string()));

    let invalid = store
        .add(&user, &ItemId::from("8"), &BookmarkSnapshot::default())
        .await
        .unwrap_err();
    assert!(matches!(invalid, BookmarkError::Validation(_)));
}

#[tokio::test]
async fn test_keyword_passed_through() {
    let store = client().await;
    let user = UserId::from("u1");
    let dune = MediaItem::movie("7", "Dune", "2021-10-22");
    let heat = MediaItem::movie("949", "Heat", "1995-12-15");

    store.add(&user, &dune.id, &snapshot(&dune)).await.unwrap();
    store.add(&user, &heat.id, &snapshot(&heat)).await.unwrap();

    let listed = store
        .list(&BookmarkQuery::new(user, Some("heat".to_string())))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].item_id.as_str(), "949");
}

#[tokio::test]
async fn test_unreachable_store_is_transport_error() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store =
        HttpBookmarkStore::new(format!("http://{}/api", addr), Duration::from_secs(2)).unwrap();
    let err = store
        .list(&BookmarkQuery::new(UserId::from("u1"), None))
        .await
        .unwrap_err();

    assert_eq!(err, BookmarkError::Transport(None));
}

#[tokio::test]
async fn test_wrong_base_path_is_transport_error() {
    let base = spawn_service().await;
    let store = HttpBookmarkStore::new(
        base.replace("/api", "/elsewhere"),
        Duration::from_secs(5),
    )
    .unwrap();
    let user = UserId::from("u1");
    let dune = MediaItem::movie("7", "Dune", "2021-10-22");

    let listed = store.list(&BookmarkQuery::new(user.clone(), None)).await;
    assert!(matches!(listed, Err(BookmarkError::Transport(_))));

    let added = store.add(&user, &dune.id, &snapshot(&dune)).await;
    assert!(matches!(added, Err(BookmarkError::Transport(_))));
}
