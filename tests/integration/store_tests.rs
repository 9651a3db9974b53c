use std::fs;
use std::sync::Arc;
use tg_dolmetscher::persistence::{
    JsonFilePersistence, MemoryPersistence, Persistence, CLIENTS_FILE, TRANSLATORS_FILE, USERS_FILE,
};
use tg_dolmetscher::store::{Collections, ProfileStore, Role};

use super::test_utils::{collections_with, TestAssertions, TestClientBuilder, TestTranslatorBuilder};
use super::{memory_store, TestStore};

#[tokio::test]
async fn test_save_and_reload_round_trip() {
    let test_store = TestStore::create_fresh();

    let translator = TestTranslatorBuilder::new(100)
        .city("Berlin")
        .level("B1")
        .price("20,5")
        .create(&test_store.store)
        .await;
    let client = TestClientBuilder::new(200)
        .city("Munich")
        .create(&test_store.store)
        .await;

    let reopened = test_store.reopen();

    assert_eq!(reopened.translator(100).await, Some(translator));
    assert_eq!(reopened.client(200).await, Some(client));
    TestAssertions::assert_role(&reopened, 100, Some(Role::Translator)).await;
    TestAssertions::assert_role(&reopened, 200, Some(Role::Client)).await;
    assert_eq!(reopened.snapshot().await, test_store.store.snapshot().await);
}

#[tokio::test]
async fn test_files_are_keyed_by_stringified_user_id() {
    let test_store = TestStore::create_fresh();
    TestTranslatorBuilder::new(100).create(&test_store.store).await;

    let dir = test_store.dir.path();
    for file in [USERS_FILE, TRANSLATORS_FILE, CLIENTS_FILE] {
        assert!(dir.join(file).exists(), "{} should be written", file);
        assert!(!dir.join(format!("{}.tmp", file)).exists(), "{} temp file left behind", file);
    }

    let users: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join(USERS_FILE)).unwrap()).unwrap();
    assert_eq!(users["100"], "translator");

    let translators: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join(TRANSLATORS_FILE)).unwrap()).unwrap();
    assert_eq!(translators["100"]["city"], "Berlin");
    assert_eq!(translators["100"]["language_level"], "B2");
    assert_eq!(translators["100"]["price"], "25");

    let clients: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join(CLIENTS_FILE)).unwrap()).unwrap();
    assert!(clients.as_object().unwrap().is_empty());
}

#[tokio::test]
async fn test_loads_records_without_embedded_user_id() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(USERS_FILE), r#"{"7": "translator", "8": "client"}"#).unwrap();
    fs::write(
        dir.path().join(TRANSLATORS_FILE),
        r#"{"7": {"name": "Olga", "city": "Hamburg", "language_level": "C1", "price": "30€", "contact": "@olga"}}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join(CLIENTS_FILE),
        r#"{"8": {"city": "Hamburg"}}"#,
    )
    .unwrap();

    let store = ProfileStore::open(Arc::new(JsonFilePersistence::new(dir.path()).unwrap()));

    let translator = store.translator(7).await.expect("translator should load");
    assert_eq!(translator.user_id, 7);
    assert_eq!(translator.price, "30€");

    let client = store.client(8).await.expect("client should load");
    assert_eq!(client.user_id, 8);
    assert_eq!(client.service_needed, "");
    assert!(!client.registration_complete);
}

#[tokio::test]
async fn test_corrupt_file_starts_empty_without_losing_others() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(USERS_FILE), r#"{"7": "client"}"#).unwrap();
    fs::write(dir.path().join(TRANSLATORS_FILE), "{ not json").unwrap();

    let persistence = JsonFilePersistence::new(dir.path()).unwrap();
    let data = persistence.load();

    assert!(data.translators.is_empty());
    assert!(data.clients.is_empty());
    assert_eq!(data.users.get(&7), Some(&Role::Client));
}

#[tokio::test]
async fn test_missing_data_dir_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("bot").join("data");

    let persistence = JsonFilePersistence::new(&nested).unwrap();
    assert!(nested.is_dir());
    assert_eq!(persistence.dir(), nested.as_path());
    assert_eq!(persistence.load(), Collections::default());
}

#[tokio::test]
async fn test_every_mutation_writes_through() {
    let (backend, store) = memory_store();

    store.set_role(1, Role::Client).await;
    assert_eq!(backend.save_count(), 1);

    TestClientBuilder::new(1).create(&store).await;
    assert_eq!(backend.save_count(), 2);
    assert_eq!(backend.stored(), store.snapshot().await);

    // reads never save
    store.clients().await;
    store.dashboard_stats().await;
    assert_eq!(backend.save_count(), 2);
}

#[tokio::test]
async fn test_role_change_removes_other_profile() {
    let (_, store) = memory_store();

    TestTranslatorBuilder::new(5).create(&store).await;
    store.set_role(5, Role::Client).await;
    assert!(store.translator(5).await.is_none());

    TestClientBuilder::new(5).create(&store).await;
    TestTranslatorBuilder::new(5).create(&store).await;
    assert!(store.client(5).await.is_none());
    assert_eq!(store.role(5).await, Some(Role::Translator));
}

#[tokio::test]
async fn test_city_queries_ignore_case() {
    let (_, store) = memory_store();
    TestTranslatorBuilder::new(1).city("Berlin").create(&store).await;
    TestTranslatorBuilder::new(2).city("berlin").create(&store).await;
    TestTranslatorBuilder::new(3).city("Munich").create(&store).await;
    TestClientBuilder::new(4).city("MUNICH").create(&store).await;

    assert_eq!(store.translators_in_city("BERLIN").await.len(), 2);
    assert_eq!(store.translators_in_city("Hamburg").await.len(), 0);
    assert_eq!(store.clients_in_city("munich").await.len(), 1);
}

#[tokio::test]
async fn test_dashboard_stats_list_unique_sorted_cities() {
    let backend = Arc::new(MemoryPersistence::with_data(collections_with(
        vec![
            TestTranslatorBuilder::new(1).city("Munich").build(),
            TestTranslatorBuilder::new(2).city("Berlin").build(),
            TestTranslatorBuilder::new(3).city("Berlin").build(),
        ],
        vec![TestClientBuilder::new(4).city("Köln").build()],
    )));
    let store = ProfileStore::open(backend);

    let stats = store.dashboard_stats().await;
    assert_eq!(stats.translator_count, 3);
    assert_eq!(stats.client_count, 1);
    assert_eq!(stats.cities.translators, vec!["Berlin".to_string(), "Munich".to_string()]);
    assert_eq!(stats.cities.clients, vec!["Köln".to_string()]);
}

#[tokio::test]
async fn test_failing_backend_keeps_memory_authoritative() {
    let backend = Arc::new(MemoryPersistence::failing());
    let store = ProfileStore::open(backend.clone());

    TestTranslatorBuilder::new(1).create(&store).await;

    assert!(store.translator(1).await.is_some());
    assert_eq!(backend.save_count(), 1);
    assert_eq!(backend.stored(), Collections::default());
    assert!(store.flush().await.is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writes_all_reach_disk() {
    let test_store = TestStore::create_fresh();

    let tasks: Vec<_> = (1..=20)
        .map(|id| {
            let store = test_store.store.clone();
            tokio::spawn(async move {
                if id % 2 == 0 {
                    TestTranslatorBuilder::new(id).create(&store).await;
                } else {
                    TestClientBuilder::new(id).create(&store).await;
                }
            })
        })
        .collect();
    for task in tasks {
        task.await.expect("writer task panicked");
    }

    let reopened = test_store.reopen();
    assert_eq!(reopened.translators().await.len(), 10);
    assert_eq!(reopened.clients().await.len(), 10);
    assert_eq!(reopened.snapshot().await, test_store.store.snapshot().await);
}
