use fkm::error::ErrorKind;
use fkm::sync::{StoreLocation, synchronize};
use fkm_remote::{Client, LayoutAddress, MockTransport};
use fkm_store::{Database, Repository, RevisionWrite};
use rstest::rstest;
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;

const ADDRESS: &str = "https://configure.zsa.io/ErgoDox/layouts/abcd1234/efgh5678/";
const METADATA: &str = r#"{"version":"1","keycodes":{}}"#;

fn response(hash: &str, title: &str) -> String {
    format!(r#"{{"Data":{{"layout":{{"title":"{title}","revision":{{"hashId":"{hash}","layers":[]}}}}}}}}"#)
}

fn data(hash: &str, title: &str) -> Vec<u8> {
    format!(r#"{{"layout":{{"title":"{title}","revision":{{"hashId":"{hash}","layers":[]}}}}}}"#).into_bytes()
}

struct Fixture {
    _dir: tempfile::TempDir,
    store: StoreLocation,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = StoreLocation {
            path: dir.path().join(".keymapp").join("keymapp.sqlite3"),
            mkdir: true,
        };
        Self { _dir: dir, store }
    }

    async fn sync(&self, transport: Arc<MockTransport>) -> fkm::error::Result<fkm::sync::Report> {
        let client = Client::new(transport);
        let address = LayoutAddress::parse(ADDRESS).unwrap();
        synchronize(&client, &self.store, &address).await
    }

    async fn open(&self) -> (Database, Repository) {
        let db = Database::connect(&self.store.path).await.unwrap();
        let repo = Repository::from(&db);
        (db, repo)
    }
}

#[tokio::test]
async fn test_end_to_end_on_empty_store() {
    let fixture = Fixture::new();
    let transport = Arc::new(
        MockTransport::default()
            .with_revision(response("efgh5678", "Mine"))
            .with_metadata(METADATA),
    );
    let report = fixture.sync(transport.clone()).await.unwrap();
    assert_eq!(report.revision_id, "efgh5678");
    assert_eq!(report.revision_write, RevisionWrite::Inserted);
    assert_eq!(report.seeded_keys, 7);
    assert!(report.metadata_inserted);
    assert_eq!(transport.query_calls(), 1);
    assert_eq!(transport.metadata_calls(), 1);

    let (db, repo) = fixture.open().await;
    assert_eq!(repo.config_entries().await.unwrap().len(), 7);
    assert_eq!(repo.metadata_count().await.unwrap(), 1);
    assert_eq!(repo.metadata().await.unwrap().as_deref(), Some(METADATA.as_bytes()));
    assert_eq!(repo.revision_count().await.unwrap(), 1);
    assert_eq!(repo.revision("efgh5678").await.unwrap(), Some(data("efgh5678", "Mine")));
    db.close().await;
}

#[tokio::test]
async fn test_rerun_is_idempotent_and_replaces_revision_data() {
    let fixture = Fixture::new();
    let first = Arc::new(
        MockTransport::default()
            .with_revision(response("efgh5678", "Before"))
            .with_metadata(METADATA),
    );
    fixture.sync(first).await.unwrap();

    let second = Arc::new(
        MockTransport::default()
            .with_revision(response("efgh5678", "After"))
            .with_metadata("this must never be stored"),
    );
    let report = fixture.sync(second.clone()).await.unwrap();
    assert_eq!(report.revision_write, RevisionWrite::Replaced);
    assert_eq!(report.seeded_keys, 0);
    assert!(!report.metadata_inserted);
    assert_eq!(second.metadata_calls(), 0, "metadata must not be fetched when already stored");

    let (db, repo) = fixture.open().await;
    assert_eq!(repo.config_entries().await.unwrap().len(), 7);
    assert_eq!(repo.metadata().await.unwrap().as_deref(), Some(METADATA.as_bytes()));
    assert_eq!(repo.revision_count().await.unwrap(), 1);
    assert_eq!(repo.revision("efgh5678").await.unwrap(), Some(data("efgh5678", "After")));
    db.close().await;
}

#[tokio::test]
async fn test_canonical_revision_is_the_store_key() {
    let fixture = Fixture::new();
    // Asked for efgh5678, but the service says the canonical id is zzzz9999.
    let transport = Arc::new(
        MockTransport::default()
            .with_revision(response("zzzz9999", "Mine"))
            .with_metadata(METADATA),
    );
    fixture.sync(transport).await.unwrap();
    let (db, repo) = fixture.open().await;
    assert_eq!(repo.revision("efgh5678").await.unwrap(), None);
    assert!(repo.revision("zzzz9999").await.unwrap().is_some());
    db.close().await;
}

#[tokio::test]
async fn test_user_changed_config_survives() {
    let fixture = Fixture::new();
    let transport = || {
        Arc::new(
            MockTransport::default()
                .with_revision(response("efgh5678", "Mine"))
                .with_metadata(METADATA),
        )
    };
    fixture.sync(transport()).await.unwrap();

    // The desktop application changes a setting between runs.
    let pool = SqlitePool::connect_with(
        sqlx::sqlite::SqliteConnectOptions::new().filename(&fixture.store.path),
    )
    .await
    .unwrap();
    sqlx::query("UPDATE config SET value = '1' WHERE key = 'update_check'")
        .execute(&pool)
        .await
        .unwrap();
    pool.close().await;

    fixture.sync(transport()).await.unwrap();
    let (db, repo) = fixture.open().await;
    assert_eq!(repo.config_value("update_check").await.unwrap().as_deref(), Some("1"));
    assert_eq!(repo.config_entries().await.unwrap().len(), 7);
    db.close().await;
}

#[rstest]
#[case::unreachable(MockTransport::default(), ErrorKind::FetchFailed)]
#[case::malformed(MockTransport::default().with_revision(r#"{"Data":{"layout":null}}"#), ErrorKind::MalformedResponse)]
#[case::not_json(MockTransport::default().with_revision("<html></html>"), ErrorKind::MalformedResponse)]
#[tokio::test]
async fn test_revision_failure_leaves_no_store(#[case] transport: MockTransport, #[case] expected: ErrorKind) {
    let fixture = Fixture::new();
    let transport = Arc::new(transport.with_metadata(METADATA));
    let err = fixture.sync(transport.clone()).await.unwrap_err();
    assert_eq!(*err, expected);
    assert_eq!(transport.metadata_calls(), 0);
    assert!(!fixture.store.path.exists());
}

#[tokio::test]
async fn test_metadata_failure_leaves_revision_unrecorded() {
    let fixture = Fixture::new();
    let transport = Arc::new(MockTransport::default().with_revision(response("efgh5678", "Mine")));
    let err = fixture.sync(transport).await.unwrap_err();
    assert_eq!(*err, ErrorKind::FetchFailed);

    // Schema and defaults are in place; a re-run picks up from there.
    let (db, repo) = fixture.open().await;
    assert_eq!(repo.config_entries().await.unwrap().len(), 7);
    assert_eq!(repo.metadata_count().await.unwrap(), 0);
    assert_eq!(repo.revision_count().await.unwrap(), 0);
    db.close().await;
}

#[tokio::test]
async fn test_invalid_address_is_rejected_before_any_request() {
    let settings = fkm_config::Settings {
        database: std::path::PathBuf::from("/nonexistent/keymapp.sqlite3"),
        ..Default::default()
    };
    let err = fkm::run(&settings, "https://configure.zsa.io/ErgoDox/layouts").await.unwrap_err();
    assert_eq!(*err, ErrorKind::InvalidAddress);
}
