mod common;

use common::{write_files, MemoryStore, RecordingInvalidator};
use s3deploy_core::models::format_last_modified;
use s3deploy_core::{DeployError, DeploymentRequest, DeploymentResult, StoreError};
use s3deploy_engine::{Deployer, FileInspector, LocalFileInspector, RetryPolicy, SyncOptions};
use std::path::Path;
use std::sync::Arc;

fn deployer(store: &Arc<MemoryStore>) -> Deployer {
    Deployer::new(store.clone()).with_retry_policy(RetryPolicy::immediate())
}

async fn local_tag(path: &Path) -> String {
    let instant = LocalFileInspector.last_modified(path).await.unwrap();
    format_last_modified(&instant)
}

#[tokio::test]
async fn uploads_only_changed_files() {
    let dir = tempfile::tempdir().unwrap();
    write_files(dir.path(), &[("foo.txt", "new"), ("bar.yml", "same: true")]);

    let store = Arc::new(MemoryStore::new());
    let bar_tag = local_tag(&dir.path().join("bar.yml")).await;
    store.insert("myBucket", "bar.yml", Some(bar_tag.as_str()));

    let result = deployer(&store)
        .upload_changed_files_in_dir(dir.path(), "myBucket", SyncOptions::default())
        .await
        .unwrap();

    assert_eq!(
        result,
        DeploymentResult::new(vec!["foo.txt".to_string()], "Upload complete!")
    );
    assert_eq!(store.puts(), 1);
    assert!(store.object("myBucket", "foo.txt").is_some());
}

#[tokio::test]
async fn empty_directory_short_circuits() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());

    let result = deployer(&store)
        .upload_changed_files_in_dir(dir.path(), "myBucket", SyncOptions::default())
        .await
        .unwrap();

    assert!(result.changed_files.is_empty());
    assert_eq!(result.message, "No files found at specified path");
    assert_eq!(store.heads(), 0);
}

#[tokio::test]
async fn second_run_without_changes_uploads_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_files(
        dir.path(),
        &[("index.html", "<html>"), ("static/css/site.css", "body {}")],
    );
    let store = Arc::new(MemoryStore::new());
    let deployer = deployer(&store);

    let first = deployer
        .upload_changed_files_in_dir(dir.path(), "myBucket", SyncOptions::default())
        .await
        .unwrap();
    assert_eq!(first.changed_files, vec!["index.html", "static/css/site.css"]);
    assert_eq!(first.message, "Upload complete!");

    let second = deployer
        .upload_changed_files_in_dir(dir.path(), "myBucket", SyncOptions::default())
        .await
        .unwrap();
    assert!(second.changed_files.is_empty());
    assert_eq!(second.message, "No file updates required, skipping upload...");
    assert_eq!(store.puts(), 2);
}

#[tokio::test]
async fn stale_remote_metadata_triggers_upload() {
    let dir = tempfile::tempdir().unwrap();
    write_files(dir.path(), &[("a.txt", "a"), ("b.txt", "b"), ("c.txt", "c")]);

    let store = Arc::new(MemoryStore::new());
    store.insert("myBucket", "a.txt", Some("2007-09-12T15:48:06.228Z"));
    store.insert("myBucket", "b.txt", None);
    let c_tag = local_tag(&dir.path().join("c.txt")).await;
    store.insert("myBucket", "c.txt", Some(c_tag.as_str()));

    let result = deployer(&store)
        .upload_changed_files_in_dir(dir.path(), "myBucket", SyncOptions::default())
        .await
        .unwrap();

    assert_eq!(result.changed_files, vec!["a.txt", "b.txt"]);
}

#[tokio::test]
async fn reupload_skips_change_detection() {
    let dir = tempfile::tempdir().unwrap();
    write_files(dir.path(), &[("a.txt", "a"), ("b.yml", "b: 1")]);

    let store = Arc::new(MemoryStore::new());
    let options = SyncOptions {
        reupload_all: true,
        verbose: false,
    };

    let result = deployer(&store)
        .upload_changed_files_in_dir(dir.path(), "myBucket", options)
        .await
        .unwrap();

    assert_eq!(store.heads(), 0);
    assert_eq!(result.changed_files, vec!["a.txt", "b.yml"]);
    assert_eq!(result.message, "Upload complete!");
    assert_eq!(store.puts(), 2);
}

#[tokio::test]
async fn invalid_paths_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    write_files(dir.path(), &[("index.html", "<html>")]);
    let store = Arc::new(MemoryStore::new());
    let deployer = deployer(&store);

    let err = deployer
        .upload_changed_files_in_dir(
            &dir.path().join("index.html"),
            "myBucket",
            SyncOptions::default(),
        )
        .await
        .unwrap_err();
    assert!(err
        .to_string()
        .starts_with("Specified path is not a directory"));

    let err = deployer
        .upload_changed_files_in_dir(
            &dir.path().join("missing"),
            "myBucket",
            SyncOptions::default(),
        )
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("Specified path does not exist"));
}

#[tokio::test]
async fn probe_failure_aborts_without_upload() {
    let dir = tempfile::tempdir().unwrap();
    write_files(dir.path(), &[("a.txt", "a")]);

    let store = Arc::new(MemoryStore::new());
    store.fail_heads(StoreError::new("Bad Request").with_status(400));

    let err = deployer(&store)
        .upload_changed_files_in_dir(dir.path(), "myBucket", SyncOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::BadRequest));
    assert_eq!(store.puts(), 0);
}

#[tokio::test]
async fn exhausted_upload_fails_deployment() {
    let dir = tempfile::tempdir().unwrap();
    write_files(dir.path(), &[("foo.txt", "foo")]);

    let store = Arc::new(MemoryStore::new());
    store.fail_puts(5, StoreError::new("Service Unavailable").with_status(503));

    let err = deployer(&store)
        .upload_changed_files_in_dir(dir.path(), "myBucket", SyncOptions::default())
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Error: Unable to process object foo.txt, reattempted for 5 (MAX)"
    );
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn non_utf8_file_names_are_uploaded() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempfile::tempdir().unwrap();
    write_files(dir.path(), &[("ok.txt", "ok")]);
    std::fs::write(dir.path().join(OsStr::from_bytes(b"caf\xe9.txt")), "latin-1").unwrap();

    let store = Arc::new(MemoryStore::new());
    let result = deployer(&store)
        .upload_changed_files_in_dir(dir.path(), "myBucket", SyncOptions::default())
        .await
        .unwrap();

    assert_eq!(result.changed_files.len(), 2);
    assert_eq!(store.puts(), 2);
    assert!(store.object("myBucket", "ok.txt").is_some());

    let odd = store.object("myBucket", "caf\u{FFFD}.txt").unwrap();
    assert_eq!(&odd.body[..], b"latin-1");
    assert!(odd.metadata.contains_key("Last-Modified"));
}

fn request(root: &Path, distribution: Option<&str>, reupload_all: bool) -> DeploymentRequest {
    let mut request = DeploymentRequest::new(root, "myBucket").unwrap();
    request.distribution_id = distribution.map(String::from);
    request.reupload_all = reupload_all;
    request
}

#[tokio::test]
async fn deploy_invalidates_changed_paths() {
    let dir = tempfile::tempdir().unwrap();
    write_files(dir.path(), &[("index.html", "<html>"), ("static/app.js", "js")]);

    let store = Arc::new(MemoryStore::new());
    let invalidator = Arc::new(RecordingInvalidator::default());
    let deployer = deployer(&store).with_invalidator(invalidator.clone());

    let result = deployer
        .deploy(&request(dir.path(), Some("E2QWRUHAPOMQZL"), false))
        .await
        .unwrap();

    assert_eq!(result.changed_files, vec!["index.html", "static/app.js"]);
    assert_eq!(result.invalidation_id.as_deref(), Some("I2J0I21PCUYOIK"));
    assert_eq!(
        result.message,
        "Invalidation with ID I2J0I21PCUYOIK has started for 2 changed files!"
    );

    let requests = invalidator.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, "E2QWRUHAPOMQZL");
    assert_eq!(requests[0].1, vec!["/index.html", "/static/app.js"]);
}

#[tokio::test]
async fn deploy_with_reupload_invalidates_wildcard() {
    let dir = tempfile::tempdir().unwrap();
    write_files(dir.path(), &[("index.html", "<html>")]);

    let store = Arc::new(MemoryStore::new());
    let invalidator = Arc::new(RecordingInvalidator::default());
    let deployer = deployer(&store).with_invalidator(invalidator.clone());

    deployer
        .deploy(&request(dir.path(), Some("E2QWRUHAPOMQZL"), true))
        .await
        .unwrap();

    let requests = invalidator.requests.lock().unwrap();
    assert_eq!(requests[0].1, vec!["/*"]);
}

#[tokio::test]
async fn deploy_skips_invalidation_without_changes() {
    let dir = tempfile::tempdir().unwrap();
    write_files(dir.path(), &[("index.html", "<html>")]);

    let store = Arc::new(MemoryStore::new());
    let tag = local_tag(&dir.path().join("index.html")).await;
    store.insert("myBucket", "index.html", Some(tag.as_str()));

    let invalidator = Arc::new(RecordingInvalidator::default());
    let deployer = deployer(&store).with_invalidator(invalidator.clone());

    let result = deployer
        .deploy(&request(dir.path(), Some("E2QWRUHAPOMQZL"), false))
        .await
        .unwrap();

    assert_eq!(result.message, "No file updates required, skipping upload...");
    assert_eq!(result.invalidation_id, None);
    assert!(invalidator.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn deploy_without_distribution_returns_upload_result() {
    let dir = tempfile::tempdir().unwrap();
    write_files(dir.path(), &[("index.html", "<html>")]);

    let store = Arc::new(MemoryStore::new());
    let result = deployer(&store)
        .deploy(&request(dir.path(), None, false))
        .await
        .unwrap();

    assert_eq!(result.changed_files, vec!["index.html"]);
    assert_eq!(result.message, "Upload complete!");
}

#[tokio::test]
async fn invalidation_errors_are_classified() {
    let dir = tempfile::tempdir().unwrap();
    write_files(dir.path(), &[("index.html", "<html>")]);

    let store = Arc::new(MemoryStore::new());
    let invalidator = Arc::new(RecordingInvalidator {
        failure: Some(StoreError::new("User is not authorized").with_code("AccessDenied")),
        ..Default::default()
    });
    let deployer = deployer(&store).with_invalidator(invalidator);

    let err = deployer
        .deploy(&request(dir.path(), Some("E2QWRUHAPOMQZL"), false))
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::AccessDenied));
    assert!(store.object("myBucket", "index.html").is_some());
}

#[tokio::test]
async fn missing_cdn_client_fails_before_any_upload() {
    let dir = tempfile::tempdir().unwrap();
    write_files(dir.path(), &[("index.html", "<html>")]);

    let store = Arc::new(MemoryStore::new());
    let err = deployer(&store)
        .deploy(&request(dir.path(), Some("E2QWRUHAPOMQZL"), false))
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::Config(_)));
    assert!(err.to_string().contains("E2QWRUHAPOMQZL"));
    assert_eq!(store.heads(), 0);
    assert_eq!(store.puts(), 0);
}
