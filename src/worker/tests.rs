//! Cache engine tests: lifecycle, arbitration, sync, push, and dispatcher.

use std::sync::Arc;

use dashmap::DashMap;
use url::Url;

use super::*;
use crate::utils::mime::types;

// ----------------------------------------------------------------------------
// Scripted network
// ----------------------------------------------------------------------------

/// Fake network: scripted responses and failures per URL, with call counting.
struct ScriptedFetcher {
    responses: DashMap<String, Response>,
    failures: DashMap<String, ()>,
    calls: DashMap<String, usize>,
}

impl ScriptedFetcher {
    fn new() -> Self {
        Self {
            responses: DashMap::new(),
            failures: DashMap::new(),
            calls: DashMap::new(),
        }
    }

    fn respond(&self, url: &str, response: Response) {
        self.responses.insert(url.to_string(), response);
        self.failures.remove(url);
    }

    fn fail(&self, url: &str) {
        self.failures.insert(url.to_string(), ());
    }

    fn calls_for(&self, url: &str) -> usize {
        self.calls.get(url).map(|c| *c).unwrap_or(0)
    }
}

impl Fetcher for ScriptedFetcher {
    fn fetch(&self, request: &Request) -> anyhow::Result<Response> {
        let key = request.url.as_str().to_string();
        *self.calls.entry(key.clone()).or_insert(0) += 1;

        if self.failures.contains_key(&key) {
            anyhow::bail!("network unreachable: {key}");
        }
        self.responses
            .get(&key)
            .map(|r| r.clone())
            .ok_or_else(|| anyhow::anyhow!("network unreachable: {key}"))
    }
}

// ----------------------------------------------------------------------------
// Fixtures
// ----------------------------------------------------------------------------

const ORIGIN: &str = "https://shelf.example/";
const PRECACHE: &[&str] = &["/", "/index.html", "/styles.css", "/app.js"];

fn origin() -> Url {
    Url::parse(ORIGIN).unwrap()
}

fn abs(path: &str) -> String {
    origin().join(path).unwrap().to_string()
}

fn html(body: &str) -> Response {
    Response::basic(200, types::HTML, body.as_bytes().to_vec())
}

fn json(body: &str) -> Response {
    Response::basic(200, types::JSON, body.as_bytes().to_vec())
}

fn worker_config(offline: bool) -> WorkerConfig {
    WorkerConfig {
        origin: origin(),
        store_name: "mdshelf-v2".into(),
        offline,
        shell: "/index.html".into(),
        precache: PRECACHE.iter().map(|p| p.to_string()).collect(),
        sync_tag: "refresh-index".into(),
        index_path: "/content/index.json".into(),
        push_title: "mdshelf".into(),
        push_body: "New reading material is available.".into(),
    }
}

/// A scripted site that can satisfy the whole precache manifest.
fn scripted_site() -> Arc<ScriptedFetcher> {
    let fetcher = Arc::new(ScriptedFetcher::new());
    for path in PRECACHE {
        fetcher.respond(&abs(path), html(&format!("asset {path}")));
    }
    fetcher.respond(&abs("/content/index.json"), json(r#"[{"name":"java"}]"#));
    fetcher.respond(
        &abs("/content/java/01-intro.md"),
        Response::basic(200, types::MARKDOWN, b"# Introduction to Java".to_vec()),
    );
    fetcher
}

fn build_worker(offline: bool, fetcher: Arc<ScriptedFetcher>) -> Arc<ServiceWorker> {
    let storage = Arc::new(CacheStorage::new());
    Arc::new(ServiceWorker::new(
        worker_config(offline),
        storage,
        fetcher as Arc<dyn Fetcher>,
    ))
}

// ----------------------------------------------------------------------------
// Lifecycle
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_install_populates_manifest() {
    let fetcher = scripted_site();
    let worker = build_worker(true, Arc::clone(&fetcher));

    worker.install().await.unwrap();

    assert_eq!(worker.state(), WorkerState::Installed);
    let cache = worker.storage().open("mdshelf-v2");
    for path in PRECACHE {
        assert!(cache.contains(&abs(path)), "missing precache entry {path}");
    }
    assert_eq!(cache.len(), PRECACHE.len());
}

#[tokio::test]
async fn test_install_failure_aborts_generation() {
    let fetcher = scripted_site();
    fetcher.fail(&abs("/app.js"));
    let worker = build_worker(true, Arc::clone(&fetcher));

    let result = worker.install().await;

    assert!(result.is_err());
    assert_eq!(worker.state(), WorkerState::Redundant);
}

#[tokio::test]
async fn test_install_fails_on_error_status() {
    let fetcher = scripted_site();
    fetcher.respond(
        &abs("/styles.css"),
        Response::basic(404, types::PLAIN, vec![]),
    );
    let worker = build_worker(true, Arc::clone(&fetcher));

    assert!(worker.install().await.is_err());
    assert_eq!(worker.state(), WorkerState::Redundant);
}

#[tokio::test]
async fn test_activate_purges_stale_generations() {
    let fetcher = scripted_site();
    let worker = build_worker(true, Arc::clone(&fetcher));

    // Leftovers from prior deployments
    worker.storage().open("mdshelf-v1");
    worker.storage().open("mdshelf-v0");

    worker.install().await.unwrap();
    worker.activate().await;

    assert_eq!(worker.state(), WorkerState::Activated);
    assert_eq!(worker.storage().names(), vec!["mdshelf-v2".to_string()]);
}

// ----------------------------------------------------------------------------
// Fetch arbitration
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_cached_response_needs_no_second_network_call() {
    let fetcher = scripted_site();
    let worker = build_worker(true, Arc::clone(&fetcher));
    let url = Url::parse(&abs("/content/java/01-intro.md")).unwrap();

    let first = worker.handle_fetch(Request::get(url.clone())).await.unwrap();
    let second = worker.handle_fetch(Request::get(url.clone())).await.unwrap();

    match (first, second) {
        (
            FetchOutcome::Served { source: ServeSource::Network, .. },
            FetchOutcome::Served { response, source: ServeSource::Cache },
        ) => {
            assert_eq!(response.body, b"# Introduction to Java");
        }
        other => panic!("unexpected outcomes: {other:?}"),
    }
    assert_eq!(fetcher.calls_for(url.as_str()), 1);
}

#[tokio::test]
async fn test_precached_asset_served_without_network() {
    let fetcher = scripted_site();
    let worker = build_worker(true, Arc::clone(&fetcher));
    worker.install().await.unwrap();
    worker.activate().await;

    let url = Url::parse(&abs("/styles.css")).unwrap();
    let outcome = worker.handle_fetch(Request::get(url.clone())).await.unwrap();

    assert!(matches!(
        outcome,
        FetchOutcome::Served { source: ServeSource::Cache, .. }
    ));
    // Exactly the one install-time fetch
    assert_eq!(fetcher.calls_for(url.as_str()), 1);
}

#[tokio::test]
async fn test_error_status_served_but_not_cached() {
    let fetcher = scripted_site();
    fetcher.respond(&abs("/gone.md"), Response::basic(404, types::PLAIN, vec![]));
    let worker = build_worker(true, Arc::clone(&fetcher));

    let url = Url::parse(&abs("/gone.md")).unwrap();
    let outcome = worker.handle_fetch(Request::get(url.clone())).await.unwrap();

    match outcome {
        FetchOutcome::Served { response, source } => {
            assert_eq!(response.status, 404);
            assert_eq!(source, ServeSource::Network);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(!worker.storage().open("mdshelf-v2").contains(url.as_str()));
}

#[tokio::test]
async fn test_opaque_response_not_cached() {
    let fetcher = scripted_site();
    fetcher.respond(
        &abs("/embed.js"),
        Response::opaque(200, types::JAVASCRIPT, b"window.x=1".to_vec()),
    );
    let worker = build_worker(true, Arc::clone(&fetcher));

    let url = Url::parse(&abs("/embed.js")).unwrap();
    worker.handle_fetch(Request::get(url.clone())).await.unwrap();

    assert!(!worker.storage().open("mdshelf-v2").contains(url.as_str()));
}

#[tokio::test]
async fn test_non_get_passes_through_untouched() {
    let fetcher = scripted_site();
    let worker = build_worker(true, Arc::clone(&fetcher));

    let url = Url::parse(&abs("/content/index.json")).unwrap();
    let request = Request::new(Method::Post, url.clone(), false);
    let outcome = worker.handle_fetch(request).await.unwrap();

    assert!(matches!(outcome, FetchOutcome::Passthrough));
    // Never consulted the network, never touched the cache
    assert_eq!(fetcher.calls_for(url.as_str()), 0);
    assert!(!worker.storage().open("mdshelf-v2").contains(url.as_str()));
}

#[tokio::test]
async fn test_cross_origin_passes_through_untouched() {
    let fetcher = scripted_site();
    let worker = build_worker(true, Arc::clone(&fetcher));

    let url = Url::parse("https://cdn.example/lib.js").unwrap();
    let outcome = worker.handle_fetch(Request::get(url.clone())).await.unwrap();

    assert!(matches!(outcome, FetchOutcome::Passthrough));
    assert!(!worker.storage().open("mdshelf-v2").contains(url.as_str()));
}

#[tokio::test]
async fn test_failed_navigation_falls_back_to_shell() {
    let fetcher = scripted_site();
    let worker = build_worker(true, Arc::clone(&fetcher));
    worker.install().await.unwrap();
    worker.activate().await;

    let url = Url::parse(&abs("/reader/java")).unwrap();
    fetcher.fail(url.as_str());

    let outcome = worker.handle_fetch(Request::navigation(url)).await.unwrap();

    match outcome {
        FetchOutcome::Served { response, source } => {
            assert_eq!(source, ServeSource::ShellFallback);
            assert_eq!(response.body, b"asset /index.html");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_subresource_propagates() {
    let fetcher = scripted_site();
    let worker = build_worker(true, Arc::clone(&fetcher));
    worker.install().await.unwrap();

    let url = Url::parse(&abs("/content/missing.md")).unwrap();
    fetcher.fail(url.as_str());

    let result = worker.handle_fetch(Request::get(url)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_failed_navigation_without_cached_shell_propagates() {
    let fetcher = scripted_site();
    // No install: the shell was never cached
    let worker = build_worker(true, Arc::clone(&fetcher));

    let url = Url::parse(&abs("/reader/java")).unwrap();
    fetcher.fail(url.as_str());

    let result = worker.handle_fetch(Request::navigation(url)).await;
    assert!(result.is_err());
}

// ----------------------------------------------------------------------------
// Background sync
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_sync_refreshes_index_entry() {
    let fetcher = scripted_site();
    let worker = build_worker(true, Arc::clone(&fetcher));
    worker.install().await.unwrap();

    let index_url = abs("/content/index.json");
    worker
        .storage()
        .open("mdshelf-v2")
        .put(&index_url, json("stale"));

    fetcher.respond(&index_url, json(r#"[{"name":"rust"}]"#));
    worker.handle_sync("refresh-index").await;

    let stored = worker.storage().open("mdshelf-v2").lookup(&index_url).unwrap();
    assert_eq!(stored.body, br#"[{"name":"rust"}]"#);
}

#[tokio::test]
async fn test_sync_ignores_unknown_tag() {
    let fetcher = scripted_site();
    let worker = build_worker(true, Arc::clone(&fetcher));

    worker.handle_sync("unrelated-tag").await;
    assert_eq!(fetcher.calls_for(&abs("/content/index.json")), 0);
}

#[tokio::test]
async fn test_sync_failure_leaves_entry_untouched() {
    let fetcher = scripted_site();
    let worker = build_worker(true, Arc::clone(&fetcher));

    let index_url = abs("/content/index.json");
    worker
        .storage()
        .open("mdshelf-v2")
        .put(&index_url, json("kept"));
    fetcher.fail(&index_url);

    worker.handle_sync("refresh-index").await;

    let stored = worker.storage().open("mdshelf-v2").lookup(&index_url).unwrap();
    assert_eq!(stored.body, b"kept");
}

// ----------------------------------------------------------------------------
// Push / notifications
// ----------------------------------------------------------------------------

#[test]
fn test_push_parses_payload() {
    let fetcher = scripted_site();
    let worker = build_worker(true, fetcher);

    let n = worker.handle_push(Some(br#"{"title":"New","body":"Chapter 4"}"#));
    assert_eq!(n.title, "New");
    assert_eq!(n.body, "Chapter 4");
}

#[test]
fn test_push_without_payload_uses_defaults() {
    let fetcher = scripted_site();
    let worker = build_worker(true, fetcher);

    let n = worker.handle_push(None);
    assert_eq!(n.title, "mdshelf");
    assert_eq!(n.body, "New reading material is available.");
}

#[test]
fn test_notification_click_yields_app_root() {
    let fetcher = scripted_site();
    let worker = build_worker(true, fetcher);

    assert_eq!(worker.handle_notification_click(), origin());
}

// ----------------------------------------------------------------------------
// Pass-through variant
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_passthrough_mode_never_touches_the_store() {
    let fetcher = scripted_site();
    let worker = build_worker(false, Arc::clone(&fetcher));

    worker.install().await.unwrap();
    worker.activate().await;
    assert_eq!(worker.state(), WorkerState::Activated);
    assert!(worker.storage().names().is_empty());

    let url = Url::parse(&abs("/styles.css")).unwrap();
    let outcome = worker.handle_fetch(Request::get(url)).await.unwrap();
    assert!(matches!(outcome, FetchOutcome::Passthrough));

    worker.handle_sync("refresh-index").await;
    assert!(worker.storage().names().is_empty());

    // Push handling is preserved in this variant
    let n = worker.handle_push(None);
    assert_eq!(n.title, "mdshelf");
}

// ----------------------------------------------------------------------------
// Dispatcher
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_dispatcher_round_trip() {
    let fetcher = scripted_site();
    let worker = build_worker(true, Arc::clone(&fetcher));

    let (actor, handle) = WorkerActor::new(Arc::clone(&worker));
    let actor_task = tokio::spawn(actor.run());

    handle.install().await.unwrap();
    handle.activate().await.unwrap();

    let url = Url::parse(&abs("/index.html")).unwrap();
    let outcome = handle.fetch(Request::get(url)).await.unwrap();
    assert!(matches!(
        outcome,
        FetchOutcome::Served { source: ServeSource::Cache, .. }
    ));

    handle.sync("refresh-index").await.unwrap();
    handle.push(None).await.unwrap();

    handle.shutdown().await;
    actor_task.await.unwrap();
}

#[tokio::test]
async fn test_dispatcher_concurrent_fetches() {
    let fetcher = scripted_site();
    let worker = build_worker(true, Arc::clone(&fetcher));

    let (actor, handle) = WorkerActor::new(Arc::clone(&worker));
    let actor_task = tokio::spawn(actor.run());

    let mut tasks = Vec::new();
    for path in ["/", "/index.html", "/styles.css", "/app.js"] {
        let handle = handle.clone();
        let url = Url::parse(&abs(path)).unwrap();
        tasks.push(tokio::spawn(async move {
            handle.fetch(Request::get(url)).await
        }));
    }
    for task in tasks {
        assert!(task.await.unwrap().is_ok());
    }

    handle.shutdown().await;
    actor_task.await.unwrap();
}
