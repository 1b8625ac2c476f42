//! Monitor test utilities

use std::path::PathBuf;
use std::time::Duration;

use mockito::{Mock, ServerGuard};
use tempfile::TempDir;

use pgsharp_monitor::monitor::extractor::VersionExtractor;
use pgsharp_monitor::monitor::fetcher::HttpPageFetcher;
use pgsharp_monitor::monitor::notifier::LineNotifier;
use pgsharp_monitor::monitor::runner::Monitor;
use pgsharp_monitor::monitor::store::FileVersionStore;

pub const PAGE_PATH: &str = "/";
pub const PUSH_PATH: &str = "/v2/bot/message/push";
pub const TEST_TOKEN: &str = "test-token";
pub const TEST_TARGET: &str = "U0123456789";

/// Page body advertising `version`
pub fn page_with_version(version: &str) -> String {
    format!(
        "<html><body><h1>PGSharp</h1><p>Latest Version: {} (Android Only)</p></body></html>",
        version
    )
}

/// Temporary base directory with an optional pre-stored version
pub struct StateDir {
    _temp_dir: TempDir,
    pub version_file: PathBuf,
}

impl StateDir {
    pub fn new(stored: Option<&str>) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let version_file = temp_dir.path().join("state/pgsharp_version.txt");

        if let Some(version) = stored {
            std::fs::create_dir_all(version_file.parent().unwrap()).unwrap();
            std::fs::write(&version_file, version).unwrap();
        }

        Self {
            _temp_dir: temp_dir,
            version_file,
        }
    }

    pub fn stored(&self) -> Option<String> {
        std::fs::read_to_string(&self.version_file).ok()
    }
}

/// Serves `body` on the page path, expecting exactly `hits` requests
pub async fn mock_page(
    server: &mut ServerGuard,
    status: usize,
    body: &str,
    hits: usize,
) -> Mock {
    server
        .mock("GET", PAGE_PATH)
        .with_status(status)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(body)
        .expect(hits)
        .create_async()
        .await
}

/// Creates a monitor wired to a mock server and a real version file
pub fn create_test_monitor(server: &ServerGuard, state: &StateDir) -> Monitor {
    let timeout = Duration::from_secs(5);
    let fetcher = HttpPageFetcher::new(
        &format!("{}{}", server.url(), PAGE_PATH),
        "pgsharp-monitor-test/1.0",
        timeout,
    )
    .unwrap();
    let notifier = LineNotifier::new(
        &format!("{}{}", server.url(), PUSH_PATH),
        TEST_TOKEN,
        TEST_TARGET,
        timeout,
    )
    .unwrap();

    Monitor::new(
        Box::new(fetcher),
        VersionExtractor::default(),
        Box::new(FileVersionStore::new(&state.version_file)),
        Box::new(notifier),
    )
}
