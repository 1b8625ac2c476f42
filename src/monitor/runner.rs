//! One pass of the monitor: fetch, extract, compare, notify, persist
//!
//! The stored version only advances after a successful notification, so a
//! failed push is retried by the next scheduled run.

use chrono::Local;
use tracing::{error, info, warn};

use crate::monitor::extractor::VersionExtractor;
use crate::monitor::fetcher::PageFetcher;
use crate::monitor::message::format_update_message;
use crate::monitor::notifier::Notifier;
use crate::monitor::store::VersionStore;

/// How a single run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The page could not be fetched
    FetchFailed,
    /// The page did not contain a version token
    VersionNotFound,
    /// No prior state; the observed version was stored as the baseline
    BaselineStored { version: String },
    /// No prior state and the baseline could not be stored
    BaselineNotStored { version: String },
    /// The observed version equals the stored one
    Unchanged { version: String },
    /// Notification sent and the new version stored
    Updated { previous: String, current: String },
    /// Notification failed; the stored version was left untouched
    NotifyFailed { previous: String, current: String },
    /// Notification sent but the new version could not be stored
    UpdateNotStored { previous: String, current: String },
}

pub struct Monitor {
    fetcher: Box<dyn PageFetcher>,
    extractor: VersionExtractor,
    store: Box<dyn VersionStore>,
    notifier: Box<dyn Notifier>,
}

impl Monitor {
    pub fn new(
        fetcher: Box<dyn PageFetcher>,
        extractor: VersionExtractor,
        store: Box<dyn VersionStore>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            store,
            notifier,
        }
    }

    pub async fn run(&self) -> RunOutcome {
        info!("========== Version check started ==========");
        let outcome = self.check().await;
        info!("Run finished: {:?}", outcome);
        info!("========== Version check finished ==========");
        outcome
    }

    async fn check(&self) -> RunOutcome {
        let page = match self.fetcher.fetch_page().await {
            Ok(page) => page,
            Err(e) => {
                error!("Could not fetch latest version, aborting run: {}", e);
                return RunOutcome::FetchFailed;
            }
        };

        let current = match self.extractor.extract(&page) {
            Ok(version) => version,
            Err(e) => {
                error!("Could not determine latest version, aborting run: {}", e);
                return RunOutcome::VersionNotFound;
            }
        };

        let stored = self
            .store
            .read()
            .inspect_err(|e| {
                error!(
                    "Failed to read stored version at {}, treating as first run: {}",
                    self.store.location(),
                    e
                )
            })
            .unwrap_or(None);

        match stored {
            None => self.store_baseline(current),
            Some(previous) if previous == current => {
                info!("Version unchanged ({})", current);
                RunOutcome::Unchanged { version: current }
            }
            Some(previous) => self.announce_update(previous, current).await,
        }
    }

    fn store_baseline(&self, version: String) -> RunOutcome {
        info!("No stored version found, saving {} as baseline", version);

        match self.store.write(&version) {
            Ok(()) => RunOutcome::BaselineStored { version },
            Err(e) => {
                error!("Failed to store baseline version {}: {}", version, e);
                RunOutcome::BaselineNotStored { version }
            }
        }
    }

    async fn announce_update(&self, previous: String, current: String) -> RunOutcome {
        info!("Version changed: {} -> {}", previous, current);

        let message = format_update_message(&previous, &current, &Local::now());
        if let Err(e) = self.notifier.notify(&message).await {
            warn!(
                "Notification failed, keeping stored version {} so the next run retries: {}",
                previous, e
            );
            return RunOutcome::NotifyFailed { previous, current };
        }

        match self.store.write(&current) {
            Ok(()) => {
                info!("Stored version updated to {}", current);
                RunOutcome::Updated { previous, current }
            }
            Err(e) => {
                error!(
                    "Notification sent but storing version {} failed; the next run will notify again: {}",
                    current, e
                );
                RunOutcome::UpdateNotStored { previous, current }
            }
        }
    }
}
