//! Version monitoring pipeline
//!
//! A run fetches the download page, extracts the advertised version,
//! compares it with the stored one and pushes a message when it changed.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Fetcher   │────▶│  Extractor  │────▶│   Runner    │
//! │  (HTTP GET) │     │   (regex)   │     │  (compare)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                           │         │
//!                                           ▼         ▼
//!                                   ┌─────────────┐ ┌─────────────┐
//!                                   │  Notifier   │ │    Store    │
//!                                   │ (HTTP POST) │ │ (text file) │
//!                                   └─────────────┘ └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`fetcher`]: HTTP page fetcher
//! - [`extractor`]: Version token extraction
//! - [`store`]: File-backed last known version
//! - [`notifier`]: LINE push message client
//! - [`message`]: Notification text
//! - [`runner`]: Sequencing and the notify-before-persist rule
//! - [`error`]: Error types for each stage

pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod message;
pub mod notifier;
pub mod runner;
pub mod store;
