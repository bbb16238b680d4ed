//! # hwwatch
//!
//! A live hardware-telemetry viewer and library.
//!
//! A sensor daemon rewrites a small text file of `name value` lines. This
//! crate watches that file, re-reads it when it changes, parses each line
//! into a typed [`Reading`], and multicasts the resulting [`Snapshot`] to
//! any number of subscribers. A late subscriber immediately receives the
//! latest snapshot. Consumers merge snapshots into a [`DisplayCollection`]
//! that only ever updates or appends.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        TelemetryFeed                         │
//! │  ┌─────────────┐   ┌─────────────────┐   ┌────────────────┐  │
//! │  │ FileWatcher │──▶│    Publisher    │──▶│  Subscription  │──┼──▶ App
//! │  │ (debounce)  │   │ (retry + read)  │   │ (latest first) │  │
//! │  └─────────────┘   └────────┬────────┘   └────────────────┘  │
//! │                             │                                │
//! │                    ┌────────▼────────┐                       │
//! │                    │ TelemetryReader │                       │
//! │                    │ (parse lines)   │                       │
//! │                    └─────────────────┘                       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`model`]**: [`Reading`], [`ReadingKind`], [`ReadingValue`], and the
//!   per-reader [`TextAccumulator`]
//! - **[`source`]**: watching, reading, publishing, subscribing
//! - **[`feed`]**: [`TelemetryFeed`], which wires one pipeline together
//! - **[`data`]**: [`DisplayCollection`] merge and value formatting
//! - **[`app`]**, **[`events`]**, **[`ui`]**: the terminal host
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a telemetry file
//! hwwatch --file /var/run/sensord/sensors.txt
//!
//! # Print one parsed snapshot as JSON and exit
//! hwwatch --file /var/run/sensord/sensors.txt --dump
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use hwwatch::{DisplayCollection, FeedConfig, SnapshotSource, TelemetryFeed};
//!
//! let config = FeedConfig {
//!     telemetry_file: "/var/run/sensord/sensors.txt".into(),
//!     ..FeedConfig::default()
//! };
//! let mut feed = TelemetryFeed::open(&config)?;
//! feed.start_monitoring()?;
//!
//! let mut subscription = feed.subscribe();
//! let mut display = DisplayCollection::new();
//! if let Some(snapshot) = subscription.poll() {
//!     display.merge(&snapshot);
//! }
//! # Ok::<(), hwwatch::FeedError>(())
//! ```
//!
//! ### Parsing a single line
//!
//! ```
//! use hwwatch::{parse_line, ReadingValue};
//!
//! let reading = parse_line("cpu_temp 45.5").unwrap();
//! assert_eq!(reading.name(), "cpu_temp");
//! assert_eq!(reading.value(), &ReadingValue::Float(45.5));
//! ```

pub mod app;
pub mod data;
pub mod error;
pub mod events;
pub mod feed;
pub mod logging;
pub mod model;
pub mod settings;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use data::{format_value, DisplayCollection, MergeOutcome};
pub use error::FeedError;
pub use feed::TelemetryFeed;
pub use model::{Reading, ReadingKind, ReadingValue, Snapshot, TextAccumulator};
pub use settings::{FeedConfig, LogConfig, Settings};
pub use source::{
    infer_value, parse_line, CancelHandle, ChangeSender, ChangeSubscription, Debouncer,
    FeedStats, FileWatcher, Publisher, RetryPolicy, SnapshotReader, SnapshotSource,
    Subscription, TelemetryReader, WatchSignal, DEFAULT_DEBOUNCE,
};
