//! Consumer-side state built from published snapshots.
//!
//! ## Submodules
//!
//! - [`display`]: [`DisplayCollection`], the append/update-only list the UI renders
//! - [`format`]: value-to-text formatting for the table
//!
//! ## Data Flow
//!
//! ```text
//! Snapshot (from Subscription::poll)
//!        │
//!        ▼
//! DisplayCollection::merge()
//!        │
//!        ├──▶ update in place (same name, kind kept)
//!        │
//!        └──▶ append at end (new name)
//! ```

pub mod display;
pub mod format;

pub use display::{DisplayCollection, MergeOutcome};
pub use format::format_value;
