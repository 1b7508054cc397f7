//! Extraction, classification, and traversal engine for harvesting
//! business records from a dynamic, paginated map-directory view.
//!
//! - [`classify`] — pure field-classification heuristics (address vs.
//!   phone, target-market mobile validation).
//! - [`session`] — the capability trait of the browser-automation
//!   collaborator; this crate never depends on a concrete browser.
//! - [`controller`] — the bounded list→detail→list state machine and the
//!   `harvest` entry point.
//! - [`selectors`] — every page-specific structural selector, isolated so
//!   front-end churn never touches the engine.

pub mod classify;
pub mod controller;
pub mod error;
mod extract;
pub mod selectors;
pub mod session;

pub use classify::{classify, is_plausible_phone, is_target_mobile_number, looks_like_address};
pub use controller::{collect, harvest, EntryOutcome, ProgressSink, SkipReason};
pub use error::HarvestError;
pub use session::{AutomationError, Element, Locator, Session};
