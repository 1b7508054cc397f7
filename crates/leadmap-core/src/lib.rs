//! Domain types shared across the leadmap workspace.
//!
//! Holds the harvested record shape, run configuration, and the CSV export
//! used by every front end. No browser or async dependency lives here.

pub mod config;
pub mod export;
pub mod record;

pub use config::{ConfigError, MobileNumberFormat, RunConfig};
pub use export::{to_csv, ExportError};
pub use record::{BusinessRecord, NOT_AVAILABLE};
