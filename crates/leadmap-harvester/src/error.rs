use thiserror::Error;

use crate::session::AutomationError;

/// Fatal harvest failures surfaced to the caller.
///
/// Per-entry and per-page recoverable conditions (stale elements, detail
/// timeouts, relist timeouts) are contained inside the traversal loop and
/// never reach this type; only session-level failures and export problems
/// do.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error(transparent)]
    Config(#[from] leadmap_core::ConfigError),

    #[error("automation session failure: {0}")]
    Session(#[from] AutomationError),

    #[error(transparent)]
    Export(#[from] leadmap_core::ExportError),
}
