use serde::Serialize;

/// Sentinel for a field that could not be extracted from the detail pane.
pub const NOT_AVAILABLE: &str = "N/A";

/// One harvested business entity.
///
/// A record is only ever materialized after a detail pane has been opened
/// for a list entry and its phone number has passed the mobile-format gate;
/// `phone` is therefore never empty and never the `"N/A"` sentinel. Address
/// and website fall back to [`NOT_AVAILABLE`] when absent. Records are
/// immutable once constructed and live only in the in-memory result
/// sequence of a single run.
///
/// The serde field renames define the exported CSV header:
/// `Name,Address,Phone,Website`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusinessRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Website")]
    pub website: String,
}
