//! Structural selectors for the target directory UI.
//!
//! The class-name fragments here are inherently fragile — they can change
//! with any front-end deploy. Keeping every concrete selector in this one
//! module means selector churn never touches the classifier or the
//! traversal state machine.

use crate::session::Locator;

/// Search URL prefix; the percent-encoded query is appended.
pub const SEARCH_URL_BASE: &str = "https://www.google.com/maps/search/";

/// Heading shown only when a query resolves directly to one business.
pub const DIRECT_MATCH_HEADING: Locator<'static> =
    Locator::XPath("//h1[@class='DUwDvf lfPIob']");

/// One list entry (candidate business) in the results view.
pub const RESULT_ENTRIES: Locator<'static> = Locator::Css("a.hfpxzc");

/// Sponsored badge probed inside a list entry.
pub const SPONSORED_BADGE: Locator<'static> =
    Locator::XPath(".//span[contains(text(), 'Sponsored')]");

/// Marker appended to the accessible label of already-visited entries.
pub const VISITED_MARKER: &str = "· Visited link";

/// Detail-pane field rows scoped to the info container. Presence of the
/// first one signals the pane has loaded.
pub const DETAIL_FIELDS: Locator<'static> =
    Locator::XPath("//div[contains(@class, 'AeaXub')]//div[contains(@class, 'Io6YTe')]");

/// Unscoped detail-field rows, used by the last-resort phone scan.
pub const DETAIL_FIELDS_ANY: Locator<'static> =
    Locator::XPath("//div[contains(@class, 'Io6YTe')]");

/// Website link in the detail pane; the address is in its `href`.
pub const WEBSITE_LINK: Locator<'static> =
    Locator::XPath("//a[@aria-label and contains(@aria-label, 'Website')]");

/// Phone-number strategies in priority order: explicitly labelled controls
/// first, telephone-protocol links next, then data-value probes. The
/// generic [`DETAIL_FIELDS_ANY`] scan runs after all of these.
pub const PHONE_STRATEGIES: [Locator<'static>; 5] = [
    Locator::XPath("//button[contains(@aria-label, 'Phone')]"),
    Locator::XPath("//a[contains(@aria-label, 'Phone')]"),
    Locator::XPath("//span[contains(@aria-label, 'Phone')]"),
    Locator::XPath("//a[contains(@href, 'tel:')]"),
    Locator::XPath("//button[contains(@data-value, '+')]"),
];
