//! Field extraction against a loaded detail pane.
//!
//! Extraction never fails: a field that cannot be found — whether because
//! the DOM node is absent or because an element query errors underneath —
//! resolves to the `"N/A"` sentinel (or `None` for the gating phone),
//! never to an error escaping this module.

use leadmap_core::{MobileNumberFormat, NOT_AVAILABLE};

use crate::classify::{is_target_mobile_number, pick_address};
use crate::selectors;
use crate::session::{Element, Session};

/// Extracts the best-guess address from the detail pane's field rows.
pub(crate) async fn extract_address(session: &dyn Session) -> String {
    let candidates = collect_texts(session, selectors::DETAIL_FIELDS).await;
    pick_address(&candidates)
}

/// Extracts a qualifying mobile number from the detail pane.
///
/// Scans the prioritized phone strategies (labelled controls, `tel:`
/// links, data-value probes), then the generic detail-field rows. Within
/// each strategy the first value passing the mobile gate wins. `None`
/// means no qualifying number exists; the caller drops the record.
pub(crate) async fn extract_phone(
    session: &dyn Session,
    format: &MobileNumberFormat,
) -> Option<String> {
    for strategy in selectors::PHONE_STRATEGIES {
        let elements = match session.find_all(strategy).await {
            Ok(elements) => elements,
            Err(error) => {
                tracing::debug!(%error, ?strategy, "phone strategy query failed; trying next");
                continue;
            }
        };
        for element in &elements {
            if let Some(phone) = phone_from_element(element.as_ref(), format).await {
                return Some(phone);
            }
        }
    }

    // Last resort: scan every detail-field row for a qualifying value.
    for text in collect_texts(session, selectors::DETAIL_FIELDS_ANY).await {
        let text = text.trim();
        if is_target_mobile_number(text, format) {
            return Some(text.to_owned());
        }
    }

    None
}

/// Extracts the website link, falling back to the sentinel.
pub(crate) async fn extract_website(session: &dyn Session) -> String {
    let elements = match session.find_all(selectors::WEBSITE_LINK).await {
        Ok(elements) => elements,
        Err(error) => {
            tracing::debug!(%error, "website query failed");
            return NOT_AVAILABLE.to_owned();
        }
    };
    for element in &elements {
        if let Ok(Some(href)) = element.attribute("href").await {
            if !href.is_empty() {
                return href;
            }
        }
    }
    NOT_AVAILABLE.to_owned()
}

/// Pulls a qualifying phone value out of one candidate element, probing
/// `href` (stripped of the `tel:` scheme), visible text, and the
/// `data-value` attribute in that order.
async fn phone_from_element(
    element: &dyn Element,
    format: &MobileNumberFormat,
) -> Option<String> {
    if let Ok(Some(href)) = element.attribute("href").await {
        if let Some(number) = href.strip_prefix("tel:") {
            let number = number.trim();
            if is_target_mobile_number(number, format) {
                return Some(number.to_owned());
            }
        }
    }

    if let Ok(text) = element.text().await {
        let text = text.trim();
        if is_target_mobile_number(text, format) {
            return Some(text.to_owned());
        }
    }

    if let Ok(Some(value)) = element.attribute("data-value").await {
        let value = value.trim();
        if is_target_mobile_number(value, format) {
            return Some(value.to_owned());
        }
    }

    None
}

/// Collects the visible text of every element matching `locator`,
/// skipping elements whose text cannot be read.
async fn collect_texts(session: &dyn Session, locator: crate::session::Locator<'_>) -> Vec<String> {
    let elements = match session.find_all(locator).await {
        Ok(elements) => elements,
        Err(error) => {
            tracing::debug!(%error, ?locator, "field query failed; treating as absent");
            return Vec::new();
        }
    };

    let mut texts = Vec::with_capacity(elements.len());
    for element in &elements {
        match element.text().await {
            Ok(text) => texts.push(text),
            Err(error) => tracing::debug!(%error, "unreadable field element skipped"),
        }
    }
    texts
}
