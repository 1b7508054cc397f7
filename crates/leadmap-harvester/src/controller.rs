//! The harvest traversal state machine.
//!
//! Drives a bounded list→detail→list loop against the automation
//! collaborator: `Init → DirectMatchCheck → {SingleBusinessShortCircuit |
//! PageLoop} → Done`. Every per-entry control-flow branch is a first-class
//! [`EntryOutcome`] rather than an exception path, so one bad entry never
//! aborts a run.
//!
//! A deliberate policy worth calling out: only target-market mobile
//! numbers count as valid leads. An entry whose detail pane yields no
//! qualifying mobile number is visited, consumed, and then dropped without
//! a record — records "silently vanishing" on landline-only businesses is
//! the intended behavior, not a bug.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use leadmap_core::{BusinessRecord, RunConfig};

use crate::error::HarvestError;
use crate::extract::{extract_address, extract_phone, extract_website};
use crate::selectors;
use crate::session::{AutomationError, Element, Session};

/// Fixed timeout for every bounded condition wait.
const WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settling delay after the initial navigation and after each
/// scroll-triggered reload. Best-effort, not a correctness guarantee.
const SETTLE_DELAY: Duration = Duration::from_secs(5);

/// Characters percent-encoded when the query is embedded in the search
/// URL path segment.
const QUERY_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Optional sink for human-readable status strings. Advisory only; the
/// controller's correctness never depends on it.
pub type ProgressSink<'a> = &'a (dyn Fn(&str) + Send + Sync);

/// Outcome of processing one list entry. Each visit contributes at most
/// one record.
#[derive(Debug)]
pub enum EntryOutcome {
    /// The entry passed every filter and the mobile gate.
    Harvested(BusinessRecord),
    /// The entry was consumed without producing a record.
    Skipped(SkipReason),
}

/// Why a list entry produced no record. None of these count against the
/// result cap and none abort the run.
#[derive(Debug)]
pub enum SkipReason {
    /// The entry carries no accessible label.
    EmptyLabel,
    /// The entry is a sponsored placement.
    Sponsored,
    /// The label carries the previously-visited marker.
    AlreadyVisited,
    /// The entry handle went stale before it could be activated.
    StaleEntry,
    /// The detail pane never appeared within the wait bound.
    DetailPaneTimeout,
    /// The detail pane yielded no qualifying target-market mobile number.
    NoMobileNumber,
    /// Any other automation failure while processing this one entry.
    EntryFailure(String),
}

/// One processed entry plus whether the session left the list view while
/// processing it (in which case the controller must navigate back and
/// re-fetch the live entry collection).
struct EntryVisit {
    outcome: EntryOutcome,
    left_list: bool,
}

impl EntryVisit {
    fn on_list(outcome: EntryOutcome) -> Self {
        Self {
            outcome,
            left_list: false,
        }
    }

    fn off_list(outcome: EntryOutcome) -> Self {
        Self {
            outcome,
            left_list: true,
        }
    }
}

/// Runs a full harvest and serializes the result set to CSV text.
///
/// Convenience wrapper over [`collect`] + [`leadmap_core::to_csv`]. An
/// empty result set still yields a header-only table.
///
/// # Errors
///
/// Returns [`HarvestError`] on session-level failure or CSV
/// serialization failure. Recoverable traversal conditions never surface
/// here.
pub async fn harvest(
    session: Box<dyn Session>,
    config: &RunConfig,
    progress: Option<ProgressSink<'_>>,
) -> Result<String, HarvestError> {
    let records = collect(session, config, progress).await?;
    Ok(leadmap_core::to_csv(&records)?)
}

/// Runs a full harvest and returns the collected records in discovery
/// order.
///
/// The controller exclusively owns `session` for the duration of the run
/// and releases it on every exit path, including the single-business
/// short circuit and error returns.
///
/// # Errors
///
/// Returns [`HarvestError::Config`] on an invalid config and
/// [`HarvestError::Session`] when the session cannot be driven at all
/// (initial navigation failure). The session is released even then.
/// Per-entry and per-page conditions are contained inside the loop.
pub async fn collect(
    session: Box<dyn Session>,
    config: &RunConfig,
    progress: Option<ProgressSink<'_>>,
) -> Result<Vec<BusinessRecord>, HarvestError> {
    let outcome = drive(session.as_ref(), config, progress).await;

    // Release the session on every path; a failed quit after a completed
    // run is logged, not surfaced.
    if let Err(error) = session.quit().await {
        tracing::warn!(%error, "failed to release automation session");
    }

    let records = outcome?;
    report(
        progress,
        &format!("Done — {} record(s) collected.", records.len()),
    );
    Ok(records)
}

/// The state machine proper, generic over any [`Session`] implementation.
async fn drive(
    session: &dyn Session,
    config: &RunConfig,
    progress: Option<ProgressSink<'_>>,
) -> Result<Vec<BusinessRecord>, HarvestError> {
    config.validate()?;

    // Init: the single point where the search URL is constructed.
    let url = format!(
        "{}{}",
        selectors::SEARCH_URL_BASE,
        utf8_percent_encode(&config.query, QUERY_ENCODE_SET)
    );
    report(progress, &format!("Opening search results for {:?}...", config.query));
    session.navigate(&url).await?;
    session.pause(SETTLE_DELAY).await;

    // DirectMatchCheck: a heading appears only when the query resolved
    // straight to one business instead of a list.
    match session
        .wait_for(selectors::DIRECT_MATCH_HEADING, WAIT_TIMEOUT)
        .await
    {
        Ok(heading) => {
            let name = heading.text().await.unwrap_or_default();
            if !name.is_empty()
                && name.to_lowercase().contains(&config.query.to_lowercase())
            {
                tracing::info!(business = %name, "direct single-business match");
                report(progress, &format!("Direct match found: {name}"));
                return Ok(harvest_single_business(session, name, config).await);
            }
        }
        Err(AutomationError::Timeout { .. }) => {}
        Err(error) => {
            tracing::debug!(%error, "direct-match probe failed; assuming list view");
        }
    }

    page_loop(session, config, progress).await
}

/// SingleBusinessShortCircuit: extract the fields straight off the detail
/// view. The mobile gate applies exactly as in the list flow, so the
/// result set holds zero or one record.
async fn harvest_single_business(
    session: &dyn Session,
    name: String,
    config: &RunConfig,
) -> Vec<BusinessRecord> {
    let address = extract_address(session).await;
    let Some(phone) = extract_phone(session, &config.mobile_format).await else {
        tracing::info!(business = %name, "no qualifying mobile number; record dropped");
        return Vec::new();
    };
    let website = extract_website(session).await;
    vec![BusinessRecord {
        name,
        address,
        phone,
        website,
    }]
}

/// PageLoop: up to `max_pages` pages, or until the result cap, whichever
/// comes first.
async fn page_loop(
    session: &dyn Session,
    config: &RunConfig,
    progress: Option<ProgressSink<'_>>,
) -> Result<Vec<BusinessRecord>, HarvestError> {
    let mut records: Vec<BusinessRecord> = Vec::new();

    'pages: for page_number in 1..=config.max_pages {
        if records.len() >= config.max_results {
            break;
        }

        report(progress, &format!("Scraping page {page_number}..."));

        // ListScan: no entries within the bound is the natural end of
        // pagination, not an error.
        let mut entries = match session
            .wait_for_all(selectors::RESULT_ENTRIES, WAIT_TIMEOUT)
            .await
        {
            Ok(entries) => entries,
            Err(AutomationError::Timeout { .. }) => {
                tracing::debug!(page_number, "no list entries appeared; ending page loop");
                break;
            }
            Err(error) => {
                tracing::warn!(page_number, %error, "list scan failed; ending page loop");
                break;
            }
        };
        report(
            progress,
            &format!("Found {} entries on page {page_number}.", entries.len()),
        );

        let mut skipped = 0usize;
        let mut index = 0usize;
        while index < entries.len() && records.len() < config.max_results {
            let visit = visit_entry(session, entries[index].as_ref(), config, progress).await;
            index += 1;

            match visit.outcome {
                EntryOutcome::Harvested(record) => {
                    tracing::info!(
                        name = %record.name,
                        phone = %record.phone,
                        total = records.len() + 1,
                        "record harvested"
                    );
                    records.push(record);
                }
                EntryOutcome::Skipped(reason) => {
                    skipped += 1;
                    tracing::debug!(?reason, "entry skipped");
                }
            }

            if visit.left_list {
                // ReturnToList: history back, then re-fetch the live entry
                // collection — the old handles are invalid after navigation.
                if let Err(error) = session.navigate_back().await {
                    tracing::warn!(%error, "history back failed; abandoning page");
                    break 'pages;
                }
                entries = match session
                    .wait_for_all(selectors::RESULT_ENTRIES, WAIT_TIMEOUT)
                    .await
                {
                    Ok(fresh) => fresh,
                    Err(AutomationError::Timeout { .. }) => {
                        tracing::debug!("list did not reappear after back; abandoning page");
                        break 'pages;
                    }
                    Err(error) => {
                        tracing::warn!(%error, "relist failed; abandoning page");
                        break 'pages;
                    }
                };
            }
        }

        report(
            progress,
            &format!(
                "Page {page_number}: {} record(s) total, {skipped} skipped.",
                records.len()
            ),
        );

        if records.len() >= config.max_results {
            break;
        }

        // Scroll to the bottom edge to trigger incremental loading, then
        // let the reflow settle before the next iteration.
        if let Err(error) = session.scroll_to_bottom().await {
            tracing::warn!(%error, "scroll failed; ending page loop");
            break;
        }
        session.pause(SETTLE_DELAY).await;
    }

    Ok(records)
}

/// Processes one list entry through EntryFilter → DetailVisit →
/// FieldExtraction. Never fails: every failure mode collapses into a
/// [`SkipReason`].
async fn visit_entry(
    session: &dyn Session,
    entry: &dyn Element,
    config: &RunConfig,
    progress: Option<ProgressSink<'_>>,
) -> EntryVisit {
    // EntryFilter: label, sponsored badge, visited marker. Filtering never
    // leaves the list view.
    let label = match entry.attribute("aria-label").await {
        Ok(Some(label)) if !label.trim().is_empty() => label,
        Ok(_) => return EntryVisit::on_list(EntryOutcome::Skipped(SkipReason::EmptyLabel)),
        Err(error) => return EntryVisit::on_list(EntryOutcome::Skipped(skip_for(error))),
    };

    match entry.find_within(selectors::SPONSORED_BADGE).await {
        Ok(Some(_)) => {
            return EntryVisit::on_list(EntryOutcome::Skipped(SkipReason::Sponsored));
        }
        Ok(None) => {}
        Err(error) => return EntryVisit::on_list(EntryOutcome::Skipped(skip_for(error))),
    }

    if label.contains(selectors::VISITED_MARKER) {
        return EntryVisit::on_list(EntryOutcome::Skipped(SkipReason::AlreadyVisited));
    }

    report(progress, &format!("Processing {label}..."));

    // DetailVisit: activate the entry and wait for the pane.
    if let Err(error) = entry.click().await {
        return EntryVisit::on_list(EntryOutcome::Skipped(skip_for(error)));
    }
    // The click went through, so assume the session left the list view
    // whatever happens next.
    if let Err(error) = session.wait_for(selectors::DETAIL_FIELDS, WAIT_TIMEOUT).await {
        let reason = match error {
            AutomationError::Timeout { .. } => SkipReason::DetailPaneTimeout,
            other => skip_for(other),
        };
        return EntryVisit::off_list(EntryOutcome::Skipped(reason));
    }

    // FieldExtraction, gated on a qualifying mobile number.
    let address = extract_address(session).await;
    let Some(phone) = extract_phone(session, &config.mobile_format).await else {
        return EntryVisit::off_list(EntryOutcome::Skipped(SkipReason::NoMobileNumber));
    };
    let website = extract_website(session).await;

    EntryVisit::off_list(EntryOutcome::Harvested(BusinessRecord {
        name: label,
        address,
        phone,
        website,
    }))
}

/// Maps a per-entry automation failure onto its skip reason.
fn skip_for(error: AutomationError) -> SkipReason {
    match error {
        AutomationError::Stale => SkipReason::StaleEntry,
        other => SkipReason::EntryFailure(other.to_string()),
    }
}

fn report(progress: Option<ProgressSink<'_>>, message: &str) {
    if let Some(sink) = progress {
        sink(message);
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
