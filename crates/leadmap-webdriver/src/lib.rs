//! WebDriver implementation of the harvester's automation capability
//! surface, built on `fantoccini` against a chromedriver-compatible
//! endpoint.
//!
//! All waits are bounded polls: probe the condition, sleep a fixed
//! interval, give up at the deadline with [`AutomationError::Timeout`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use fantoccini::elements::Element as WdElement;
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::{Client, ClientBuilder};
use webdriver::capabilities::Capabilities;

use leadmap_harvester::session::{AutomationError, Element, Locator, Session};

/// Interval between condition probes inside a bounded wait.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// One live WebDriver browser session.
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    /// Connects to a running WebDriver service and starts a (by default
    /// headless) Chrome session.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::SessionInit`] when the WebDriver
    /// endpoint is unreachable or rejects the session — the one fatal
    /// error class of a harvest run.
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self, AutomationError> {
        let mut args = vec![
            "--no-sandbox".to_owned(),
            "--disable-gpu".to_owned(),
            "--disable-dev-shm-usage".to_owned(),
            "--window-size=1920,1080".to_owned(),
        ];
        if headless {
            args.push("--headless".to_owned());
        }

        let mut caps = Capabilities::new();
        caps.insert(
            "goog:chromeOptions".to_owned(),
            serde_json::json!({ "args": args }),
        );

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(webdriver_url)
            .await
            .map_err(|e| AutomationError::SessionInit(e.to_string()))?;

        tracing::debug!(webdriver_url, headless, "WebDriver session established");
        Ok(Self { client })
    }
}

fn to_wd_locator(locator: Locator<'_>) -> fantoccini::Locator<'_> {
    match locator {
        Locator::Css(css) => fantoccini::Locator::Css(css),
        Locator::XPath(xpath) => fantoccini::Locator::XPath(xpath),
    }
}

/// Maps a WebDriver command failure onto the automation taxonomy by its
/// typed W3C error code.
fn map_cmd_error(error: CmdError) -> AutomationError {
    match &error {
        CmdError::Standard(wd) if wd.error == ErrorStatus::StaleElementReference => {
            AutomationError::Stale
        }
        _ => AutomationError::Backend(error.to_string()),
    }
}

fn is_no_such_element(error: &CmdError) -> bool {
    matches!(error, CmdError::Standard(wd) if wd.error == ErrorStatus::NoSuchElement)
}

#[async_trait]
impl Session for WebDriverSession {
    async fn navigate(&self, url: &str) -> Result<(), AutomationError> {
        self.client.goto(url).await.map_err(map_cmd_error)
    }

    async fn wait_for(
        &self,
        locator: Locator<'_>,
        timeout: Duration,
    ) -> Result<Box<dyn Element>, AutomationError> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.client.find(to_wd_locator(locator)).await {
                Ok(element) => return Ok(Box::new(WebDriverElement { element })),
                Err(error) if is_no_such_element(&error) => {
                    if Instant::now() >= deadline {
                        return Err(AutomationError::timeout(locator));
                    }
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
                Err(error) => return Err(map_cmd_error(error)),
            }
        }
    }

    async fn wait_for_all(
        &self,
        locator: Locator<'_>,
        timeout: Duration,
    ) -> Result<Vec<Box<dyn Element>>, AutomationError> {
        let deadline = Instant::now() + timeout;
        loop {
            let elements = self
                .client
                .find_all(to_wd_locator(locator))
                .await
                .map_err(map_cmd_error)?;
            if !elements.is_empty() {
                return Ok(elements
                    .into_iter()
                    .map(|element| Box::new(WebDriverElement { element }) as Box<dyn Element>)
                    .collect());
            }
            if Instant::now() >= deadline {
                return Err(AutomationError::timeout(locator));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn find_all(
        &self,
        locator: Locator<'_>,
    ) -> Result<Vec<Box<dyn Element>>, AutomationError> {
        let elements = self
            .client
            .find_all(to_wd_locator(locator))
            .await
            .map_err(map_cmd_error)?;
        Ok(elements
            .into_iter()
            .map(|element| Box::new(WebDriverElement { element }) as Box<dyn Element>)
            .collect())
    }

    async fn scroll_to_bottom(&self) -> Result<(), AutomationError> {
        self.client
            .execute(
                "window.scrollTo(0, document.body.scrollHeight);",
                Vec::new(),
            )
            .await
            .map(|_| ())
            .map_err(map_cmd_error)
    }

    async fn navigate_back(&self) -> Result<(), AutomationError> {
        self.client.back().await.map_err(map_cmd_error)
    }

    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    async fn quit(self: Box<Self>) -> Result<(), AutomationError> {
        self.client.close().await.map_err(map_cmd_error)
    }
}

struct WebDriverElement {
    element: WdElement,
}

#[async_trait]
impl Element for WebDriverElement {
    async fn text(&self) -> Result<String, AutomationError> {
        self.element.text().await.map_err(map_cmd_error)
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, AutomationError> {
        self.element.attr(name).await.map_err(map_cmd_error)
    }

    async fn click(&self) -> Result<(), AutomationError> {
        self.element
            .clone()
            .click()
            .await
            .map(|_| ())
            .map_err(map_cmd_error)
    }

    async fn find_within(
        &self,
        locator: Locator<'_>,
    ) -> Result<Option<Box<dyn Element>>, AutomationError> {
        match self.element.find(to_wd_locator(locator)).await {
            Ok(element) => Ok(Some(Box::new(WebDriverElement { element }))),
            Err(error) if is_no_such_element(&error) => Ok(None),
            Err(error) => Err(map_cmd_error(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fantoccini::error::WebDriver as WebDriverError;

    #[test]
    fn stale_element_code_maps_to_stale() {
        let error = CmdError::Standard(WebDriverError::new(
            ErrorStatus::StaleElementReference,
            "stale element reference",
        ));
        assert!(matches!(map_cmd_error(error), AutomationError::Stale));
    }

    #[test]
    fn other_standard_codes_map_to_backend() {
        let error = CmdError::Standard(WebDriverError::new(
            ErrorStatus::ElementNotInteractable,
            "element not interactable",
        ));
        assert!(matches!(map_cmd_error(error), AutomationError::Backend(_)));
    }

    #[test]
    fn missing_element_is_detected_by_variant() {
        let miss = CmdError::Standard(WebDriverError::new(
            ErrorStatus::NoSuchElement,
            "no such element",
        ));
        assert!(is_no_such_element(&miss));

        let other = CmdError::NotW3C(serde_json::Value::Null);
        assert!(!is_no_such_element(&other));
    }
}
