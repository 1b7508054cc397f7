//! Run configuration and the national mobile-number format rule.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("search query must not be empty")]
    EmptyQuery,

    #[error("max_results must be at least 1")]
    ZeroMaxResults,

    #[error("max_pages must be at least 1")]
    ZeroMaxPages,
}

/// Nationally-scoped mobile-number validation rule.
///
/// A number qualifies when, after separator and country-code stripping, it
/// is a mobile-block number of exactly the national significant length:
/// either the national form (trunk `0`, then `mobile_leading`, then the
/// rest of the significant digits) or the international form (country code
/// immediately followed by `mobile_leading`).
///
/// The default is the reference configuration: country code `90`, mobile
/// block leading digit `5`, 10 significant digits — so `0532 123 45 67`
/// and `+90 532 123 45 67` qualify while the `0212` landline block does
/// not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MobileNumberFormat {
    /// Country calling code without any `+` or `00` prefix, e.g. `"90"`.
    pub country_code: String,
    /// First digit of the national mobile block, after the trunk `0`.
    pub mobile_leading: char,
    /// Digit count of the national significant number (excludes trunk `0`).
    pub national_length: usize,
}

impl Default for MobileNumberFormat {
    fn default() -> Self {
        Self {
            country_code: "90".to_owned(),
            mobile_leading: '5',
            national_length: 10,
        }
    }
}

/// Immutable configuration for one harvest run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Search query typed into the directory, e.g. `"Consultancies in Istanbul"`.
    pub query: String,
    /// Hard cap on records collected across all pages.
    pub max_results: usize,
    /// Hard cap on result-page iterations.
    pub max_pages: usize,
    /// Mobile-format rule gating record creation.
    pub mobile_format: MobileNumberFormat,
}

impl RunConfig {
    /// Builds a validated config with the default mobile format.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the query is empty (after trimming) or
    /// either cap is zero.
    pub fn new(query: &str, max_results: usize, max_pages: usize) -> Result<Self, ConfigError> {
        let config = Self {
            query: query.to_owned(),
            max_results,
            max_pages,
            mobile_format: MobileNumberFormat::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Re-checks the invariants on a config built field-by-field.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the query is empty (after trimming) or
    /// either cap is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.query.trim().is_empty() {
            return Err(ConfigError::EmptyQuery);
        }
        if self.max_results == 0 {
            return Err(ConfigError::ZeroMaxResults);
        }
        if self.max_pages == 0 {
            return Err(ConfigError::ZeroMaxPages);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_minimal_valid_config() {
        let config = RunConfig::new("cafes in Kadikoy", 1, 1).unwrap();
        assert_eq!(config.query, "cafes in Kadikoy");
        assert_eq!(config.max_results, 1);
        assert_eq!(config.max_pages, 1);
    }

    #[test]
    fn rejects_empty_query() {
        assert!(matches!(
            RunConfig::new("", 10, 5),
            Err(ConfigError::EmptyQuery)
        ));
    }

    #[test]
    fn rejects_whitespace_only_query() {
        assert!(matches!(
            RunConfig::new("   ", 10, 5),
            Err(ConfigError::EmptyQuery)
        ));
    }

    #[test]
    fn rejects_zero_max_results() {
        assert!(matches!(
            RunConfig::new("cafes", 0, 5),
            Err(ConfigError::ZeroMaxResults)
        ));
    }

    #[test]
    fn rejects_zero_max_pages() {
        assert!(matches!(
            RunConfig::new("cafes", 10, 0),
            Err(ConfigError::ZeroMaxPages)
        ));
    }

    #[test]
    fn default_mobile_format_is_reference_configuration() {
        let fmt = MobileNumberFormat::default();
        assert_eq!(fmt.country_code, "90");
        assert_eq!(fmt.mobile_leading, '5');
        assert_eq!(fmt.national_length, 10);
    }
}
