//! CSV serialization of the harvested result set.

use thiserror::Error;

use crate::record::BusinessRecord;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serializes records into UTF-8 CSV text.
///
/// The header row is exactly `Name,Address,Phone,Website` (taken from the
/// serde renames on [`BusinessRecord`]); fields containing delimiters or
/// quotes get standard CSV quoting. An empty slice yields a header-only
/// table — an empty run is a valid outcome, not an error.
///
/// # Errors
///
/// Returns [`ExportError`] if the underlying writer fails. With an
/// in-memory buffer this only happens on serialization bugs, but the
/// error is propagated rather than swallowed.
pub fn to_csv(records: &[BusinessRecord]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    if records.is_empty() {
        // serialize() emits headers from the first record; with no records
        // the header row has to be written explicitly.
        writer.write_record(["Name", "Address", "Phone", "Website"])?;
    }
    for record in records {
        writer.serialize(record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::NOT_AVAILABLE;

    fn record(name: &str, address: &str, phone: &str, website: &str) -> BusinessRecord {
        BusinessRecord {
            name: name.to_owned(),
            address: address.to_owned(),
            phone: phone.to_owned(),
            website: website.to_owned(),
        }
    }

    #[test]
    fn empty_result_set_yields_exactly_the_header_row() {
        let csv = to_csv(&[]).unwrap();
        assert_eq!(csv, "Name,Address,Phone,Website\n");
    }

    #[test]
    fn one_record_yields_header_plus_one_row() {
        let csv = to_csv(&[record(
            "Kadikoy Cafe",
            "Moda Cad. No: 12, 34710",
            "0532 123 45 67",
            NOT_AVAILABLE,
        )])
        .unwrap();
        assert_eq!(
            csv,
            "Name,Address,Phone,Website\n\
             Kadikoy Cafe,\"Moda Cad. No: 12, 34710\",0532 123 45 67,N/A\n"
        );
    }

    #[test]
    fn embedded_commas_are_quoted() {
        let csv = to_csv(&[record(
            "Acme, Ltd.",
            "N/A",
            "0555 111 22 33",
            "https://acme.example",
        )])
        .unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Name,Address,Phone,Website"));
        assert_eq!(
            lines.next(),
            Some("\"Acme, Ltd.\",N/A,0555 111 22 33,https://acme.example")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn embedded_quotes_are_escaped() {
        let csv = to_csv(&[record(
            "The \"Best\" Bakery",
            "N/A",
            "0555 111 22 33",
            "N/A",
        )])
        .unwrap();
        assert!(csv.contains("\"The \"\"Best\"\" Bakery\""));
    }

    #[test]
    fn rows_preserve_insertion_order() {
        let csv = to_csv(&[
            record("First", "N/A", "0532 000 00 01", "N/A"),
            record("Second", "N/A", "0532 000 00 02", "N/A"),
        ])
        .unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("First,"));
        assert!(lines[2].starts_with("Second,"));
    }
}
