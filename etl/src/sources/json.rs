use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::EtlResult;

/// Records read from one source file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceBatch<T> {
    pub records: Vec<T>,
    /// Elements or lines that could not be deserialized and were skipped.
    pub malformed: u64,
}

impl<T> Default for SourceBatch<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            malformed: 0,
        }
    }
}

/// Reads records from a JSON array file or a JSON-lines file.
pub async fn read_records<T: DeserializeOwned>(path: &Path) -> EtlResult<SourceBatch<T>> {
    let content = tokio::fs::read_to_string(path).await?;
    let batch = parse_records(&content)?;

    debug!(
        path = %path.display(),
        records = batch.records.len(),
        malformed = batch.malformed,
        "source file read"
    );

    Ok(batch)
}

/// Parses a JSON array or JSON-lines document.
///
/// A document starting with `[` must be a valid array; elements that do not deserialize into
/// `T` are skipped and counted. Otherwise every non-blank line is one record, and lines that
/// are not valid records are skipped and counted.
pub fn parse_records<T: DeserializeOwned>(content: &str) -> EtlResult<SourceBatch<T>> {
    let mut batch = SourceBatch::default();

    if content.trim_start().starts_with('[') {
        let values: Vec<serde_json::Value> = serde_json::from_str(content)?;
        for (position, value) in values.into_iter().enumerate() {
            match serde_json::from_value(value) {
                Ok(record) => batch.records.push(record),
                Err(err) => {
                    warn!(position, error = %err, "skipping malformed record");
                    batch.malformed += 1;
                }
            }
        }

        return Ok(batch);
    }

    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str(line) {
            Ok(record) => batch.records.push(record),
            Err(err) => {
                warn!(line = number + 1, error = %err, "skipping malformed record");
                batch.malformed += 1;
            }
        }
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::{RawCustomer, RawVehicle};

    #[test]
    fn test_json_array() {
        let batch: SourceBatch<RawCustomer> = parse_records(
            r#"[
                {"id": 1, "first": "John", "last": "Smith", "postcode": "SW1A"},
                {"customer_id": "2", "first_name": "Ann", "last_name": "Lee"}
            ]"#,
        )
        .unwrap();

        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.records[1].id, Some(2));
        assert_eq!(batch.malformed, 0);
    }

    #[test]
    fn test_json_lines_skip_malformed_lines() {
        let batch: SourceBatch<RawVehicle> = parse_records(
            "{\"first\": \"john\", \"last\": \"smith\", \"model\": \"Civic\", \"year\": 2019}\n\
             \n\
             {not json}\n\
             {\"fullName\": \"Ann Lee\", \"model\": \"Golf\", \"year\": \"2015\"}\n",
        )
        .unwrap();

        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.records[0].year, Some(2019));
        assert_eq!(batch.records[1].full_name.as_deref(), Some("Ann Lee"));
        assert_eq!(batch.malformed, 1);
    }

    #[test]
    fn test_array_elements_of_wrong_shape_are_counted() {
        let batch: SourceBatch<RawCustomer> =
            parse_records(r#"[{"first": "John", "last": "Smith"}, 42, "text"]"#).unwrap();

        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.malformed, 2);
    }

    #[test]
    fn test_broken_array_is_an_error() {
        let err = parse_records::<RawCustomer>("[{\"first\": \"John\"").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DeserializationError);
    }
}
