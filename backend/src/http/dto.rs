//! Data Transfer Objects for the HTTP API.

use serde::{Deserialize, Serialize};

pub use crate::api::{Fact, FactId};

use super::error::AppError;

/// JSON body for creating or replacing a fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactRequest {
    pub fact: String,
}

/// Query-string form of [`FactRequest`], accepted when no body is sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactQuery {
    #[serde(default)]
    pub fact: Option<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the service
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Collect every `ids` value from raw query pairs.
///
/// Returns `None` when the parameter is absent so the caller can ask for the
/// whole collection.
pub fn parse_ids(pairs: &[(String, String)]) -> Result<Option<Vec<FactId>>, AppError> {
    let mut ids = Vec::new();
    for (key, value) in pairs {
        if key != "ids" {
            continue;
        }
        let id = value.trim().parse::<i64>().map_err(|_| {
            AppError::BadRequest(format!(
                "Query parameter 'ids' must be an integer, got '{}'",
                value
            ))
        })?;
        if !ids.contains(&FactId(id)) {
            ids.push(FactId(id));
        }
    }
    Ok(if ids.is_empty() { None } else { Some(ids) })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_ids_absent() {
        assert_eq!(parse_ids(&pairs(&[("other", "1")])).unwrap(), None);
    }

    #[test]
    fn test_parse_ids_repeated_and_deduplicated() {
        let ids = parse_ids(&pairs(&[("ids", "2"), ("ids", "1"), ("ids", "2")]))
            .unwrap()
            .unwrap();
        assert_eq!(ids, vec![FactId(2), FactId(1)]);
    }

    #[test]
    fn test_parse_ids_rejects_non_integers() {
        assert!(matches!(
            parse_ids(&pairs(&[("ids", "one")])),
            Err(AppError::BadRequest(_))
        ));
    }
}
