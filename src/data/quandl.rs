//! Nasdaq Data Link (Quandl) integration for Freddie Mac HPI series.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::data::SeriesProvider;
use crate::domain::Credential;
use crate::error::AppError;

const BASE_URL: &str = "https://data.nasdaq.com/api/v3/datasets";
const DATASET_PREFIX: &str = "FMAC/HPI_";

pub struct QuandlClient {
    client: Client,
    credential: Credential,
}

impl QuandlClient {
    pub fn new(credential: Credential) -> Self {
        Self {
            client: Client::new(),
            credential,
        }
    }

    /// Fetch one dataset's full history, sorted by ascending date.
    fn fetch_dataset(&self, dataset: &str) -> Result<Vec<(NaiveDate, f64)>, AppError> {
        let url = format!("{BASE_URL}/{dataset}.json");
        let resp = self
            .client
            .get(&url)
            .query(&[("api_key", self.credential.as_str()), ("order", "asc")])
            .send()
            .map_err(|e| AppError::remote(format!("Request for {dataset} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::remote(format!(
                "Request for {dataset} failed with status {}.",
                resp.status()
            )));
        }

        let body: DatasetResponse = resp
            .json()
            .map_err(|e| AppError::remote(format!("Failed to parse {dataset} response: {e}")))?;

        let observations = parse_rows(&body.dataset.data)?;
        if observations.is_empty() {
            return Err(AppError::remote(format!(
                "No observations returned for dataset {dataset}."
            )));
        }
        Ok(observations)
    }
}

impl SeriesProvider for QuandlClient {
    fn fetch_series(&self, code: &str) -> Result<Vec<(NaiveDate, f64)>, AppError> {
        self.fetch_dataset(&format!("{DATASET_PREFIX}{code}"))
    }
}

#[derive(Debug, Deserialize)]
struct DatasetResponse {
    dataset: Dataset,
}

#[derive(Debug, Deserialize)]
struct Dataset {
    data: Vec<Vec<serde_json::Value>>,
}

/// Turn raw dataset rows into dated observations.
///
/// Each row is `[date, value, ...]`; only the first value column is used.
/// Rows with a null value are skipped (same treatment as an absent point).
fn parse_rows(rows: &[Vec<serde_json::Value>]) -> Result<Vec<(NaiveDate, f64)>, AppError> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let raw_date = row
            .first()
            .and_then(|v| v.as_str())
            .ok_or_else(|| AppError::remote("Dataset row is missing its date."))?;
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
            .map_err(|e| AppError::remote(format!("Invalid dataset date '{raw_date}': {e}")))?;

        let Some(value) = row.get(1) else {
            return Err(AppError::remote(format!(
                "Dataset row for {raw_date} has no value column."
            )));
        };
        if value.is_null() {
            continue;
        }
        let value = value
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                AppError::remote(format!("Non-numeric dataset value for {raw_date}: {value}"))
            })?;

        out.push((date, value));
    }
    out.sort_by_key(|(d, _)| *d);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_in_date_order() {
        let body: DatasetResponse = serde_json::from_str(
            r#"{"dataset":{"data":[["2020-02-29",110.5],["2020-01-31",100.25]]}}"#,
        )
        .unwrap();
        let obs = parse_rows(&body.dataset.data).unwrap();

        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].0, NaiveDate::from_ymd_opt(2020, 1, 31).unwrap());
        assert_eq!(obs[0].1, 100.25);
        assert_eq!(obs[1].1, 110.5);
    }

    #[test]
    fn null_values_are_skipped() {
        let rows: Vec<Vec<serde_json::Value>> =
            serde_json::from_str(r#"[["2020-01-31",null],["2020-02-29",42.0]]"#).unwrap();
        let obs = parse_rows(&rows).unwrap();
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].1, 42.0);
    }

    #[test]
    fn malformed_date_is_a_remote_error() {
        let rows: Vec<Vec<serde_json::Value>> =
            serde_json::from_str(r#"[["01/31/2020",1.0]]"#).unwrap();
        assert_eq!(parse_rows(&rows).unwrap_err().exit_code(), 4);
    }

    #[test]
    fn non_numeric_value_is_a_remote_error() {
        let rows: Vec<Vec<serde_json::Value>> =
            serde_json::from_str(r#"[["2020-01-31","wat"]]"#).unwrap();
        assert_eq!(parse_rows(&rows).unwrap_err().exit_code(), 4);
    }
}
