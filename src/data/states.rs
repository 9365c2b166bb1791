//! State-abbreviation reference list: cache file or one-time HTML scrape.

use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use scraper::{Html, Selector};

use crate::cache::CachedSource;
use crate::error::AppError;

const STATES_URL: &str = "https://simple.wikipedia.org/wiki/List_of_U.S._states";

/// The ordered state list, cached one code per line.
pub struct StateListSource {
    cache_path: PathBuf,
    client: Client,
}

impl StateListSource {
    pub fn new(cache_path: PathBuf) -> Self {
        Self {
            cache_path,
            client: Client::new(),
        }
    }
}

impl CachedSource for StateListSource {
    type Value = Vec<String>;

    fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    fn load(&self) -> Result<Vec<String>, AppError> {
        let raw = std::fs::read_to_string(&self.cache_path).map_err(|e| {
            AppError::config(format!(
                "Failed to read state list '{}': {e}",
                self.cache_path.display()
            ))
        })?;
        Ok(raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn fetch_remote(&self) -> Result<Vec<String>, AppError> {
        let resp = self
            .client
            .get(STATES_URL)
            .send()
            .map_err(|e| AppError::remote(format!("State list request failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(AppError::remote(format!(
                "State list request failed with status {}.",
                resp.status()
            )));
        }
        let html = resp
            .text()
            .map_err(|e| AppError::remote(format!("Failed to read state list page: {e}")))?;

        let codes = extract_first_column(&html);
        if codes.is_empty() {
            return Err(AppError::remote(
                "State list page contained no table rows.",
            ));
        }
        Ok(codes)
    }

    fn persist(&self, value: &Vec<String>) -> Result<(), AppError> {
        let mut out = String::new();
        for code in value {
            out.push_str(code);
            out.push('\n');
        }
        std::fs::write(&self.cache_path, out).map_err(|e| {
            AppError::config(format!(
                "Failed to write state list '{}': {e}",
                self.cache_path.display()
            ))
        })
    }
}

/// Extract the first data column of the first table on the page.
///
/// Header rows use `<th>` cells, so selecting `<td>` naturally skips them.
/// The remote table's shape is not otherwise validated; a page change flows
/// straight into the cache.
fn extract_first_column(html: &str) -> Vec<String> {
    let table_sel = Selector::parse("table").expect("Invalid CSS selector for tables");
    let row_sel = Selector::parse("tr").expect("Invalid CSS selector for rows");
    let cell_sel = Selector::parse("td").expect("Invalid CSS selector for cells");

    let document = Html::parse_document(html);
    let Some(table) = document.select(&table_sel).next() else {
        return Vec::new();
    };

    table
        .select(&row_sel)
        .filter_map(|row| row.select(&cell_sel).next())
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <table class="wikitable">
          <tr><th>Abbreviation</th><th>Name</th></tr>
          <tr><td> AL </td><td>Alabama</td></tr>
          <tr><td>AK</td><td>Alaska</td></tr>
          <tr><td>AZ</td><td>Arizona</td></tr>
        </table>
        <table><tr><td>ignored</td></tr></table>
        </body></html>
    "#;

    #[test]
    fn extracts_first_column_of_first_table() {
        let codes = extract_first_column(PAGE);
        assert_eq!(codes, vec!["AL", "AK", "AZ"]);
    }

    #[test]
    fn pages_without_tables_yield_nothing() {
        assert!(extract_first_column("<html><body><p>hi</p></body></html>").is_empty());
    }

    #[test]
    fn cache_round_trip_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let source = StateListSource::new(dir.path().join("dat_states_abbv.dat"));

        let codes: Vec<String> = ["TX", "AK", "AL"].iter().map(|s| s.to_string()).collect();
        source.persist(&codes).unwrap();
        assert_eq!(source.load().unwrap(), codes);
    }

    #[test]
    fn load_trims_and_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dat_states_abbv.dat");
        std::fs::write(&path, " TX \n\nAK\n").unwrap();

        let source = StateListSource::new(path);
        assert_eq!(source.load().unwrap(), vec!["TX", "AK"]);
    }
}
