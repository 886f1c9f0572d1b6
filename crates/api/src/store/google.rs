//! Google Sheets v4 REST implementation of [`SheetStore`].
//!
//! Reads use the values endpoint with formatted rendering so cells arrive
//! as the strings a person sees in the sheet. Writes use the append
//! endpoint (`USER_ENTERED`) and `batchUpdate` with an `addSheet` request
//! for tab creation.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use super::{SheetStore, StoreError};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Client for the Google Sheets API.
#[derive(Clone)]
pub struct GoogleSheetsStore {
    inner: Arc<GoogleSheetsStoreInner>,
}

struct GoogleSheetsStoreInner {
    client: reqwest::Client,
    base_url: String,
    access_token: SecretString,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendResponse {
    updates: Option<AppendUpdates>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendUpdates {
    updated_rows: Option<u32>,
}

impl GoogleSheetsStore {
    /// Create a new Sheets API client with an OAuth bearer token.
    #[must_use]
    pub fn new(access_token: SecretString) -> Self {
        Self::with_base_url(access_token, SHEETS_API_BASE.to_string())
    }

    /// Create a client against a non-default endpoint (test servers).
    #[must_use]
    pub fn with_base_url(access_token: SecretString, base_url: String) -> Self {
        Self {
            inner: Arc::new(GoogleSheetsStoreInner {
                client: reqwest::Client::new(),
                base_url,
                access_token,
            }),
        }
    }

    /// Quoted, percent-encoded A1 range covering a whole tab.
    fn tab_range(sheet: &str) -> String {
        // Single quotes in a title are escaped by doubling in A1 notation
        let escaped = sheet.replace('\'', "''");
        urlencoding::encode(&format!("'{escaped}'")).into_owned()
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> Result<T, StoreError> {
        let response = self
            .inner
            .client
            .get(&url)
            .bearer_auth(self.inner.access_token.expose_secret())
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
        body: &serde_json::Value,
    ) -> Result<T, StoreError> {
        let response = self
            .inner
            .client
            .post(&url)
            .bearer_auth(self.inner.access_token.expose_secret())
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                "Sheets API returned non-success status"
            );
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: text.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse Sheets API response"
            );
            StoreError::Malformed(e.to_string())
        })
    }
}

/// Stringify one cell the way the sheet displays it.
fn cell_to_string(cell: &serde_json::Value) -> String {
    match cell {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl SheetStore for GoogleSheetsStore {
    #[instrument(skip(self), fields(store_id = %store_id))]
    async fn sheet_titles(&self, store_id: &str) -> Result<Vec<String>, StoreError> {
        let url = format!(
            "{}/{store_id}?fields=sheets.properties.title",
            self.inner.base_url
        );
        let meta: SpreadsheetMeta = self.get_json(url).await?;
        Ok(meta
            .sheets
            .into_iter()
            .map(|s| s.properties.title)
            .collect())
    }

    #[instrument(skip(self), fields(store_id = %store_id, sheet = %sheet))]
    async fn read_grid(&self, store_id: &str, sheet: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let url = format!(
            "{}/{store_id}/values/{}?majorDimension=ROWS&valueRenderOption=FORMATTED_VALUE",
            self.inner.base_url,
            Self::tab_range(sheet)
        );
        let range: ValueRange = self.get_json(url).await?;
        Ok(range
            .values
            .into_iter()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect())
    }

    #[instrument(skip(self, rows), fields(store_id = %store_id, sheet = %sheet, rows = rows.len()))]
    async fn append_rows(
        &self,
        store_id: &str,
        sheet: &str,
        rows: &[Vec<String>],
    ) -> Result<u32, StoreError> {
        let url = format!(
            "{}/{store_id}/values/{}:append?valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS",
            self.inner.base_url,
            Self::tab_range(sheet)
        );
        let body = json!({ "values": rows });
        let response: AppendResponse = self.post_json(url, &body).await?;

        #[allow(clippy::cast_possible_truncation)]
        let requested = rows.len() as u32;
        Ok(response
            .updates
            .and_then(|u| u.updated_rows)
            .unwrap_or(requested))
    }

    #[instrument(skip(self), fields(store_id = %store_id, sheet = %sheet))]
    async fn create_sheet(&self, store_id: &str, sheet: &str) -> Result<(), StoreError> {
        let url = format!("{}/{store_id}:batchUpdate", self.inner.base_url);
        let body = json!({
            "requests": [
                { "addSheet": { "properties": { "title": sheet } } }
            ]
        });
        let _: serde_json::Value = self.post_json(url, &body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_range_quotes_and_encodes() {
        assert_eq!(GoogleSheetsStore::tab_range("Santa Fe"), "%27Santa%20Fe%27");
    }

    #[test]
    fn tab_range_escapes_single_quotes() {
        assert_eq!(
            GoogleSheetsStore::tab_range("Joe's"),
            urlencoding::encode("'Joe''s'").into_owned()
        );
    }

    #[test]
    fn cell_stringification() {
        assert_eq!(cell_to_string(&serde_json::json!("abc")), "abc");
        assert_eq!(cell_to_string(&serde_json::json!(42)), "42");
        assert_eq!(cell_to_string(&serde_json::Value::Null), "");
    }
}
