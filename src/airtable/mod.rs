pub mod fetch;
#[cfg(test)]
pub mod testing;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{AirtableSettings, TableSettings};

/// One row as returned by the record API.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// One page of a list response. `offset` is the opaque continuation token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub records: Vec<RawRecord>,
    #[serde(default)]
    pub offset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub base_id: String,
    pub table_id: String,
    pub view: Option<String>,
    pub max_records: Option<u32>,
}

impl ListQuery {
    pub fn for_table(settings: &AirtableSettings, table: &TableSettings) -> Self {
        ListQuery {
            base_id: settings.base_for(table).to_string(),
            table_id: table.table_id.clone(),
            view: table.view_id.clone().filter(|v| !v.is_empty()),
            max_records: table.max_records,
        }
    }

    /// Same query with the server-side view dropped.
    pub fn without_view(&self) -> Self {
        ListQuery {
            view: None,
            ..self.clone()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// Read/write access to the record API. Implemented over HTTP by
/// [`AirtableClient`]; tests plug in in-memory sources.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn list_page(
        &self,
        query: &ListQuery,
        offset: Option<&str>,
    ) -> Result<Page, UpstreamError>;

    async fn create_record(
        &self,
        base_id: &str,
        table_id: &str,
        fields: Map<String, Value>,
    ) -> Result<RawRecord, UpstreamError>;
}

#[derive(Clone)]
pub struct AirtableClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl AirtableClient {
    pub fn new(settings: &AirtableSettings) -> Self {
        AirtableClient {
            http: reqwest::Client::new(),
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            token: settings.access_token.clone(),
        }
    }

    fn table_url(&self, base_id: &str, table_id: &str) -> String {
        format!("{}/{}/{}", self.api_url, base_id, table_id)
    }
}

#[async_trait]
impl RecordSource for AirtableClient {
    async fn list_page(
        &self,
        query: &ListQuery,
        offset: Option<&str>,
    ) -> Result<Page, UpstreamError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(view) = &query.view {
            params.push(("view", view.clone()));
        }
        if let Some(n) = query.max_records {
            params.push(("maxRecords", n.to_string()));
        }
        if let Some(token) = offset {
            params.push(("offset", token.to_string()));
        }

        let url = self.table_url(&query.base_id, &query.table_id);
        debug!("GET {} {:?}", url, params);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Page>().await?)
    }

    async fn create_record(
        &self,
        base_id: &str,
        table_id: &str,
        fields: Map<String, Value>,
    ) -> Result<RawRecord, UpstreamError> {
        let url = self.table_url(base_id, table_id);
        debug!("POST {} ({} fields)", url, fields.len());
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "fields": fields }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<RawRecord>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_settings;

    #[test]
    fn page_without_offset_is_last() {
        let page: Page = serde_json::from_str(
            r#"{"records":[{"id":"rec1","fields":{"Name":"A"}},{"id":"rec2"}]}"#,
        )
        .unwrap();
        assert_eq!(page.records.len(), 2);
        assert!(page.records[1].fields.is_empty());
        assert!(page.offset.is_none());
    }

    #[test]
    fn query_drops_empty_view() {
        let s = test_settings();
        let mut table = s.podcasts.clone();
        table.view_id = Some(String::new());
        let q = ListQuery::for_table(&s, &table);
        assert_eq!(q.view, None);
        assert_eq!(q.table_id, "tblPodcasts");

        let q = ListQuery::for_table(&s, &s.gc_members);
        assert_eq!(q.view.as_deref(), Some("viwMembers"));
        assert_eq!(q.without_view().view, None);
        assert_eq!(q.without_view().table_id, "tblMembers");
    }

    #[test]
    fn client_trims_trailing_slash() {
        let mut s = test_settings();
        s.api_url = "http://localhost:9999/v0/".to_string();
        let c = AirtableClient::new(&s);
        assert_eq!(c.table_url("app1", "tbl1"), "http://localhost:9999/v0/app1/tbl1");
    }
}
