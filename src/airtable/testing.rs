//! In-memory record source for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{ListQuery, Page, RawRecord, RecordSource, UpstreamError};

pub fn record(id: &str, fields: Value) -> RawRecord {
    RawRecord {
        id: id.to_string(),
        fields: match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        },
    }
}

/// Loads `tests/fixtures/<name>.json`, an array of raw records.
pub fn fixture(name: &str) -> Vec<RawRecord> {
    let json = std::fs::read_to_string(format!("tests/fixtures/{}.json", name)).unwrap();
    serde_json::from_str(&json).unwrap()
}

#[derive(Default)]
pub struct MemorySource {
    tables: HashMap<String, Vec<Vec<RawRecord>>>,
    views: HashMap<(String, String), Vec<Vec<RawRecord>>>,
    failing_views: HashSet<String>,
    failing_tables: HashSet<String>,
    fail_writes: bool,
    pub calls: Mutex<Vec<(ListQuery, Option<String>)>>,
    pub created: Mutex<Vec<(String, String, Map<String, Value>)>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(self, table: &str, records: Vec<RawRecord>) -> Self {
        self.with_pages(table, vec![records])
    }

    pub fn with_pages(mut self, table: &str, pages: Vec<Vec<RawRecord>>) -> Self {
        self.tables.insert(table.to_string(), pages);
        self
    }

    pub fn with_view(mut self, table: &str, view: &str, records: Vec<RawRecord>) -> Self {
        self.views
            .insert((table.to_string(), view.to_string()), vec![records]);
        self
    }

    pub fn failing_view(mut self, view: &str) -> Self {
        self.failing_views.insert(view.to_string());
        self
    }

    pub fn failing_table(mut self, table: &str) -> Self {
        self.failing_tables.insert(table.to_string());
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

fn unavailable(status: u16) -> UpstreamError {
    UpstreamError::Status {
        status,
        body: "unavailable".to_string(),
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn list_page(
        &self,
        query: &ListQuery,
        offset: Option<&str>,
    ) -> Result<Page, UpstreamError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.clone(), offset.map(str::to_string)));

        if self.failing_tables.contains(&query.table_id) {
            return Err(unavailable(503));
        }

        let pages = match &query.view {
            Some(view) if self.failing_views.contains(view) => return Err(unavailable(422)),
            Some(view) => self
                .views
                .get(&(query.table_id.clone(), view.clone()))
                .or_else(|| self.tables.get(&query.table_id)),
            None => self.tables.get(&query.table_id),
        };
        let Some(pages) = pages else {
            return Err(unavailable(404));
        };

        let index = match offset {
            Some(token) => token
                .trim_start_matches('t')
                .parse::<usize>()
                .map_err(|_| unavailable(422))?,
            None => 0,
        };
        let records = pages.get(index).cloned().unwrap_or_default();
        let offset = if index + 1 < pages.len() {
            Some(format!("t{}", index + 1))
        } else {
            None
        };
        Ok(Page { records, offset })
    }

    async fn create_record(
        &self,
        base_id: &str,
        table_id: &str,
        fields: Map<String, Value>,
    ) -> Result<RawRecord, UpstreamError> {
        if self.fail_writes {
            return Err(unavailable(503));
        }
        let mut created = self.created.lock().unwrap();
        created.push((base_id.to_string(), table_id.to_string(), fields.clone()));
        Ok(RawRecord {
            id: format!("recNew{}", created.len()),
            fields,
        })
    }
}
