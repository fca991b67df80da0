use tracing::{debug, warn};

use super::{ListQuery, RawRecord, RecordSource, UpstreamError};

/// Walk every page of a list query, following the continuation token until
/// the source stops returning one. There is no page cap.
pub async fn fetch_all(
    source: &dyn RecordSource,
    query: &ListQuery,
) -> Result<Vec<RawRecord>, UpstreamError> {
    let mut records = Vec::new();
    let mut offset: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = source.list_page(query, offset.as_deref()).await?;
        pages += 1;
        records.extend(page.records);
        match page.offset {
            Some(next) => offset = Some(next),
            None => break,
        }
    }

    debug!(
        "Fetched {} records from {} in {} page(s)",
        records.len(),
        query.table_id,
        pages
    );
    Ok(records)
}

/// Two-tier fetch: list through the server-side view, and when that fails,
/// list the whole table and approximate the view with `keep`.
pub struct ViewFallback {
    pub query: ListQuery,
    pub keep: fn(&RawRecord) -> bool,
}

/// Which tier produced the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    View,
    Unfiltered,
}

impl ViewFallback {
    pub fn new(query: ListQuery, keep: fn(&RawRecord) -> bool) -> Self {
        ViewFallback { query, keep }
    }

    pub async fn fetch(
        &self,
        source: &dyn RecordSource,
    ) -> Result<(Tier, Vec<RawRecord>), UpstreamError> {
        if self.query.view.is_some() {
            match fetch_all(source, &self.query).await {
                Ok(records) => return Ok((Tier::View, records)),
                Err(e) => warn!(
                    "View {:?} on {} not accessible ({}), retrying without view",
                    self.query.view, self.query.table_id, e
                ),
            }
        }

        let all = fetch_all(source, &self.query.without_view()).await?;
        let total = all.len();
        let kept: Vec<RawRecord> = all.into_iter().filter(|r| (self.keep)(r)).collect();
        debug!("Client-side filter kept {}/{} records", kept.len(), total);
        Ok((Tier::Unfiltered, kept))
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airtable::testing::{record, MemorySource};
    use serde_json::json;

    fn query(table: &str, view: Option<&str>) -> ListQuery {
        ListQuery {
            base_id: "appTEST".into(),
            table_id: table.into(),
            view: view.map(Into::into),
            max_records: None,
        }
    }

    fn ids(records: &[RawRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[tokio::test]
    async fn walks_three_pages_in_order() {
        let source = MemorySource::new().with_pages(
            "tblVideos",
            vec![
                vec![record("a", json!({})), record("b", json!({}))],
                vec![record("c", json!({}))],
                vec![record("d", json!({})), record("e", json!({}))],
            ],
        );

        let records = fetch_all(&source, &query("tblVideos", None)).await.unwrap();
        assert_eq!(ids(&records), vec!["a", "b", "c", "d", "e"]);

        let offsets: Vec<Option<String>> = source
            .calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, o)| o.clone())
            .collect();
        assert_eq!(offsets, vec![None, Some("t1".into()), Some("t2".into())]);
    }

    #[tokio::test]
    async fn single_page_makes_one_call() {
        let source = MemorySource::new().with_records("tblTeam", vec![record("a", json!({}))]);
        let records = fetch_all(&source, &query("tblTeam", None)).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn page_failure_propagates() {
        let source = MemorySource::new().failing_table("tblTeam");
        let err = fetch_all(&source, &query("tblTeam", None)).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Status { status: 503, .. }));
    }

    fn has_name(r: &RawRecord) -> bool {
        r.fields.get("Name").and_then(|v| v.as_str()).is_some_and(|s| !s.is_empty())
    }

    #[tokio::test]
    async fn view_tier_used_when_accessible() {
        let source = MemorySource::new()
            .with_records("tblM", vec![record("all", json!({}))])
            .with_view("tblM", "viwM", vec![record("viewed", json!({}))]);

        let (tier, records) = ViewFallback::new(query("tblM", Some("viwM")), has_name)
            .fetch(&source)
            .await
            .unwrap();
        assert_eq!(tier, Tier::View);
        assert_eq!(ids(&records), vec!["viewed"]);
    }

    #[tokio::test]
    async fn falls_back_to_filtered_table() {
        let source = MemorySource::new()
            .with_records(
                "tblM",
                vec![
                    record("keep", json!({"Name": "Ann"})),
                    record("drop", json!({"Name": ""})),
                    record("drop2", json!({})),
                ],
            )
            .failing_view("viwM");

        let (tier, records) = ViewFallback::new(query("tblM", Some("viwM")), has_name)
            .fetch(&source)
            .await
            .unwrap();
        assert_eq!(tier, Tier::Unfiltered);
        assert_eq!(ids(&records), vec!["keep"]);

        let calls = source.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].0.view, None);
    }

    #[tokio::test]
    async fn both_tiers_failing_propagates() {
        let source = MemorySource::new().failing_table("tblM");
        let result = ViewFallback::new(query("tblM", Some("viwM")), has_name)
            .fetch(&source)
            .await;
        assert!(result.is_err());
    }
}
