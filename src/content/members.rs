use async_trait::async_trait;
use serde::Serialize;

use super::fields::Fields;
use super::{Catalog, Collection, Record};
use crate::airtable::fetch::{Tier, ViewFallback};
use crate::airtable::RawRecord;
use crate::error::ApiError;

const NAME: &[&str] = &["Whole Name", "Name", "Full Name"];
const COMPANY: &[&str] = &["Company", "Company Name"];
const POSITION: &[&str] = &["Position", "Title"];

/// GC Exchange member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GcMember {
    pub id: String,
    pub whole_name: String,
    pub headshot: Option<String>,
    pub company: String,
    pub position: String,
}

pub fn normalize(record: &RawRecord) -> GcMember {
    let f = Fields(&record.fields);
    GcMember {
        id: record.id.clone(),
        whole_name: f.joined(NAME),
        headshot: f.attachment_url(&["Headshot", "Photo"]),
        company: f.joined(COMPANY),
        position: f.joined(POSITION),
    }
}

/// Client-side stand-in for the members view: a name plus a company or a position.
pub fn listed_in_directory(record: &RawRecord) -> bool {
    let f = Fields(&record.fields);
    f.value(NAME).is_some() && (f.value(COMPANY).is_some() || f.value(POSITION).is_some())
}

impl Record for GcMember {
    fn id(&self) -> &str {
        &self.id
    }
}

#[async_trait]
impl Collection for GcMember {
    const LABEL: &'static str = "GC member";

    async fn fetch(catalog: &Catalog) -> Result<Vec<Self>, ApiError> {
        let query = catalog.query(&catalog.settings().gc_members, "GC members")?;
        let (tier, records) = ViewFallback::new(query, listed_in_directory)
            .fetch(catalog.source())
            .await?;
        if tier == Tier::Unfiltered {
            tracing::info!("GC members served from unfiltered table ({} kept)", records.len());
        }
        Ok(records.iter().map(normalize).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airtable::testing::{fixture, MemorySource};
    use crate::config::test_settings;
    use std::sync::Arc;

    #[test]
    fn directory_filter() {
        let records = fixture("gc_members");
        let kept: Vec<&str> = records
            .iter()
            .filter(|r| listed_in_directory(r))
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(kept, vec!["recGc001", "recGc002"]);
    }

    #[tokio::test]
    async fn view_results_are_not_refiltered() {
        let source =
            MemorySource::new().with_view("tblMembers", "viwMembers", fixture("gc_members"));
        let catalog = Catalog::new(Arc::new(source), Arc::new(test_settings()));
        let members = GcMember::fetch(&catalog).await.unwrap();
        assert_eq!(members.len(), 4);
        assert_eq!(members[3].company, "Contoso");
    }

    #[tokio::test]
    async fn inaccessible_view_filters_client_side() {
        let source = MemorySource::new()
            .with_records("tblMembers", fixture("gc_members"))
            .failing_view("viwMembers");
        let catalog = Catalog::new(Arc::new(source), Arc::new(test_settings()));
        let members = GcMember::fetch(&catalog).await.unwrap();
        let names: Vec<&str> = members.iter().map(|m| m.whole_name.as_str()).collect();
        assert_eq!(names, vec!["Dana Whitfield", "Marcus Hale"]);
        assert_eq!(members[0].headshot.as_deref(), Some("https://dl.airtable.example/dana.jpg"));
    }
}
