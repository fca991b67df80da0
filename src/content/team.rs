use async_trait::async_trait;
use serde::Serialize;

use super::fields::Fields;
use super::{Catalog, Collection, Record};
use crate::airtable::RawRecord;
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
    pub bio: String,
    pub image: Option<String>,
    pub linkedin: String,
    pub section: String,
}

pub fn normalize(record: &RawRecord) -> TeamMember {
    let f = Fields(&record.fields);
    TeamMember {
        id: record.id.clone(),
        name: f.joined(&["Name", "Full Name"]),
        role: f.joined(&["Role", "Title"]),
        bio: f.joined(&["Bio"]),
        image: f.attachment_url(&["Image", "Headshot", "Photo"]),
        linkedin: f.joined(&["LinkedIn", "LinkedIn URL"]),
        section: f.joined(&["Section", "Team Section"]),
    }
}

impl Record for TeamMember {
    fn id(&self) -> &str {
        &self.id
    }
}

#[async_trait]
impl Collection for TeamMember {
    const LABEL: &'static str = "Team member";

    async fn fetch(catalog: &Catalog) -> Result<Vec<Self>, ApiError> {
        let records = catalog.records(&catalog.settings().team, "team").await?;
        Ok(records.iter().map(normalize).collect())
    }
}
