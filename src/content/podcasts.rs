use async_trait::async_trait;
use serde::Serialize;

use super::fields::Fields;
use super::similar::Keyworded;
use super::{Catalog, Collection, Record};
use crate::airtable::RawRecord;
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Podcast {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: Option<String>,
    pub featured_speaker: String,
    pub soundcloud_embed: String,
    pub keywords: Vec<String>,
}

pub fn normalize(record: &RawRecord) -> Podcast {
    let f = Fields(&record.fields);
    Podcast {
        id: record.id.clone(),
        title: f.joined(&["Podcast Title", "Title", "Name"]),
        description: f.joined(&["Description", "Podcast Description"]),
        thumbnail: f.attachment_url(&["Thumbnail", "Image"]),
        featured_speaker: f.joined(&["Featured Speaker", "Speaker"]),
        soundcloud_embed: f.joined(&["SoundCloud Embed", "Soundcloud Embed"]),
        keywords: f.sequence(&["Keywords"]),
    }
}

impl Record for Podcast {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Keyworded for Podcast {
    fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

#[async_trait]
impl Collection for Podcast {
    const LABEL: &'static str = "Podcast";

    async fn fetch(catalog: &Catalog) -> Result<Vec<Self>, ApiError> {
        let records = catalog
            .records(&catalog.settings().podcasts, "podcasts")
            .await?;
        Ok(records.iter().map(normalize).collect())
    }
}
