use async_trait::async_trait;
use serde::Serialize;

use super::fields::Fields;
use super::similar::Keyworded;
use super::{Catalog, Collection, Record};
use crate::airtable::RawRecord;
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Video {
    pub id: String,
    pub video_description: String,
    pub vimeo_name: String,
    pub vimeo_long_description: String,
    pub featured_speakers: String,
    pub headshot: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub keywords: Vec<String>,
    pub vimeo_embedder: String,
    pub vanguard_vimeo_link: String,
    pub display_order: f64,
}

pub fn normalize(record: &RawRecord) -> Video {
    let f = Fields(&record.fields);
    Video {
        id: record.id.clone(),
        video_description: f.joined(&["Video Description", "Description"]),
        vimeo_name: f.joined(&["Vimeo Name", "Name"]),
        vimeo_long_description: f.joined(&["Vimeo Long Description"]),
        featured_speakers: f.joined(&["Featured Speakers", "Featured Speaker"]),
        headshot: f.attachment_url(&["Headshot"]),
        category: f.joined(&["Category"]),
        tags: f.sequence(&["Tags"]),
        keywords: f.sequence(&["Keywords"]),
        vimeo_embedder: f.joined(&["Vimeo Embedder", "Vimeo Embed"]),
        vanguard_vimeo_link: f.joined(&["Vanguard Vimeo Link"]),
        display_order: f.number(&["Display Order", "Order"]),
    }
}

/// Highest display order first; equal orders keep fetch order.
pub fn sort_by_display_order(videos: &mut [Video]) {
    videos.sort_by(|a, b| b.display_order.total_cmp(&a.display_order));
}

impl Record for Video {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Keyworded for Video {
    fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

#[async_trait]
impl Collection for Video {
    const LABEL: &'static str = "Video";

    async fn fetch(catalog: &Catalog) -> Result<Vec<Self>, ApiError> {
        let records = catalog.records(&catalog.settings().videos, "videos").await?;
        let mut videos: Vec<Video> = records.iter().map(normalize).collect();
        sort_by_display_order(&mut videos);
        Ok(videos)
    }
}
