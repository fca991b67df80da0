use async_trait::async_trait;
use serde::Serialize;

use super::fields::Fields;
use super::{Catalog, Collection, Record};
use crate::airtable::RawRecord;
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsroomPost {
    pub id: String,
    pub blog_title: String,
    pub description_teaser: String,
    pub photo: Option<String>,
    pub newsroom_detail_image: Option<String>,
    pub body_of_blog: String,
    pub featured_speaker_linkedin: String,
    pub tags: Vec<String>,
    pub published_to_web: bool,
    pub type_content: String,
    pub publish_by: String,
}

/// Posts missing a title or a body are dropped.
pub fn normalize(record: &RawRecord) -> Option<NewsroomPost> {
    let f = Fields(&record.fields);
    let blog_title = f.joined(&["Blog Title", "Title"]);
    let body_of_blog = f.joined(&["Body of Blog", "Body"]);
    if blog_title.is_empty() || body_of_blog.is_empty() {
        return None;
    }

    Some(NewsroomPost {
        id: record.id.clone(),
        blog_title,
        description_teaser: f.joined(&["Description Teaser", "Teaser"]),
        photo: f.attachment_url(&["Photo", "Image"]),
        newsroom_detail_image: f.attachment_url(&["Newsroom Detail Image"]),
        body_of_blog,
        featured_speaker_linkedin: f.joined(&["Featured Speaker LinkedIn"]),
        tags: f.sequence(&["Tags"]),
        published_to_web: f.flag(&["Published to Web"]),
        type_content: f.joined(&["Type Content", "Type of Content"]),
        publish_by: f.joined(&["Publish By", "Publish Date"]),
    })
}

impl Record for NewsroomPost {
    fn id(&self) -> &str {
        &self.id
    }
}

#[async_trait]
impl Collection for NewsroomPost {
    const LABEL: &'static str = "Newsroom article";

    async fn fetch(catalog: &Catalog) -> Result<Vec<Self>, ApiError> {
        let records = catalog
            .records(&catalog.settings().newsroom, "newsroom")
            .await?;
        Ok(records.iter().filter_map(normalize).collect())
    }
}
