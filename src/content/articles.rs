use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use super::fields::Fields;
use super::similar::Keyworded;
use super::{Catalog, Collection, Record};
use crate::airtable::RawRecord;
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub id: String,
    pub blog_title: String,
    pub description_teaser: String,
    pub photo: Option<String>,
    pub featured_speaker_linkedin: String,
    pub body_qa: String,
    pub body_of_blog: String,
    pub tags: Vec<String>,
    pub published_to_web: bool,
    pub type_content: String,
    pub publish_by: String,
}

/// Blog table rows are always emitted.
pub fn normalize(record: &RawRecord) -> Article {
    let f = Fields(&record.fields);
    Article {
        id: record.id.clone(),
        blog_title: f.joined(&["Blog Title", "Title"]),
        description_teaser: f.joined(&["Description Teaser", "Teaser"]),
        photo: f.attachment_url(&["Photo", "Image"]),
        featured_speaker_linkedin: f.joined(&["Featured Speaker LinkedIn"]),
        body_qa: f.joined(&["Body Q&A"]),
        body_of_blog: f.joined(&["Body of Blog", "Body"]),
        tags: f.sequence(&["Tags"]),
        published_to_web: f.flag(&["Published to Web"]),
        type_content: f.joined(&["Type Content", "Type of Content"]),
        publish_by: f.joined(&["Publish By", "Publish Date"]),
    }
}

/// Legacy Q&A rows need both a title and a Q&A body, otherwise they are dropped.
pub fn normalize_legacy_qa(record: &RawRecord) -> Option<Article> {
    let f = Fields(&record.fields);
    let blog_title = f.joined(&["Title", "Question Title", "Blog Title"]);
    let body_qa = f.joined(&["Q&A", "Body Q&A"]);
    if blog_title.is_empty() || body_qa.is_empty() {
        return None;
    }

    let type_content = f.joined(&["Type Content"]);
    Some(Article {
        id: record.id.clone(),
        blog_title,
        description_teaser: f.joined(&["Intro", "Description Teaser"]),
        photo: f.attachment_url(&["Photo", "Headshot"]),
        featured_speaker_linkedin: f.joined(&["Featured Speaker LinkedIn", "LinkedIn"]),
        body_qa,
        body_of_blog: String::new(),
        tags: f.sequence(&["Tags"]),
        published_to_web: f.flag(&["Published to Web"]),
        type_content: if type_content.is_empty() {
            "Q&A".to_string()
        } else {
            type_content
        },
        publish_by: f.joined(&["Publish By", "Date"]),
    })
}

impl Record for Article {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Keyworded for Article {
    fn keywords(&self) -> &[String] {
        &self.tags
    }
}

#[async_trait]
impl Collection for Article {
    const LABEL: &'static str = "Article";

    async fn fetch(catalog: &Catalog) -> Result<Vec<Self>, ApiError> {
        let settings = catalog.settings();
        let records = catalog.records(&settings.articles, "articles").await?;
        let mut articles: Vec<Article> = records.iter().map(normalize).collect();

        if !settings.articles_qa.table_id.trim().is_empty() {
            match catalog
                .records(&settings.articles_qa, "legacy Q&A articles")
                .await
            {
                Ok(legacy) => {
                    let total = legacy.len();
                    articles.extend(legacy.iter().filter_map(normalize_legacy_qa));
                    debug!("Legacy Q&A: kept {} of {}", articles.len() - records.len(), total);
                }
                Err(e) => warn!("Legacy Q&A articles unavailable, serving blog rows only: {}", e),
            }
        }

        Ok(articles)
    }
}
