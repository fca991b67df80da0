use async_trait::async_trait;
use serde::Serialize;

use super::fields::Fields;
use super::{Catalog, Collection, Record};
use crate::airtable::RawRecord;
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PressArticle {
    pub id: String,
    pub article_title: String,
    pub author_names: String,
    pub short_description: String,
    pub photo: Option<String>,
    pub body_of_article: String,
    pub authors_intro: String,
}

/// `None` unless the row has both a title and a body.
pub fn normalize(record: &RawRecord) -> Option<PressArticle> {
    let f = Fields(&record.fields);
    let article_title = f.joined(&["Article Title", "Title"]);
    let body_of_article = f.joined(&["Body of Article", "Body"]);
    if article_title.is_empty() || body_of_article.is_empty() {
        return None;
    }

    Some(PressArticle {
        id: record.id.clone(),
        article_title,
        author_names: f.joined(&["Author Names", "Authors"]),
        short_description: f.joined(&["Short Description"]),
        photo: f.attachment_url(&["Photo", "Image"]),
        body_of_article,
        authors_intro: f.joined(&["Authors Intro"]),
    })
}

impl Record for PressArticle {
    fn id(&self) -> &str {
        &self.id
    }
}

#[async_trait]
impl Collection for PressArticle {
    const LABEL: &'static str = "Press article";

    async fn fetch(catalog: &Catalog) -> Result<Vec<Self>, ApiError> {
        let records = catalog.records(&catalog.settings().press, "press").await?;
        Ok(records.iter().filter_map(normalize).collect())
    }
}
