pub mod articles;
pub mod events;
pub mod fields;
pub mod members;
pub mod newsroom;
pub mod podcasts;
pub mod press;
pub mod similar;
pub mod team;
pub mod videos;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::airtable::fetch::fetch_all;
use crate::airtable::{ListQuery, RawRecord, RecordSource};
use crate::config::{AirtableSettings, TableSettings};
use crate::error::ApiError;
use self::similar::{rank_similar, Keyworded, SIMILAR_LIMIT};

pub use articles::Article;
pub use events::Event;
pub use members::GcMember;
pub use newsroom::NewsroomPost;
pub use podcasts::Podcast;
pub use press::PressArticle;
pub use team::TeamMember;
pub use videos::Video;

/// Anything with a stable source id.
pub trait Record {
    fn id(&self) -> &str;
}

/// What a list route does when the upstream fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPolicy {
    /// Log and answer with an empty list.
    Swallow,
    /// Fail the request.
    Propagate,
}

/// A content type served by the API: fetched fresh and normalized on every call.
#[async_trait]
pub trait Collection: Record + Serialize + Sized + Send + Sync + 'static {
    /// Singular name used in logs and 404 bodies.
    const LABEL: &'static str;
    const LIST_POLICY: ListPolicy = ListPolicy::Swallow;

    async fn fetch(catalog: &Catalog) -> Result<Vec<Self>, ApiError>;
}

/// Entry point for content reads. Holds the record source and the table
/// identifiers; carries no per-request state.
#[derive(Clone)]
pub struct Catalog {
    source: Arc<dyn RecordSource>,
    settings: Arc<AirtableSettings>,
}

impl Catalog {
    pub fn new(source: Arc<dyn RecordSource>, settings: Arc<AirtableSettings>) -> Self {
        Catalog { source, settings }
    }

    pub fn settings(&self) -> &AirtableSettings {
        &self.settings
    }

    pub fn source(&self) -> &dyn RecordSource {
        self.source.as_ref()
    }

    /// List query for a configured table; a blank table id is a configuration error.
    pub fn query(&self, table: &TableSettings, what: &str) -> Result<ListQuery, ApiError> {
        if table.table_id.trim().is_empty() {
            return Err(ApiError::ConfigurationMissing(format!("{} table id", what)));
        }
        Ok(ListQuery::for_table(&self.settings, table))
    }

    /// Every record of a table, all pages.
    pub async fn records(
        &self,
        table: &TableSettings,
        what: &str,
    ) -> Result<Vec<RawRecord>, ApiError> {
        let query = self.query(table, what)?;
        Ok(fetch_all(self.source(), &query).await?)
    }

    pub async fn list<T: Collection>(&self) -> Result<Vec<T>, ApiError> {
        let items = T::fetch(self).await?;
        info!("Fetched {} {} records", items.len(), T::LABEL);
        Ok(items)
    }

    /// `list` under the type's failure policy.
    pub async fn list_for_route<T: Collection>(&self) -> Result<Vec<T>, ApiError> {
        match self.list::<T>().await {
            Ok(items) => Ok(items),
            Err(e) if T::LIST_POLICY == ListPolicy::Swallow => {
                warn!("Serving empty {} list after failure: {}", T::LABEL, e);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch the whole collection and pick one record by id.
    pub async fn get<T: Collection>(&self, id: &str) -> Result<T, ApiError> {
        self.list::<T>()
            .await?
            .into_iter()
            .find(|item| item.id() == id)
            .ok_or(ApiError::NotFound(T::LABEL))
    }

    /// Up to three records sharing keywords with `id`. Never fails: fetch
    /// errors and unknown ids both give an empty list.
    pub async fn similar<T: Collection + Keyworded>(&self, id: &str) -> Vec<T> {
        match self.list::<T>().await {
            Ok(pool) => rank_similar(id, pool, SIMILAR_LIMIT),
            Err(e) => {
                warn!("Similar {} lookup for {} failed: {}", T::LABEL, id, e);
                Vec::new()
            }
        }
    }
}
