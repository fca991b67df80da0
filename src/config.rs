use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "https://api.airtable.com/v0";
pub const DEFAULT_MEMBERS_EVENTS_URL: &str = "https://members.thevanguardnetwork.com/events";

/// Process-wide settings, loaded once at startup and injected everywhere else.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub bind: String,
    pub db_path: String,
    pub airtable: AirtableSettings,
    #[serde(default)]
    pub contact: ContactSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirtableSettings {
    pub api_url: String,
    #[serde(default)]
    pub access_token: String,
    pub base_id: String,
    /// Used to build the events registration fallback link.
    pub members_events_url: String,
    pub events: TableSettings,
    pub podcasts: TableSettings,
    pub videos: TableSettings,
    pub articles: TableSettings,
    /// Legacy Q&A articles live in their own table; empty id disables it.
    pub articles_qa: TableSettings,
    pub press: TableSettings,
    pub newsroom: TableSettings,
    pub gc_members: TableSettings,
    pub team: TableSettings,
    pub membership: TableSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableSettings {
    /// Overrides `AirtableSettings::base_id` when set.
    #[serde(default)]
    pub base_id: Option<String>,
    #[serde(default)]
    pub table_id: String,
    #[serde(default)]
    pub view_id: Option<String>,
    #[serde(default)]
    pub max_records: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactSettings {
    #[serde(default)]
    pub webhook_url: Option<String>,
}

impl Settings {
    /// Defaults, then an optional `vanguard.toml`, then `VANGUARD_*` env vars
    /// (nested keys separated by `__`, e.g. `VANGUARD_AIRTABLE__ACCESS_TOKEN`).
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("bind", "0.0.0.0:8001")?
            .set_default("db_path", "data/status.sqlite")?
            .set_default("airtable.api_url", DEFAULT_API_URL)?
            .set_default("airtable.base_id", "appm4C4MiNYVWwBaq")?
            .set_default("airtable.members_events_url", DEFAULT_MEMBERS_EVENTS_URL)?
            .set_default("airtable.events.table_id", "tbljv81RwwFDCb0eU")?
            .set_default("airtable.events.view_id", "viwFw2XGGs3wTZvs6")?
            .set_default("airtable.events.max_records", 100)?
            .set_default("airtable.podcasts.table_id", "")?
            .set_default("airtable.videos.table_id", "")?
            .set_default("airtable.articles.table_id", "")?
            .set_default("airtable.articles_qa.table_id", "")?
            .set_default("airtable.press.table_id", "")?
            .set_default("airtable.newsroom.table_id", "")?
            .set_default("airtable.gc_members.table_id", "")?
            .set_default("airtable.team.table_id", "")?
            .set_default("airtable.membership.table_id", "")?
            .add_source(File::with_name("vanguard").required(false))
            .add_source(
                Environment::with_prefix("VANGUARD")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to build settings")?;

        settings
            .try_deserialize()
            .context("Failed to deserialize settings")
    }
}

impl AirtableSettings {
    /// Base id for a table, falling back to the shared base.
    pub fn base_for<'a>(&'a self, table: &'a TableSettings) -> &'a str {
        table
            .base_id
            .as_deref()
            .filter(|b| !b.is_empty())
            .unwrap_or(&self.base_id)
    }
}

#[cfg(test)]
pub(crate) fn test_settings() -> AirtableSettings {
    let table = |id: &str, view: Option<&str>| TableSettings {
        base_id: None,
        table_id: id.to_string(),
        view_id: view.map(str::to_string),
        max_records: None,
    };
    AirtableSettings {
        api_url: DEFAULT_API_URL.to_string(),
        access_token: "test-token".to_string(),
        base_id: "appTEST".to_string(),
        members_events_url: DEFAULT_MEMBERS_EVENTS_URL.to_string(),
        events: table("tblEvents", Some("viwEvents")),
        podcasts: table("tblPodcasts", None),
        videos: table("tblVideos", None),
        articles: table("tblArticles", None),
        articles_qa: table("tblArticlesQa", None),
        press: table("tblPress", None),
        newsroom: table("tblNewsroom", None),
        gc_members: table("tblMembers", Some("viwMembers")),
        team: table("tblTeam", None),
        membership: TableSettings {
            base_id: Some("appMembership".to_string()),
            ..table("tblMembership", None)
        },
    }
}
