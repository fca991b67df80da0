use async_trait::async_trait;
use serde::Serialize;

use super::fields::Fields;
use super::{Catalog, Collection, ListPolicy, Record};
use crate::airtable::RawRecord;
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: String,
    pub event_title: String,
    pub date_time: String,
    pub start_date: String,
    pub listing_picture: Option<String>,
    pub registration_url: String,
    pub default_signup_url: String,
    pub more_details_url: String,
    pub speaker: String,
    pub session_leader_name: String,
    pub location: String,
    pub audience_network: String,
}

/// Link priority: "More Details URL", then the non-member signup URL, then the
/// members events page with the magic-link suffix appended (bare page when
/// there is no suffix).
pub fn registration_url(
    more_details_url: &str,
    default_signup_url: &str,
    magic_link_suffix: &str,
    members_events_url: &str,
) -> String {
    if !more_details_url.is_empty() {
        more_details_url.to_string()
    } else if !default_signup_url.is_empty() {
        default_signup_url.to_string()
    } else if !magic_link_suffix.is_empty() {
        format!("{}{}", members_events_url, magic_link_suffix)
    } else {
        members_events_url.to_string()
    }
}

pub fn normalize(record: &RawRecord, members_events_url: &str) -> Event {
    let f = Fields(&record.fields);
    let more_details_url = f.joined(&["More Details URL"]);
    let default_signup_url = f.joined(&["Default Sign up URL (for NON-members)"]);
    let suffix = f.joined(&["Append to magic link"]);

    Event {
        id: record.id.clone(),
        event_title: f.joined(&["Event Title"]),
        date_time: f.joined(&["Date & Time being/end"]),
        start_date: f.joined(&["Start Date"]),
        listing_picture: f.attachment_url(&["Listing Picture"]),
        registration_url: registration_url(
            &more_details_url,
            &default_signup_url,
            &suffix,
            members_events_url,
        ),
        default_signup_url,
        more_details_url,
        speaker: f.joined(&["Speaker"]),
        session_leader_name: f.joined(&["Session Leader Name"]),
        location: f.joined(&["Location"]),
        audience_network: f.joined(&["Audience Network"]),
    }
}

impl Record for Event {
    fn id(&self) -> &str {
        &self.id
    }
}

#[async_trait]
impl Collection for Event {
    const LABEL: &'static str = "Event";
    const LIST_POLICY: ListPolicy = ListPolicy::Propagate;

    async fn fetch(catalog: &Catalog) -> Result<Vec<Self>, ApiError> {
        let settings = catalog.settings();
        let records = catalog.records(&settings.events, "events").await?;
        Ok(records
            .iter()
            .map(|r| normalize(r, &settings.members_events_url))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airtable::testing::{fixture, record};
    use crate::config::DEFAULT_MEMBERS_EVENTS_URL;
    use serde_json::json;

    #[test]
    fn more_details_url_wins() {
        assert_eq!(
            registration_url("https://a", "https://b", "?x=1", DEFAULT_MEMBERS_EVENTS_URL),
            "https://a"
        );
    }

    #[test]
    fn signup_url_second() {
        assert_eq!(
            registration_url("", "https://b", "?x=1", DEFAULT_MEMBERS_EVENTS_URL),
            "https://b"
        );
    }

    #[test]
    fn magic_link_suffix_appended() {
        assert_eq!(
            registration_url("", "", "?foo=1", DEFAULT_MEMBERS_EVENTS_URL),
            "https://members.thevanguardnetwork.com/events?foo=1"
        );
    }

    #[test]
    fn bare_base_when_nothing_set() {
        assert_eq!(
            registration_url("", "", "", DEFAULT_MEMBERS_EVENTS_URL),
            "https://members.thevanguardnetwork.com/events"
        );
    }

    #[test]
    fn session_leaders_joined() {
        let r = record(
            "rec1",
            json!({
                "Event Title": "GC Roundtable",
                "Session Leader Name": ["Ann Lee", "Bo Chen"],
                "Listing Picture": [{"url": "https://img/1.png"}, {"url": "https://img/2.png"}],
            }),
        );
        let e = normalize(&r, DEFAULT_MEMBERS_EVENTS_URL);
        assert_eq!(e.session_leader_name, "Ann Lee, Bo Chen");
        assert_eq!(e.listing_picture.as_deref(), Some("https://img/1.png"));
        assert_eq!(e.registration_url, DEFAULT_MEMBERS_EVENTS_URL);
        assert_eq!(e.speaker, "");
    }

    #[test]
    fn fixture_events() {
        let events: Vec<Event> = fixture("events")
            .iter()
            .map(|r| normalize(r, DEFAULT_MEMBERS_EVENTS_URL))
            .collect();
        assert_eq!(events.len(), 3);

        assert_eq!(events[0].event_title, "AI Governance for General Counsel");
        assert_eq!(events[0].registration_url, "https://vanguard.example/events/ai-governance");
        assert_eq!(events[0].session_leader_name, "Dana Whitfield");

        assert_eq!(events[1].registration_url, "https://signup.example/risk");
        assert_eq!(events[1].listing_picture, None);

        assert_eq!(
            events[2].registration_url,
            "https://members.thevanguardnetwork.com/events?event=life-sciences"
        );
        assert_eq!(events[2].event_title, "");
    }
}
