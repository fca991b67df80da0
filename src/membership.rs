use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{error, info};

use crate::airtable::RecordSource;
use crate::config::AirtableSettings;
use crate::error::ApiError;

/// Membership application as posted by the front end.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MembershipApplication {
    pub full_name: String,
    pub work_email: String,
    #[serde(default)]
    pub personal_email: String,
    #[serde(default)]
    pub phone_number: String,
    pub company_name: String,
    pub job_title: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub network_interest: String,
    #[serde(default)]
    pub recommended_by: String,
}

#[derive(Debug, Serialize)]
pub struct Submitted {
    pub success: bool,
    pub id: String,
    pub message: String,
}

impl MembershipApplication {
    /// Airtable column names; blank values are left out.
    pub fn to_fields(&self) -> Map<String, Value> {
        let columns = [
            ("Full Name", &self.full_name),
            ("Work Email", &self.work_email),
            ("Personal Email", &self.personal_email),
            ("Phone Number", &self.phone_number),
            ("Company Name", &self.company_name),
            ("Job Title", &self.job_title),
            ("Country", &self.country),
            ("Network Interest", &self.network_interest),
            ("Recommended By", &self.recommended_by),
        ];
        columns
            .into_iter()
            .filter_map(|(column, value)| {
                let value = value.trim();
                (!value.is_empty()).then(|| (column.to_string(), Value::String(value.to_string())))
            })
            .collect()
    }
}

pub async fn submit(
    source: &dyn RecordSource,
    settings: &AirtableSettings,
    application: &MembershipApplication,
) -> Result<Submitted, ApiError> {
    let table = &settings.membership;
    let base_id = table
        .base_id
        .as_deref()
        .filter(|b| !b.trim().is_empty())
        .ok_or_else(|| ApiError::ConfigurationMissing("membership base id".to_string()))?;
    if table.table_id.trim().is_empty() {
        return Err(ApiError::ConfigurationMissing(
            "membership table id".to_string(),
        ));
    }

    let created = source
        .create_record(base_id, &table.table_id, application.to_fields())
        .await
        .map_err(|e| {
            error!("Membership submission failed: {}", e);
            ApiError::Submission(format!("Failed to submit application: {}", e))
        })?;

    info!("Membership application stored as {}", created.id);
    Ok(Submitted {
        success: true,
        id: created.id,
        message: "Application submitted successfully".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airtable::testing::MemorySource;
    use crate::config::test_settings;

    fn application() -> MembershipApplication {
        MembershipApplication {
            full_name: "Dana Whitfield".into(),
            work_email: "dana@northwind.example".into(),
            company_name: "Northwind Health".into(),
            job_title: "General Counsel".into(),
            network_interest: "General Counsel Network".into(),
            recommended_by: "  ".into(),
            ..Default::default()
        }
    }

    #[test]
    fn maps_to_column_names_and_skips_blanks() {
        let fields = application().to_fields();
        assert_eq!(fields.len(), 5);
        assert_eq!(fields["Full Name"], "Dana Whitfield");
        assert_eq!(fields["Network Interest"], "General Counsel Network");
        assert!(!fields.contains_key("Recommended By"));
        assert!(!fields.contains_key("Phone Number"));
    }

    #[tokio::test]
    async fn submits_to_membership_table() {
        let source = MemorySource::new();
        let out = submit(&source, &test_settings(), &application()).await.unwrap();
        assert!(out.success);
        assert_eq!(out.id, "recNew1");

        let created = source.created.lock().unwrap();
        assert_eq!(created[0].0, "appMembership");
        assert_eq!(created[0].1, "tblMembership");
    }

    #[tokio::test]
    async fn missing_base_is_configuration_error() {
        let mut settings = test_settings();
        settings.membership.base_id = None;
        let err = submit(&MemorySource::new(), &settings, &application())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ConfigurationMissing(_)));
    }

    #[tokio::test]
    async fn missing_table_is_configuration_error() {
        let mut settings = test_settings();
        settings.membership.table_id = String::new();
        let source = MemorySource::new();
        let err = submit(&source, &settings, &application()).await.unwrap_err();
        assert!(matches!(err, ApiError::ConfigurationMissing(_)));
        assert!(source.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_is_reported() {
        let source = MemorySource::new().failing_writes();
        let err = submit(&source, &test_settings(), &application())
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to submit application"));
    }
}
