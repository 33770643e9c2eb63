use crate::helper::sanitization_helpers::{validate_hex_color, validate_optional_http_url};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

// --- Impact statistics ---

fn default_youth_trained() -> u64 {
    1300
}
fn default_youth_placed() -> u64 {
    1000
}
fn default_seniors_supported() -> u64 {
    6000
}
fn default_women_empowered() -> u64 {
    200
}

/// The single impact-statistics record. Missing counters fall back to the
/// published defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImpactStats {
    #[serde(default = "default_youth_trained")]
    pub youth_trained: u64,
    #[serde(default = "default_youth_placed")]
    pub youth_placed: u64,
    #[serde(default = "default_seniors_supported")]
    pub seniors_supported: u64,
    #[serde(default = "default_women_empowered")]
    pub women_empowered: u64,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

impl Default for ImpactStats {
    fn default() -> Self {
        ImpactStats {
            youth_trained: default_youth_trained(),
            youth_placed: default_youth_placed(),
            seniors_supported: default_seniors_supported(),
            women_empowered: default_women_empowered(),
            updated_at: None,
            updated_by: None,
        }
    }
}

/// Public shape of the counters.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicImpactStats {
    pub youth_trained: u64,
    pub youth_placed: u64,
    pub seniors_supported: u64,
    pub women_empowered: u64,
}

impl From<ImpactStats> for PublicImpactStats {
    fn from(stats: ImpactStats) -> Self {
        PublicImpactStats {
            youth_trained: stats.youth_trained,
            youth_placed: stats.youth_placed,
            seniors_supported: stats.seniors_supported,
            women_empowered: stats.women_empowered,
        }
    }
}

/// Counters are unsigned, so negative values fail deserialization.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct ImpactStatsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youth_trained: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youth_placed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seniors_supported: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub women_empowered: Option<u64>,
}

// --- Site settings ---

fn default_site_title() -> String {
    "Shield Foundation".to_string()
}
fn default_site_description() -> String {
    "Adding Life to Years".to_string()
}
fn default_primary_color() -> String {
    "#2563eb".to_string()
}
fn default_secondary_color() -> String {
    "#eab308".to_string()
}
fn default_accent_color() -> String {
    "#ffffff".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteSettings {
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub favicon_url: Option<String>,
    #[serde(default = "default_site_title")]
    pub site_title: String,
    #[serde(default = "default_site_description")]
    pub site_description: String,
    #[serde(default = "default_primary_color")]
    pub primary_color: String,
    #[serde(default = "default_secondary_color")]
    pub secondary_color: String,
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
    #[serde(default)]
    pub facebook_url: Option<String>,
    #[serde(default)]
    pub instagram_url: Option<String>,
    #[serde(default)]
    pub youtube_url: Option<String>,
    #[serde(default)]
    pub twitter_url: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        SiteSettings {
            logo_url: None,
            favicon_url: None,
            site_title: default_site_title(),
            site_description: default_site_description(),
            primary_color: default_primary_color(),
            secondary_color: default_secondary_color(),
            accent_color: default_accent_color(),
            facebook_url: None,
            instagram_url: None,
            youtube_url: None,
            twitter_url: None,
            linkedin_url: None,
            updated_at: None,
            updated_by: None,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct SiteSettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_optional_http_url")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_optional_http_url")]
    pub favicon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub site_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub site_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_hex_color")]
    pub primary_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_hex_color")]
    pub secondary_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_hex_color")]
    pub accent_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_optional_http_url")]
    pub facebook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_optional_http_url")]
    pub instagram_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_optional_http_url")]
    pub youtube_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_optional_http_url")]
    pub twitter_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_optional_http_url")]
    pub linkedin_url: Option<String>,
}

// --- Site content ---

/// Free-form site copy keyed by page and section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SiteContent {
    #[serde(default)]
    pub content: Map<String, Value>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SiteContentUpdate {
    pub content: Map<String, Value>,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct ContactInfoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_records_fall_back_to_defaults() {
        let stats: ImpactStats = serde_json::from_value(json!({"youth_trained": 5})).unwrap();
        assert_eq!(stats.youth_trained, 5);
        assert_eq!(stats.seniors_supported, 6000);

        let settings = SiteSettings::default();
        assert_eq!(settings.site_title, "Shield Foundation");
        assert_eq!(settings.primary_color, "#2563eb");
    }

    #[test]
    fn public_stats_are_camel_case() {
        let value = serde_json::to_value(PublicImpactStats::from(ImpactStats::default())).unwrap();
        assert_eq!(
            value,
            json!({"youthTrained": 1300, "youthPlaced": 1000, "seniorsSupported": 6000, "womenEmpowered": 200})
        );
    }

    #[test]
    fn settings_update_checks_colors_and_links() {
        let bad: SiteSettingsUpdate =
            serde_json::from_value(json!({"primary_color": "blue", "facebook_url": "ftp://x"})).unwrap();
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("primary_color"));
        assert!(errors.field_errors().contains_key("facebook_url"));

        let good: SiteSettingsUpdate =
            serde_json::from_value(json!({"primary_color": "#000", "facebook_url": ""})).unwrap();
        assert!(good.validate().is_ok());
    }

    #[test]
    fn negative_counters_are_rejected() {
        let parsed = serde_json::from_value::<ImpactStatsUpdate>(json!({"youth_placed": -1}));
        assert!(parsed.is_err());
    }
}
