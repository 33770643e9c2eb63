use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- Contact form ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    #[default]
    New,
    InProgress,
    Resolved,
}

fn default_inquiry_type() -> String {
    "general".to_string()
}

#[derive(Debug, Deserialize, Validate)]
pub struct ContactSubmission {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(min = 5, max = 200))]
    pub subject: String,
    #[validate(length(min = 10, max = 2000))]
    pub message: String,
    #[serde(alias = "inquiryType", default = "default_inquiry_type")]
    #[validate(length(min = 1, max = 50))]
    pub inquiry_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    #[serde(default = "default_inquiry_type")]
    pub inquiry_type: String,
    #[serde(default)]
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ContactStatusUpdate {
    pub status: ContactStatus,
}

// --- Volunteer applications ---

fn default_volunteer_status() -> String {
    "pending".to_string()
}

#[derive(Debug, Deserialize, Validate)]
pub struct VolunteerSubmission {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 10, max = 20))]
    pub phone: String,
    #[validate(length(max = 500))]
    pub skills: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub availability: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[validate(length(max = 1000))]
    pub experience: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolunteerApplication {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub skills: Option<String>,
    pub availability: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default = "default_volunteer_status")]
    pub status: String,
    pub created_at: DateTime<Utc>,
}

// --- Newsletter ---

#[derive(Debug, Deserialize, Validate)]
pub struct NewsletterRequest {
    #[validate(email)]
    pub email: String,
}

impl NewsletterRequest {
    /// Subscriptions are keyed by the trimmed, lowercased address, so the
    /// request is normalized before it is validated.
    pub fn normalized(self) -> Self {
        NewsletterRequest {
            email: self.email.trim().to_lowercase(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterSubscription {
    pub id: Uuid,
    pub email: String,
    pub subscribed_at: DateTime<Utc>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionOutcome {
    Subscribed,
    AlreadySubscribed,
    Reactivated,
}

impl SubscriptionOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            SubscriptionOutcome::Subscribed => "Successfully subscribed to newsletter!",
            SubscriptionOutcome::AlreadySubscribed => "You are already subscribed to our newsletter!",
            SubscriptionOutcome::Reactivated => "Welcome back! Your newsletter subscription has been reactivated.",
        }
    }
}
