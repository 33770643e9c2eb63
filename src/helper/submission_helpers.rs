use crate::error::{ApiError, OrInternal};
use crate::helper::sanitization_helpers::strip_all_html;
use crate::models::db_operations::content_db_operations::{self as store, Document};
use crate::models::submission_models::{
    ContactMessage, ContactStatus, ContactSubmission, NewsletterSubscription, SubscriptionOutcome,
    VolunteerApplication, VolunteerSubmission,
};
use chrono::Utc;
use redb::Database;
use serde_json::{json, Value};
use uuid::Uuid;

/// Stores a contact message. Returns only once the write has committed.
pub fn record_contact(db: &Database, submission: ContactSubmission) -> Result<ContactMessage, ApiError> {
    let message = ContactMessage {
        id: Uuid::new_v4(),
        name: strip_all_html(submission.name.trim()),
        email: submission.email.trim().to_lowercase(),
        phone: submission.phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
        subject: strip_all_html(&submission.subject),
        message: strip_all_html(&submission.message),
        inquiry_type: submission.inquiry_type,
        status: ContactStatus::New,
        created_at: Utc::now(),
    };
    store::insert_document(db, store::CONTACTS, message.id, &message)
        .or_internal("Failed to submit contact form")?;
    Ok(message)
}

pub fn record_volunteer(db: &Database, submission: VolunteerSubmission) -> Result<VolunteerApplication, ApiError> {
    let application = VolunteerApplication {
        id: Uuid::new_v4(),
        name: strip_all_html(submission.name.trim()),
        email: submission.email.trim().to_lowercase(),
        phone: submission.phone.trim().to_string(),
        skills: submission.skills.as_deref().map(strip_all_html),
        availability: strip_all_html(&submission.availability),
        interests: submission.interests.iter().map(|i| strip_all_html(i.trim())).collect(),
        experience: submission.experience.as_deref().map(strip_all_html),
        status: "pending".to_string(),
        created_at: Utc::now(),
    };
    store::insert_document(db, store::VOLUNTEERS, application.id, &application)
        .or_internal("Failed to submit volunteer application")?;
    Ok(application)
}

fn email_matches(doc: &Document, email: &str) -> bool {
    doc.get("email")
        .and_then(Value::as_str)
        .map(|stored| stored.eq_ignore_ascii_case(email))
        .unwrap_or(false)
}

/// Idempotent subscribe. Lookup and write share one transaction so concurrent
/// requests for the same address cannot create duplicates.
pub fn subscribe(db: &Database, email: &str) -> Result<SubscriptionOutcome, ApiError> {
    store::modify_collection(db, store::NEWSLETTERS, |table| {
        match store::find_in_table(&*table, |doc| email_matches(doc, email))? {
            Some((_, doc)) if doc.get("is_active").and_then(Value::as_bool).unwrap_or(false) => {
                Ok(SubscriptionOutcome::AlreadySubscribed)
            }
            Some((key, mut doc)) => {
                doc.insert("is_active".to_string(), json!(true));
                doc.insert("subscribed_at".to_string(), json!(Utc::now()));
                store::put_document(table, key, &doc)?;
                Ok(SubscriptionOutcome::Reactivated)
            }
            None => {
                let subscription = NewsletterSubscription {
                    id: Uuid::new_v4(),
                    email: email.to_string(),
                    subscribed_at: Utc::now(),
                    is_active: true,
                };
                let doc = store::to_document(&subscription)?;
                store::put_document(table, subscription.id, &doc)?;
                Ok(SubscriptionOutcome::Subscribed)
            }
        }
    })
    .or_internal("Failed to subscribe to newsletter")
}

/// Returns false when the address was never subscribed.
pub fn unsubscribe(db: &Database, email: &str) -> Result<bool, ApiError> {
    store::modify_collection(db, store::NEWSLETTERS, |table| {
        match store::find_in_table(&*table, |doc| email_matches(doc, email))? {
            Some((key, mut doc)) => {
                doc.insert("is_active".to_string(), json!(false));
                store::put_document(table, key, &doc)?;
                Ok(true)
            }
            None => Ok(false),
        }
    })
    .or_internal("Failed to unsubscribe from newsletter")
}

pub fn list_contacts(db: &Database) -> Result<Vec<ContactMessage>, ApiError> {
    let mut contacts = store::read_all::<ContactMessage>(db, store::CONTACTS).or_internal("Failed to fetch contacts")?;
    contacts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(contacts)
}

pub fn list_volunteers(db: &Database) -> Result<Vec<VolunteerApplication>, ApiError> {
    let mut volunteers =
        store::read_all::<VolunteerApplication>(db, store::VOLUNTEERS).or_internal("Failed to fetch volunteers")?;
    volunteers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(volunteers)
}

/// Active subscriptions, newest first.
pub fn list_active_subscriptions(db: &Database) -> Result<Vec<NewsletterSubscription>, ApiError> {
    let mut subscriptions = store::read_all::<NewsletterSubscription>(db, store::NEWSLETTERS)
        .or_internal("Failed to fetch newsletter subscriptions")?;
    subscriptions.retain(|s| s.is_active);
    subscriptions.sort_by(|a, b| b.subscribed_at.cmp(&a.subscribed_at));
    Ok(subscriptions)
}

pub fn set_contact_status(db: &Database, id: &str, status: ContactStatus) -> Result<(), ApiError> {
    let mut fields = Document::new();
    fields.insert("status".to_string(), json!(status));
    fields.insert("updated_at".to_string(), json!(Utc::now()));

    let found = store::update_by_id(db, store::CONTACTS, id, fields).or_internal("Failed to update contact")?;
    if found {
        Ok(())
    } else {
        Err(ApiError::not_found("Contact not found"))
    }
}

pub fn delete_contact(db: &Database, id: &str) -> Result<(), ApiError> {
    let found = store::delete_by_id(db, store::CONTACTS, id).or_internal("Failed to delete contact")?;
    if found {
        Ok(())
    } else {
        Err(ApiError::not_found("Contact not found"))
    }
}
