use super::PublishStatus;
use crate::helper::sanitization_helpers::{sanitize_rich_text, strip_all_html, validate_image_reference};
use crate::models::db_operations::content_db_operations as store;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use uuid::Uuid;
use validator::Validate;

// ====================================================================
// ======================= ENTITY FAMILY TRAITS =======================
// ====================================================================

/// A stored content record living in its own collection.
pub trait ContentEntity: Serialize + DeserializeOwned + 'static {
    const COLLECTION: &'static str;
    /// Human label used in acknowledgements, e.g. "Gallery item".
    const LABEL: &'static str;
    /// Key wrapping list responses (`{"items": [...]}`); `None` returns a bare array.
    const LIST_KEY: Option<&'static str>;

    type PublicView: Serialize;

    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    /// Whether anonymous readers may see the record.
    fn is_public(&self) -> bool;
    fn public_view(&self) -> Self::PublicView;

    fn display_order(&self) -> i64 {
        0
    }

    /// `order` ascending, newest first within the same position.
    fn listing_order(a: &Self, b: &Self) -> Ordering {
        a.display_order()
            .cmp(&b.display_order())
            .then_with(|| b.created_at().cmp(&a.created_at()))
    }
}

/// Content grouped under a site page (`home`, `about`, ...).
pub trait PageScoped: ContentEntity {
    fn page(&self) -> &str;
}

/// A validated create payload for one entity family.
pub trait ContentDraft: DeserializeOwned + Validate + 'static {
    type Entity: ContentEntity;

    /// Builds the record with a fresh id and timestamps. `author` is the caller's username.
    fn into_entity(self, author: &str) -> Self::Entity;
}

/// A partial update payload. Absent or null fields are skipped on serialization
/// so only supplied values are merged into the stored record.
pub trait ContentPatch: Serialize + DeserializeOwned + Validate + 'static {
    type Entity: ContentEntity;

    fn sanitized(self) -> Self {
        self
    }
}

fn default_true() -> bool {
    true
}

fn new_timestamps() -> (Uuid, DateTime<Utc>) {
    (Uuid::new_v4(), Utc::now())
}

// ====================================================================
// ============================== NEWS ================================
// ====================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub status: PublishStatus,
    #[serde(default)]
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct NewsPublicView {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: String,
    pub status: PublishStatus,
    pub date: DateTime<Utc>,
}

impl ContentEntity for NewsArticle {
    const COLLECTION: &'static str = store::NEWS;
    const LABEL: &'static str = "News article";
    const LIST_KEY: Option<&'static str> = None;
    type PublicView = NewsPublicView;

    fn id(&self) -> Uuid {
        self.id
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn is_public(&self) -> bool {
        self.status == PublishStatus::Published
    }
    fn public_view(&self) -> NewsPublicView {
        NewsPublicView {
            id: self.id,
            title: self.title.clone(),
            content: self.content.clone(),
            author: self.author.clone(),
            status: self.status,
            date: self.created_at,
        }
    }
    fn listing_order(a: &Self, b: &Self) -> Ordering {
        b.created_at.cmp(&a.created_at)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewsDraft {
    #[validate(length(min = 5, max = 200))]
    pub title: String,
    #[validate(length(min = 20, max = 5000))]
    pub content: String,
    #[serde(default)]
    pub status: PublishStatus,
}

impl ContentDraft for NewsDraft {
    type Entity = NewsArticle;

    fn into_entity(self, author: &str) -> NewsArticle {
        let (id, now) = new_timestamps();
        NewsArticle {
            id,
            title: strip_all_html(&self.title),
            content: sanitize_rich_text(&self.content),
            status: self.status,
            author: author.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct NewsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 5, max = 200))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 20, max = 5000))]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PublishStatus>,
}

impl ContentPatch for NewsPatch {
    type Entity = NewsArticle;

    fn sanitized(self) -> Self {
        NewsPatch {
            title: self.title.as_deref().map(strip_all_html),
            content: self.content.as_deref().map(sanitize_rich_text),
            status: self.status,
        }
    }
}

// ====================================================================
// ============================== BLOGS ===============================
// ====================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub status: PublishStatus,
    #[serde(default)]
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct BlogPublicView {
    pub id: Uuid,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    pub image: Option<String>,
    pub author: String,
    #[serde(rename = "publishDate")]
    pub publish_date: DateTime<Utc>,
    pub status: PublishStatus,
}

/// First 200 characters of the text, used when a post has no excerpt.
fn derive_excerpt(content: &str) -> String {
    let text = strip_all_html(content);
    let mut excerpt: String = text.chars().take(200).collect();
    if text.chars().count() > 200 {
        excerpt.push_str("...");
    }
    excerpt
}

impl ContentEntity for BlogPost {
    const COLLECTION: &'static str = store::BLOGS;
    const LABEL: &'static str = "Blog post";
    const LIST_KEY: Option<&'static str> = None;
    type PublicView = BlogPublicView;

    fn id(&self) -> Uuid {
        self.id
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn is_public(&self) -> bool {
        self.status == PublishStatus::Published
    }
    fn public_view(&self) -> BlogPublicView {
        BlogPublicView {
            id: self.id,
            title: self.title.clone(),
            excerpt: self
                .excerpt
                .clone()
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| derive_excerpt(&self.content)),
            content: self.content.clone(),
            category: self.category.clone().unwrap_or_else(|| "General".to_string()),
            tags: self.tags.clone(),
            image: self.image.clone(),
            author: self.author.clone(),
            publish_date: self.created_at,
            status: self.status,
        }
    }
    fn listing_order(a: &Self, b: &Self) -> Ordering {
        b.created_at.cmp(&a.created_at)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct BlogDraft {
    #[validate(length(min = 5, max = 200))]
    pub title: String,
    #[validate(length(min = 20, max = 5000))]
    pub content: String,
    #[validate(length(max = 500))]
    pub excerpt: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[validate(custom = "validate_image_reference")]
    pub image: Option<String>,
    #[serde(default)]
    pub status: PublishStatus,
}

impl ContentDraft for BlogDraft {
    type Entity = BlogPost;

    fn into_entity(self, author: &str) -> BlogPost {
        let (id, now) = new_timestamps();
        BlogPost {
            id,
            title: strip_all_html(&self.title),
            content: sanitize_rich_text(&self.content),
            excerpt: self.excerpt.as_deref().map(strip_all_html),
            category: self.category,
            tags: clean_tags(self.tags),
            image: self.image,
            status: self.status,
            author: author.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| strip_all_html(t.trim()))
        .filter(|t| !t.is_empty())
        .collect()
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct BlogPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 5, max = 200))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 20, max = 5000))]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_image_reference")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PublishStatus>,
}

impl ContentPatch for BlogPatch {
    type Entity = BlogPost;

    fn sanitized(self) -> Self {
        BlogPatch {
            title: self.title.as_deref().map(strip_all_html),
            content: self.content.as_deref().map(sanitize_rich_text),
            excerpt: self.excerpt.as_deref().map(strip_all_html),
            tags: self.tags.map(clean_tags),
            ..self
        }
    }
}

// ====================================================================
// ========================= SUCCESS STORIES ==========================
// ====================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessStory {
    pub id: Uuid,
    pub name: String,
    pub story: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub achievement: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub order: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentEntity for SuccessStory {
    const COLLECTION: &'static str = store::SUCCESS_STORIES;
    const LABEL: &'static str = "Success story";
    const LIST_KEY: Option<&'static str> = Some("stories");
    type PublicView = SuccessStory;

    fn id(&self) -> Uuid {
        self.id
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn is_public(&self) -> bool {
        self.is_active
    }
    fn public_view(&self) -> SuccessStory {
        self.clone()
    }
    fn display_order(&self) -> i64 {
        self.order
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SuccessStoryDraft {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(length(min = 10, max = 5000))]
    pub story: String,
    #[validate(custom = "validate_image_reference")]
    pub image: Option<String>,
    #[validate(length(max = 200))]
    pub achievement: Option<String>,
    #[validate(length(max = 100))]
    pub location: Option<String>,
    #[validate(length(max = 100))]
    pub program: Option<String>,
    #[serde(default)]
    pub order: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl ContentDraft for SuccessStoryDraft {
    type Entity = SuccessStory;

    fn into_entity(self, _author: &str) -> SuccessStory {
        let (id, now) = new_timestamps();
        SuccessStory {
            id,
            name: strip_all_html(&self.name),
            story: strip_all_html(&self.story),
            image: self.image,
            achievement: self.achievement,
            location: self.location,
            program: self.program,
            order: self.order,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct SuccessStoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 10, max = 5000))]
    pub story: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_image_reference")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200))]
    pub achievement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100))]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100))]
    pub program: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ContentPatch for SuccessStoryPatch {
    type Entity = SuccessStory;

    fn sanitized(self) -> Self {
        SuccessStoryPatch {
            name: self.name.as_deref().map(strip_all_html),
            story: self.story.as_deref().map(strip_all_html),
            ..self
        }
    }
}

// ====================================================================
// ========================= LEADERSHIP TEAM ==========================
// ====================================================================

fn default_team_category() -> String {
    "Trustee".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_team_category")]
    pub category: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentEntity for TeamMember {
    const COLLECTION: &'static str = store::LEADERSHIP_TEAM;
    const LABEL: &'static str = "Team member";
    const LIST_KEY: Option<&'static str> = Some("members");
    type PublicView = TeamMember;

    fn id(&self) -> Uuid {
        self.id
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn is_public(&self) -> bool {
        self.is_active
    }
    fn public_view(&self) -> TeamMember {
        self.clone()
    }
    fn display_order(&self) -> i64 {
        self.order
    }
    fn listing_order(a: &Self, b: &Self) -> Ordering {
        a.category
            .cmp(&b.category)
            .then_with(|| a.order.cmp(&b.order))
            .then_with(|| b.created_at.cmp(&a.created_at))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct TeamMemberDraft {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(length(min = 2, max = 100))]
    pub role: String,
    #[validate(custom = "validate_image_reference")]
    pub image: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default = "default_team_category")]
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl ContentDraft for TeamMemberDraft {
    type Entity = TeamMember;

    fn into_entity(self, _author: &str) -> TeamMember {
        let (id, now) = new_timestamps();
        TeamMember {
            id,
            name: strip_all_html(&self.name),
            role: strip_all_html(&self.role),
            image: self.image,
            description: self.description.as_deref().map(strip_all_html),
            category: self.category,
            order: self.order,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TeamMemberPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 100))]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_image_reference")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ContentPatch for TeamMemberPatch {
    type Entity = TeamMember;

    fn sanitized(self) -> Self {
        TeamMemberPatch {
            name: self.name.as_deref().map(strip_all_html),
            role: self.role.as_deref().map(strip_all_html),
            description: self.description.as_deref().map(strip_all_html),
            ..self
        }
    }
}

// ====================================================================
// ========================== PAGE SECTIONS ===========================
// ====================================================================

/// Free-form section body. Only guaranteed to be a JSON object.
pub type FlexibleContent = Map<String, Value>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSection {
    pub id: Uuid,
    pub page: String,
    pub section: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: FlexibleContent,
    #[serde(default)]
    pub order: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentEntity for PageSection {
    const COLLECTION: &'static str = store::PAGE_SECTIONS;
    const LABEL: &'static str = "Page section";
    const LIST_KEY: Option<&'static str> = Some("sections");
    type PublicView = PageSection;

    fn id(&self) -> Uuid {
        self.id
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn is_public(&self) -> bool {
        self.is_active
    }
    fn public_view(&self) -> PageSection {
        self.clone()
    }
    fn display_order(&self) -> i64 {
        self.order
    }
}

impl PageScoped for PageSection {
    fn page(&self) -> &str {
        &self.page
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct PageSectionDraft {
    #[validate(length(min = 1, max = 100))]
    pub page: String,
    #[validate(length(min = 1, max = 100))]
    pub section: String,
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[serde(default)]
    pub content: FlexibleContent,
    #[serde(default)]
    pub order: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl ContentDraft for PageSectionDraft {
    type Entity = PageSection;

    fn into_entity(self, _author: &str) -> PageSection {
        let (id, now) = new_timestamps();
        PageSection {
            id,
            page: self.page,
            section: self.section,
            title: self.title.as_deref().map(strip_all_html),
            content: self.content,
            order: self.order,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct PageSectionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<FlexibleContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ContentPatch for PageSectionPatch {
    type Entity = PageSection;

    fn sanitized(self) -> Self {
        PageSectionPatch {
            title: self.title.as_deref().map(strip_all_html),
            ..self
        }
    }
}

/// Structured body of a detailed page section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PageSectionContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_image_reference")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<FlexibleContent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<FlexibleContent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subsections: Option<Vec<FlexibleContent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FlexibleContent>,
}

impl PageSectionContent {
    fn sanitized(self) -> Self {
        PageSectionContent {
            html: self.html.as_deref().map(sanitize_rich_text),
            ..self
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedPageSection {
    pub id: Uuid,
    pub page: String,
    pub section: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: PageSectionContent,
    #[serde(default)]
    pub order: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentEntity for DetailedPageSection {
    const COLLECTION: &'static str = store::DETAILED_PAGE_SECTIONS;
    const LABEL: &'static str = "Detailed page section";
    const LIST_KEY: Option<&'static str> = Some("sections");
    type PublicView = DetailedPageSection;

    fn id(&self) -> Uuid {
        self.id
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn is_public(&self) -> bool {
        self.is_active
    }
    fn public_view(&self) -> DetailedPageSection {
        self.clone()
    }
    fn display_order(&self) -> i64 {
        self.order
    }
}

impl PageScoped for DetailedPageSection {
    fn page(&self) -> &str {
        &self.page
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct DetailedPageSectionDraft {
    #[validate(length(min = 1, max = 100))]
    pub page: String,
    #[validate(length(min = 1, max = 100))]
    pub section: String,
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[serde(default)]
    #[validate]
    pub content: PageSectionContent,
    #[serde(default)]
    pub order: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl ContentDraft for DetailedPageSectionDraft {
    type Entity = DetailedPageSection;

    fn into_entity(self, _author: &str) -> DetailedPageSection {
        let (id, now) = new_timestamps();
        DetailedPageSection {
            id,
            page: self.page,
            section: self.section,
            title: self.title.as_deref().map(strip_all_html),
            content: self.content.sanitized(),
            order: self.order,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct DetailedPageSectionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate]
    pub content: Option<PageSectionContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ContentPatch for DetailedPageSectionPatch {
    type Entity = DetailedPageSection;

    fn sanitized(self) -> Self {
        DetailedPageSectionPatch {
            title: self.title.as_deref().map(strip_all_html),
            content: self.content.map(PageSectionContent::sanitized),
            ..self
        }
    }
}

// ====================================================================
// ============================ GALLERY ===============================
// ====================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

fn default_gallery_category() -> String {
    "general".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub image: String,
    #[serde(default = "default_gallery_category")]
    pub category: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: MediaKind,
    #[serde(default)]
    pub order: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentEntity for GalleryItem {
    const COLLECTION: &'static str = store::GALLERY_ITEMS;
    const LABEL: &'static str = "Gallery item";
    const LIST_KEY: Option<&'static str> = Some("items");
    type PublicView = GalleryItem;

    fn id(&self) -> Uuid {
        self.id
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn is_public(&self) -> bool {
        self.is_active
    }
    fn public_view(&self) -> GalleryItem {
        self.clone()
    }
    fn display_order(&self) -> i64 {
        self.order
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct GalleryItemDraft {
    #[validate(length(min = 2, max = 200))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(custom = "validate_image_reference")]
    pub image: String,
    #[serde(default = "default_gallery_category")]
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(length(max = 50))]
    pub date: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: MediaKind,
    #[serde(default)]
    pub order: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl ContentDraft for GalleryItemDraft {
    type Entity = GalleryItem;

    fn into_entity(self, _author: &str) -> GalleryItem {
        let (id, now) = new_timestamps();
        GalleryItem {
            id,
            title: strip_all_html(&self.title),
            description: self.description.as_deref().map(strip_all_html),
            image: self.image,
            category: self.category,
            date: self.date,
            kind: self.kind,
            order: self.order,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct GalleryItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 200))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_image_reference")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 50))]
    pub date: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<MediaKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ContentPatch for GalleryItemPatch {
    type Entity = GalleryItem;

    fn sanitized(self) -> Self {
        GalleryItemPatch {
            title: self.title.as_deref().map(strip_all_html),
            description: self.description.as_deref().map(strip_all_html),
            ..self
        }
    }
}
