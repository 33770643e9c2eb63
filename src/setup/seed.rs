use crate::models::content_models::{
    BlogDraft, ContentDraft, ContentEntity, DetailedPageSectionDraft, GalleryItemDraft, NewsDraft, SuccessStoryDraft,
    TeamMemberDraft,
};
use crate::models::db_operations::content_db_operations as store;
use crate::models::site_models::ImpactStats;
use crate::setup::db_setup::SetupError;
use chrono::Utc;
use redb::Database;
use serde_json::{json, Value};

const SEED_AUTHOR: &str = "Shield Foundation Team";

/// Inserts `records` as drafts of `D` unless the collection already holds data.
/// Returns the number of documents written.
fn seed_family<D: ContentDraft>(db: &Database, records: Value) -> Result<usize, SetupError> {
    let collection = D::Entity::COLLECTION;
    if !store::read_documents(db, collection)?.is_empty() {
        log::info!("'{}' already has content, skipping", collection);
        return Ok(0);
    }

    let drafts: Vec<D> = serde_json::from_value(records)?;
    let count = drafts.len();
    store::modify_collection(db, collection, |table| {
        for draft in drafts {
            let entity = draft.into_entity(SEED_AUTHOR);
            let doc = store::to_document(&entity)?;
            store::put_document(table, entity.id(), &doc)?;
        }
        Ok(())
    })?;
    Ok(count)
}

fn seed_impact_stats(db: &Database) -> Result<usize, SetupError> {
    if store::read_singleton::<ImpactStats>(db, store::IMPACT_STATS)?.is_some() {
        return Ok(0);
    }
    let stats = ImpactStats {
        youth_trained: 1470,
        youth_placed: 1090,
        seniors_supported: 7000,
        women_empowered: 300,
        updated_at: Some(Utc::now()),
        updated_by: Some("system".to_string()),
    };
    store::merge_singleton(db, store::IMPACT_STATS, store::to_document(&stats)?)?;
    Ok(1)
}

/// Loads demo content into empty collections. Collections that already hold
/// documents are left alone, so the command can be rerun safely.
pub fn seed_demo_content(db: &Database) -> Result<Vec<(&'static str, usize)>, SetupError> {
    let mut report = vec![(store::IMPACT_STATS, seed_impact_stats(db)?)];

    report.push((
        store::SUCCESS_STORIES,
        seed_family::<SuccessStoryDraft>(
            db,
            json!([
                {
                    "name": "Priya Sharma",
                    "story": "After completing the digital marketing training program, Priya secured a position at a growing startup in Mumbai.",
                    "achievement": "Digital Marketing Professional",
                    "program": "Youth Skilling Program",
                    "location": "Mumbai, Maharashtra",
                    "order": 1
                },
                {
                    "name": "Rajesh Kumar",
                    "story": "The entrepreneurship program helped Rajesh start an electronics repair business that now employs two other youth from the community.",
                    "achievement": "Small Business Owner",
                    "program": "Entrepreneurship Development",
                    "location": "Dharavi, Mumbai",
                    "order": 2
                },
                {
                    "name": "Anita Devi",
                    "story": "Regular checkups and physiotherapy sessions through the senior care program restored Anita's health and confidence.",
                    "achievement": "Health Recovery",
                    "program": "Senior Citizen Care",
                    "location": "Mumbai, Maharashtra",
                    "order": 3
                }
            ]),
        )?,
    ));

    report.push((
        store::GALLERY_ITEMS,
        seed_family::<GalleryItemDraft>(
            db,
            json!([
                {
                    "title": "Youth Training Session",
                    "description": "Students participating in the digital skills training program",
                    "image": "https://images.unsplash.com/photo-1522202176988-66273c2fd55f?w=800",
                    "category": "Training",
                    "date": "2024-01-15",
                    "order": 1
                },
                {
                    "title": "Senior Citizen Health Camp",
                    "description": "Medical checkup and physiotherapy for elderly community members",
                    "image": "https://images.unsplash.com/photo-1559757148-5c350d0d3c56?w=800",
                    "category": "Healthcare",
                    "date": "2024-01-20",
                    "order": 2
                },
                {
                    "title": "Graduation Ceremony",
                    "description": "Graduates receiving certificates after completing the program",
                    "image": "https://images.unsplash.com/photo-1523050854058-8df90110c9f1?w=800",
                    "category": "Events",
                    "date": "2024-02-01",
                    "order": 3
                }
            ]),
        )?,
    ));

    report.push((
        store::LEADERSHIP_TEAM,
        seed_family::<TeamMemberDraft>(
            db,
            json!([
                {
                    "name": "Swati Ingole",
                    "role": "Founder & Director",
                    "description": "Social entrepreneur with over 15 years of experience in community development and youth empowerment.",
                    "order": 1
                },
                {
                    "name": "Rajesh Patel",
                    "role": "Program Manager",
                    "description": "Oversees the training curriculum and placement activities.",
                    "category": "Staff",
                    "order": 2
                }
            ]),
        )?,
    ));

    report.push((
        store::NEWS,
        seed_family::<NewsDraft>(
            db,
            json!([
                {
                    "title": "Youth Empowerment Through Skill Development",
                    "content": "Our youth training program continues to create pathways to employment for young people in underserved communities.",
                    "status": "published"
                }
            ]),
        )?,
    ));

    report.push((
        store::BLOGS,
        seed_family::<BlogDraft>(
            db,
            json!([
                {
                    "title": "Senior Citizen Care: A Holistic Approach",
                    "content": "Our senior citizen care program provides healthcare and social support so elderly community members live with dignity.",
                    "category": "Healthcare",
                    "tags": ["seniors", "healthcare", "community"],
                    "image": "https://images.unsplash.com/photo-1559757148-5c350d0d3c56?w=800",
                    "status": "published"
                }
            ]),
        )?,
    ));

    report.push((
        store::DETAILED_PAGE_SECTIONS,
        seed_family::<DetailedPageSectionDraft>(
            db,
            json!([
                {
                    "page": "about",
                    "section": "journey",
                    "title": "Our Journey",
                    "content": {
                        "text": "Since 2018, Shield Foundation has worked to create sustainable change in Mumbai's underserved communities.",
                        "items": [
                            {"title": "2018", "description": "Foundation established"},
                            {"title": "2019", "description": "First youth training center opened"},
                            {"title": "2020", "description": "Senior care program started in Dharavi"}
                        ]
                    },
                    "order": 1
                },
                {
                    "page": "programs",
                    "section": "youth_skilling",
                    "title": "Youth Skilling & Livelihoods",
                    "content": {
                        "text": "Training that bridges the gap between education and employment.",
                        "image_url": "https://images.unsplash.com/photo-1522202176988-66273c2fd55f?w=800"
                    },
                    "order": 1
                }
            ]),
        )?,
    ));

    Ok(report)
}
