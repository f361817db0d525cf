use crate::model::service_request::ServiceKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored review, moderation flags included. Internal shape; the public
/// listing uses `ReviewPublic`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserReview {
    pub id: i64,
    pub reviewer_name: String,
    pub reviewer_email: Option<String>,
    pub reviewer_country: Option<String>,
    pub reviewer_avatar: Option<String>,
    pub title: Option<String>,
    pub content: String,
    pub rating: i32,
    pub service_used: Option<ServiceKind>,
    pub is_approved: bool,
    pub is_featured: bool,
    pub is_verified: bool,
    pub helpful_votes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What review listings expose. The reviewer's e-mail and the moderation
/// flags other than `is_verified` stay server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewPublic {
    pub id: i64,
    pub reviewer_name: String,
    pub reviewer_country: Option<String>,
    pub reviewer_avatar: Option<String>,
    pub title: Option<String>,
    pub content: String,
    pub rating: i32,
    pub service_used: Option<ServiceKind>,
    pub is_verified: bool,
    pub helpful_votes: i64,
    pub days_ago: i64,
    pub created_at: DateTime<Utc>,
}

impl ReviewPublic {
    pub fn from_review(review: UserReview, now: DateTime<Utc>) -> ReviewPublic {
        let days_ago = (now - review.created_at).num_days().max(0);
        ReviewPublic {
            id: review.id,
            reviewer_name: review.reviewer_name,
            reviewer_country: review.reviewer_country,
            reviewer_avatar: review.reviewer_avatar,
            title: review.title,
            content: review.content,
            rating: review.rating,
            service_used: review.service_used,
            is_verified: review.is_verified,
            helpful_votes: review.helpful_votes,
            days_ago,
            created_at: review.created_at,
        }
    }
}
