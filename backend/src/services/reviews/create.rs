use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::review::{ReviewPublic, UserReview};
use common::requests::NewReviewRequest;
use rusqlite::{params, Connection};

use crate::db::Db;
use crate::error::ApiError;
use crate::services::reviews::{review_from_row, REVIEW_COLUMNS};

const REVIEWER_NAME_MAX: usize = 100;
const TITLE_MAX: usize = 200;
const CONTENT_MAX: usize = 1000;

pub(crate) fn validate(request: &NewReviewRequest) -> Result<(), ApiError> {
    if request.reviewer_name.trim().is_empty()
        || request.reviewer_name.chars().count() > REVIEWER_NAME_MAX
    {
        return Err(ApiError::validation(
            "reviewer_name",
            format!("reviewer_name must be 1-{} characters", REVIEWER_NAME_MAX),
        ));
    }
    if let Some(email) = request.reviewer_email.as_deref().filter(|e| !e.is_empty()) {
        if !(email.contains('@') && email.contains('.')) {
            return Err(ApiError::validation(
                "reviewer_email",
                "a valid e-mail address is required",
            ));
        }
    }
    if let Some(title) = &request.title {
        if title.chars().count() > TITLE_MAX {
            return Err(ApiError::validation(
                "title",
                format!("title must be at most {} characters", TITLE_MAX),
            ));
        }
    }
    if request.content.trim().is_empty() || request.content.chars().count() > CONTENT_MAX {
        return Err(ApiError::validation(
            "content",
            format!("content must be 1-{} characters", CONTENT_MAX),
        ));
    }
    if !(1..=5).contains(&request.rating) {
        return Err(ApiError::validation(
            "rating",
            "rating must be between 1 and 5",
        ));
    }
    Ok(())
}

/// Stores the review unapproved. Moderation happens elsewhere.
pub(crate) fn insert_review(
    conn: &Connection,
    request: &NewReviewRequest,
) -> Result<UserReview, ApiError> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO user_reviews (reviewer_name, reviewer_email, reviewer_country, \
         reviewer_avatar, title, content, rating, service_used, is_approved, is_featured, \
         is_verified, helpful_votes, created_at, updated_at) \
         VALUES (?1, ?2, ?3, NULL, ?4, ?5, ?6, ?7, 0, 0, 0, 0, ?8, ?8)",
        params![
            request.reviewer_name.trim(),
            request.reviewer_email,
            request.reviewer_country,
            request.title,
            request.content,
            request.rating,
            request.service_used.map(|kind| kind.as_str()),
            now,
        ],
    )?;
    let id = conn.last_insert_rowid();
    let stored = conn.query_row(
        &format!("SELECT {} FROM user_reviews WHERE id = ?1", REVIEW_COLUMNS),
        params![id],
        review_from_row,
    )?;
    Ok(stored)
}

pub(crate) async fn process(
    db: web::Data<Db>,
    payload: web::Json<NewReviewRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = payload.into_inner();
    validate(&request)?;
    let conn = db.open()?;
    let stored = insert_review(&conn, &request)?;
    Ok(HttpResponse::Created().json(ReviewPublic::from_review(stored, Utc::now())))
}
