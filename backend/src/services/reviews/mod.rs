//! Review endpoints under `/api/reviews`.
//!
//! Listings only ever expose approved reviews; moderation flags are set by
//! administration, never through this API. Submissions land unapproved.

mod create;
mod featured;
mod helpful;
pub(crate) mod list;

use actix_web::web::{get, post, scope};
use actix_web::Scope;
use chrono::{DateTime, Utc};
use common::model::review::UserReview;
use common::model::service_request::ServiceKind;
use rusqlite::types::Type;
use rusqlite::Row;

const API_PATH: &str = "/api/reviews";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        .route("/featured", get().to(featured::process))
        .route("/{id}/helpful", post().to(helpful::process))
}

pub(crate) const REVIEW_COLUMNS: &str = "id, reviewer_name, reviewer_email, reviewer_country, \
    reviewer_avatar, title, content, rating, service_used, is_approved, is_featured, \
    is_verified, helpful_votes, created_at, updated_at";

pub(crate) fn review_from_row(row: &Row) -> rusqlite::Result<UserReview> {
    let service_used = match row.get::<_, Option<String>>(8)? {
        Some(raw) => Some(ServiceKind::parse(&raw).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                8,
                Type::Text,
                format!("unknown service kind '{}'", raw).into(),
            )
        })?),
        None => None,
    };
    let created_at: DateTime<Utc> = row.get(13)?;
    let updated_at: DateTime<Utc> = row.get(14)?;
    Ok(UserReview {
        id: row.get(0)?,
        reviewer_name: row.get(1)?,
        reviewer_email: row.get(2)?,
        reviewer_country: row.get(3)?,
        reviewer_avatar: row.get(4)?,
        title: row.get(5)?,
        content: row.get(6)?,
        rating: row.get(7)?,
        service_used,
        is_approved: row.get(9)?,
        is_featured: row.get(10)?,
        is_verified: row.get(11)?,
        helpful_votes: row.get(12)?,
        created_at,
        updated_at,
    })
}
