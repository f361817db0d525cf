use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::review::ReviewPublic;

use crate::db::Db;
use crate::error::ApiError;
use crate::services::reviews::{review_from_row, REVIEW_COLUMNS};

const SELECTION_LIMIT: u32 = 6;

pub(crate) async fn process(db: web::Data<Db>) -> Result<HttpResponse, ApiError> {
    let conn = db.open()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM user_reviews \
         WHERE is_approved = 1 AND is_featured = 1 \
         ORDER BY created_at DESC, id DESC LIMIT ?1",
        REVIEW_COLUMNS
    ))?;
    let rows = stmt.query_map(rusqlite::params![SELECTION_LIMIT], review_from_row)?;
    let now = Utc::now();
    let mut featured = Vec::new();
    for row in rows {
        featured.push(ReviewPublic::from_review(row?, now));
    }
    Ok(HttpResponse::Ok().json(featured))
}
