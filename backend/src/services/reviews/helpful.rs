use actix_web::{web, HttpResponse};
use rusqlite::params;
use serde_json::json;

use crate::db::Db;
use crate::error::ApiError;

pub(crate) async fn process(
    db: web::Data<Db>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let conn = db.open()?;
    let id = id.into_inner();
    // contador atómico; un review sin aprobar cuenta como inexistente
    let changed = conn.execute(
        "UPDATE user_reviews SET helpful_votes = helpful_votes + 1 \
         WHERE id = ?1 AND is_approved = 1",
        params![id],
    )?;
    if changed == 0 {
        return Err(ApiError::NotFound);
    }
    let votes: i64 = conn.query_row(
        "SELECT helpful_votes FROM user_reviews WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(HttpResponse::Ok().json(json!({ "helpful_votes": votes })))
}
