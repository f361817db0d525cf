use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::db::Db;
use crate::error::ApiError;
use crate::guides::repository;

pub(crate) async fn process(
    db: web::Data<Db>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let conn = db.open()?;
    let likes = repository::increment_likes(&conn, id.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "likes": likes })))
}
