use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::config::Config;
use crate::db::Db;
use crate::error::ApiError;
use crate::guides::repository::{self, GuideFilter, Ordering};
use crate::guides::query;
use crate::pagination::PageWindow;

/// How many guides the landing-page selections return.
pub(crate) const SELECTION_LIMIT: u32 = 6;

#[derive(Debug, Deserialize)]
pub struct SelectionQuery {
    pub lang: Option<String>,
}

pub(crate) async fn process(
    db: web::Data<Db>,
    config: web::Data<Config>,
    query: web::Query<SelectionQuery>,
) -> Result<HttpResponse, ApiError> {
    let conn = db.open()?;
    let filter = GuideFilter {
        is_featured: Some(true),
        published_only: true,
        ..GuideFilter::default()
    };
    let window = PageWindow::new(Some(1), Some(SELECTION_LIMIT));
    let (_, guides) = repository::list(
        &conn,
        &filter,
        Ordering::default(),
        &window,
        &config.default_lang,
    )?;
    let summaries = query::summaries(&conn, &guides, query.lang.as_deref(), &config.default_lang)?;
    Ok(HttpResponse::Ok().json(summaries))
}
