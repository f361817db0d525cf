//! Cross-entity search: `GET /api/search?q=...` returns a handful of
//! matching published guides and approved reviews. Plain substring matching;
//! an empty query returns empty result sets instead of everything.

use actix_web::web::{get, scope};
use actix_web::{web, HttpResponse, Scope};
use chrono::Utc;
use common::model::review::ReviewPublic;
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::db::Db;
use crate::error::ApiError;
use crate::guides::query;
use crate::guides::repository::{self, GuideFilter, Ordering};
use crate::pagination::PageWindow;
use crate::services::reviews::list::search_approved;

const API_PATH: &str = "/api/search";
const SECTION_LIMIT: u32 = 5;

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", get().to(process))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub lang: Option<String>,
}

pub(crate) async fn process(
    db: web::Data<Db>,
    config: web::Data<Config>,
    search: web::Query<SearchQuery>,
) -> Result<HttpResponse, ApiError> {
    let needle = search.q.as_deref().unwrap_or("").trim().to_string();
    if needle.is_empty() {
        return Ok(HttpResponse::Ok().json(json!({ "guides": [], "reviews": [] })));
    }

    let conn = db.open()?;
    let filter = GuideFilter {
        published_only: true,
        search: Some(needle.clone()),
        ..GuideFilter::default()
    };
    let window = PageWindow::new(Some(1), Some(SECTION_LIMIT));
    let (_, guides) = repository::list(
        &conn,
        &filter,
        Ordering::default(),
        &window,
        &config.default_lang,
    )?;
    let guides = query::summaries(&conn, &guides, search.lang.as_deref(), &config.default_lang)?;

    let now = Utc::now();
    let reviews: Vec<ReviewPublic> = search_approved(&conn, &needle, SECTION_LIMIT)?
        .into_iter()
        .map(|review| ReviewPublic::from_review(review, now))
        .collect();

    Ok(HttpResponse::Ok().json(json!({ "guides": guides, "reviews": reviews })))
}
