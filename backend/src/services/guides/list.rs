use actix_web::{web, HttpResponse};
use common::model::guide::GuideCategory;
use serde::Deserialize;

use crate::config::Config;
use crate::db::Db;
use crate::error::ApiError;
use crate::guides::query;
use crate::guides::repository::{GuideFilter, Ordering};
use crate::pagination::PageWindow;

#[derive(Debug, Deserialize)]
pub struct GuideListQuery {
    pub category: Option<String>,
    pub is_featured: Option<bool>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub lang: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

pub(crate) fn filter_from(query: &GuideListQuery) -> Result<GuideFilter, ApiError> {
    let category = match query.category.as_deref() {
        Some(raw) => Some(
            GuideCategory::parse(raw)
                .ok_or_else(|| ApiError::validation("category", "unknown category"))?,
        ),
        None => None,
    };
    Ok(GuideFilter {
        category,
        is_featured: query.is_featured,
        published_only: true,
        search: query.search.clone(),
    })
}

pub(crate) async fn process(
    db: web::Data<Db>,
    config: web::Data<Config>,
    query: web::Query<GuideListQuery>,
) -> Result<HttpResponse, ApiError> {
    let conn = db.open()?;
    let filter = filter_from(&query)?;
    let ordering = Ordering::parse(query.ordering.as_deref());
    let window = PageWindow::new(query.page, query.page_size);
    let page = query::list_published(
        &conn,
        &filter,
        ordering,
        &window,
        query.lang.as_deref(),
        &config.default_lang,
    )?;
    Ok(HttpResponse::Ok().json(page))
}
