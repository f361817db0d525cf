use actix_web::{web, HttpResponse};

use crate::config::Config;
use crate::db::Db;
use crate::error::ApiError;
use crate::guides::query;
use crate::guides::repository::{self, GuideFilter, OrderField, Ordering};
use crate::pagination::PageWindow;

use super::featured::{SelectionQuery, SELECTION_LIMIT};

pub(crate) async fn process(
    db: web::Data<Db>,
    config: web::Data<Config>,
    query: web::Query<SelectionQuery>,
) -> Result<HttpResponse, ApiError> {
    let conn = db.open()?;
    let filter = GuideFilter {
        published_only: true,
        ..GuideFilter::default()
    };
    let ordering = Ordering {
        field: OrderField::ViewCount,
        descending: true,
    };
    let window = PageWindow::new(Some(1), Some(SELECTION_LIMIT));
    let (_, guides) = repository::list(&conn, &filter, ordering, &window, &config.default_lang)?;
    let summaries = query::summaries(&conn, &guides, query.lang.as_deref(), &config.default_lang)?;
    Ok(HttpResponse::Ok().json(summaries))
}
