use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::page::Page;
use common::model::review::{ReviewPublic, UserReview};
use common::model::service_request::ServiceKind;
use rusqlite::{params_from_iter, Connection, ToSql};
use serde::Deserialize;

use crate::db::Db;
use crate::error::ApiError;
use crate::pagination::PageWindow;
use crate::services::reviews::{review_from_row, REVIEW_COLUMNS};

#[derive(Debug, Deserialize)]
pub struct ReviewListQuery {
    pub rating: Option<i32>,
    pub service_used: Option<String>,
    pub is_verified: Option<bool>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Approved reviews only, with optional rating/service/verified filters.
fn list_approved(
    conn: &Connection,
    query: &ReviewListQuery,
    window: &PageWindow,
) -> Result<(i64, Vec<UserReview>), ApiError> {
    let mut conditions: Vec<&str> = vec!["is_approved = 1"];
    let mut bound: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(rating) = query.rating {
        conditions.push("rating = ?");
        bound.push(Box::new(rating));
    }
    if let Some(raw) = query.service_used.as_deref() {
        let kind = ServiceKind::parse(raw)
            .ok_or_else(|| ApiError::validation("service_used", "unknown service"))?;
        conditions.push("service_used = ?");
        bound.push(Box::new(kind.as_str().to_string()));
    }
    if let Some(verified) = query.is_verified {
        conditions.push("is_verified = ?");
        bound.push(Box::new(verified));
    }
    let where_sql = format!(" WHERE {}", conditions.join(" AND "));

    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM user_reviews{}", where_sql),
        params_from_iter(bound.iter().map(|p| p.as_ref())),
        |row| row.get(0),
    )?;

    let order_sql = match query.ordering.as_deref() {
        Some("rating") => "rating ASC, id DESC",
        Some("-rating") => "rating DESC, id DESC",
        Some("helpful_votes") => "helpful_votes ASC, id DESC",
        Some("-helpful_votes") => "helpful_votes DESC, id DESC",
        Some("created_at") => "created_at ASC, id ASC",
        _ => "created_at DESC, id DESC",
    };
    bound.push(Box::new(window.limit()));
    bound.push(Box::new(window.offset()));

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM user_reviews{} ORDER BY {} LIMIT ? OFFSET ?",
        REVIEW_COLUMNS, where_sql, order_sql
    ))?;
    let rows = stmt.query_map(
        params_from_iter(bound.iter().map(|p| p.as_ref())),
        review_from_row,
    )?;
    let mut reviews = Vec::new();
    for row in rows {
        reviews.push(row?);
    }
    Ok((count, reviews))
}

/// Approved reviews whose title or content contains the needle. Used by the
/// cross-entity search endpoint.
pub(crate) fn search_approved(
    conn: &Connection,
    needle: &str,
    limit: u32,
) -> Result<Vec<UserReview>, ApiError> {
    let pattern = format!("%{}%", needle);
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM user_reviews \
         WHERE is_approved = 1 AND (title LIKE ?1 OR content LIKE ?1) \
         ORDER BY created_at DESC, id DESC LIMIT ?2",
        REVIEW_COLUMNS
    ))?;
    let rows = stmt.query_map(rusqlite::params![pattern, limit], review_from_row)?;
    let mut reviews = Vec::new();
    for row in rows {
        reviews.push(row?);
    }
    Ok(reviews)
}

pub(crate) async fn process(
    db: web::Data<Db>,
    query: web::Query<ReviewListQuery>,
) -> Result<HttpResponse, ApiError> {
    let conn = db.open()?;
    let window = PageWindow::new(query.page, query.page_size);
    let (count, reviews) = list_approved(&conn, &query, &window)?;
    let now = Utc::now();
    let page = Page {
        count,
        page: window.page,
        page_size: window.page_size,
        results: reviews
            .into_iter()
            .map(|review| ReviewPublic::from_review(review, now))
            .collect::<Vec<_>>(),
    };
    Ok(HttpResponse::Ok().json(page))
}

#[cfg(test)]
mod tests {
    use common::requests::NewReviewRequest;
    use rusqlite::params;

    use super::*;
    use crate::db::test_support::memory_conn;
    use crate::services::reviews::create::insert_review;

    fn approve(conn: &Connection, id: i64) {
        conn.execute(
            "UPDATE user_reviews SET is_approved = 1 WHERE id = ?1",
            params![id],
        )
        .unwrap();
    }

    fn review(name: &str, rating: i32, content: &str) -> NewReviewRequest {
        NewReviewRequest {
            reviewer_name: name.to_string(),
            reviewer_email: None,
            reviewer_country: None,
            title: None,
            content: content.to_string(),
            rating,
            service_used: None,
        }
    }

    #[test]
    fn only_approved_reviews_are_listed() {
        let conn = memory_conn();
        let visible = insert_review(&conn, &review("Anna", 5, "Great help.")).unwrap();
        insert_review(&conn, &review("Hidden", 1, "Pending moderation.")).unwrap();
        approve(&conn, visible.id);

        let query = ReviewListQuery {
            rating: None,
            service_used: None,
            is_verified: None,
            ordering: None,
            page: None,
            page_size: None,
        };
        let (count, reviews) = list_approved(&conn, &query, &PageWindow::new(None, None)).unwrap();
        assert_eq!(count, 1);
        assert_eq!(reviews[0].reviewer_name, "Anna");
    }

    #[test]
    fn rating_filter_and_ordering_apply() {
        let conn = memory_conn();
        for (name, rating) in [("One", 3), ("Two", 5), ("Three", 5)] {
            let stored = insert_review(&conn, &review(name, rating, "Content here.")).unwrap();
            approve(&conn, stored.id);
        }

        let query = ReviewListQuery {
            rating: Some(5),
            service_used: None,
            is_verified: None,
            ordering: Some("-helpful_votes".to_string()),
            page: None,
            page_size: None,
        };
        let (count, _) = list_approved(&conn, &query, &PageWindow::new(None, None)).unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn search_looks_at_title_and_content() {
        let conn = memory_conn();
        let stored = insert_review(&conn, &review("Olim", 4, "The SIM card arrived fast.")).unwrap();
        approve(&conn, stored.id);
        insert_review(&conn, &review("Quiet", 4, "The SIM card was slow.")).unwrap();

        let hits = search_approved(&conn, "SIM card", 5).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].reviewer_name, "Olim");
        assert!(search_approved(&conn, "nothing", 5).unwrap().is_empty());
    }
}
