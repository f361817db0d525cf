use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::service_request::{RequestStatus, ServiceRequest};
use common::requests::StatusUpdateRequest;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::Db;
use crate::error::ApiError;
use crate::services::service_requests::{request_from_row, REQUEST_COLUMNS};

/// Applies a status transition. The update is conditional on the status the
/// transition was validated against, so two concurrent transitions cannot
/// both pass the same check.
pub(crate) fn transition(
    conn: &Connection,
    id: i64,
    next: RequestStatus,
) -> Result<ServiceRequest, ApiError> {
    let current: RequestStatus = conn
        .query_row(
            "SELECT status FROM service_requests WHERE id = ?1",
            params![id],
            |row| row.get::<_, String>(0),
        )
        .optional()?
        .and_then(|raw| RequestStatus::parse(&raw))
        .ok_or(ApiError::NotFound)?;

    if !current.can_transition_to(next) {
        return Err(ApiError::validation(
            "status",
            format!(
                "cannot transition from '{}' to '{}'",
                current.as_str(),
                next.as_str()
            ),
        ));
    }

    let changed = conn.execute(
        "UPDATE service_requests SET status = ?2, is_processed = ?3, updated_at = ?4 \
         WHERE id = ?1 AND status = ?5",
        params![
            id,
            next.as_str(),
            next.is_terminal(),
            Utc::now(),
            current.as_str(),
        ],
    )?;
    if changed == 0 {
        // Somebody else moved it first; report it like a failed check.
        return Err(ApiError::validation(
            "status",
            format!("request is no longer '{}'", current.as_str()),
        ));
    }

    let stored = conn.query_row(
        &format!(
            "SELECT {} FROM service_requests WHERE id = ?1",
            REQUEST_COLUMNS
        ),
        params![id],
        request_from_row,
    )?;
    Ok(stored)
}

pub(crate) async fn process(
    db: web::Data<Db>,
    id: web::Path<i64>,
    payload: web::Json<StatusUpdateRequest>,
) -> Result<HttpResponse, ApiError> {
    let conn = db.open()?;
    let stored = transition(&conn, id.into_inner(), payload.status)?;
    Ok(HttpResponse::Ok().json(stored))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::db::test_support::memory_conn;
    use crate::services::service_requests::create::insert_request;
    use common::requests::NewServiceRequest;

    fn seed(conn: &Connection) -> i64 {
        insert_request(
            conn,
            &NewServiceRequest {
                full_name: "Timur".to_string(),
                email_address: "timur@example.com".to_string(),
                phone_number: "+998901112233".to_string(),
                country_code: "+998".to_string(),
                services_needed: json!([{ "name": "Document Assistance", "price": 40 }]),
                location: None,
                estimated_budget: None,
                detailed_requirements: "Visa renewal paperwork.".to_string(),
                additional_information: None,
                business_type: None,
                business_requirements: None,
            },
        )
        .unwrap()
        .id
    }

    #[test]
    fn walks_the_allowed_chain() {
        let conn = memory_conn();
        let id = seed(&conn);

        let moved = transition(&conn, id, RequestStatus::InProgress).unwrap();
        assert_eq!(moved.status, RequestStatus::InProgress);
        assert!(!moved.is_processed);

        let done = transition(&conn, id, RequestStatus::Completed).unwrap();
        assert_eq!(done.status, RequestStatus::Completed);
        assert!(done.is_processed);
    }

    #[test]
    fn rejects_skips_and_terminal_exits() {
        let conn = memory_conn();
        let id = seed(&conn);

        assert!(matches!(
            transition(&conn, id, RequestStatus::Completed),
            Err(ApiError::Validation { .. })
        ));

        transition(&conn, id, RequestStatus::Cancelled).unwrap();
        assert!(matches!(
            transition(&conn, id, RequestStatus::InProgress),
            Err(ApiError::Validation { .. })
        ));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let conn = memory_conn();
        assert!(matches!(
            transition(&conn, 404, RequestStatus::Cancelled),
            Err(ApiError::NotFound)
        ));
    }
}
