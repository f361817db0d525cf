//! Slug derivation and allocation.

use rusqlite::{params, Connection};

use crate::error::ApiError;

/// Reduces a title to a URL-safe base token: lowercased, ASCII alphanumerics
/// kept, every other run of characters collapsed to a single `-`, trimmed at
/// both ends. May come out empty for titles with no usable characters.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }
    slug
}

/// Allocates a slug not currently used by any guide: the base token as-is,
/// otherwise `base-1`, `base-2`, ... probing the live slug set. Callers that
/// insert afterwards must be prepared to retry on a `UNIQUE` violation, since
/// a concurrent creation may claim the same candidate between the check and
/// the insert.
pub fn allocate(conn: &Connection, title: &str) -> Result<String, ApiError> {
    let base = slugify(title);
    if base.is_empty() {
        return Err(ApiError::validation(
            "title",
            "title does not reduce to a usable slug; supply one explicitly",
        ));
    }
    let mut stmt = conn.prepare("SELECT EXISTS(SELECT 1 FROM guides WHERE slug = ?1)")?;
    let mut candidate = base.clone();
    let mut suffix = 0u32;
    loop {
        let taken: bool = stmt.query_row(params![candidate], |row| row.get(0))?;
        if !taken {
            return Ok(candidate);
        }
        suffix += 1;
        candidate = format!("{}-{}", base, suffix);
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use common::model::guide::GuideCategory;

    use super::*;
    use crate::db::test_support::{memory_conn, seed_guide};

    #[test]
    fn slugify_collapses_and_trims() {
        assert_eq!(slugify("Visa & Residency Guide"), "visa-residency-guide");
        assert_eq!(slugify("  Opening a Bank Account  "), "opening-a-bank-account");
        assert_eq!(slugify("UPPER case"), "upper-case");
        assert_eq!(slugify("100% legal!"), "100-legal");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify("   "), "");
    }

    #[test]
    fn allocate_appends_numeric_suffixes() {
        let conn = memory_conn();
        assert_eq!(
            allocate(&conn, "Visa & Residency Guide").unwrap(),
            "visa-residency-guide"
        );
        seed_guide(
            &conn,
            "visa-residency-guide",
            GuideCategory::Documentation,
            true,
            false,
            Utc::now(),
        );
        assert_eq!(
            allocate(&conn, "Visa & Residency Guide").unwrap(),
            "visa-residency-guide-1"
        );
        seed_guide(
            &conn,
            "visa-residency-guide-1",
            GuideCategory::Documentation,
            true,
            false,
            Utc::now(),
        );
        assert_eq!(
            allocate(&conn, "Visa & Residency Guide").unwrap(),
            "visa-residency-guide-2"
        );
    }

    #[test]
    fn allocate_rejects_empty_titles() {
        let conn = memory_conn();
        let err = allocate(&conn, "   ").unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }
}
