use common::model::guide::Guide;
use rusqlite::{params, Connection};

use crate::error::ApiError;
use crate::guides::repository::{guide_from_row, GUIDE_COLUMNS};

/// Up to `limit` published guides from the same category, newest first,
/// never including the guide itself. Ties on publication date break on id
/// so the result is stable for identical data.
pub fn related_to(conn: &Connection, guide: &Guide, limit: u32) -> Result<Vec<Guide>, ApiError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM guides g \
         WHERE g.category = ?1 AND g.is_published = 1 AND g.id <> ?2 \
         ORDER BY g.publication_date DESC, g.id DESC LIMIT ?3",
        GUIDE_COLUMNS
    ))?;
    let rows = stmt.query_map(
        params![guide.category.as_str(), guide.id, limit],
        guide_from_row,
    )?;
    let mut related = Vec::new();
    for row in rows {
        related.push(row?);
    }
    Ok(related)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use common::model::guide::GuideCategory;

    use super::*;
    use crate::db::test_support::{memory_conn, seed_guide};
    use crate::guides::repository::get_by_slug;

    #[test]
    fn excludes_self_and_unpublished_and_respects_limit() {
        let conn = memory_conn();
        let base = Utc::now();
        seed_guide(&conn, "anchor", GuideCategory::Housing, true, false, base);
        for i in 0..5 {
            seed_guide(
                &conn,
                &format!("sibling-{}", i),
                GuideCategory::Housing,
                true,
                false,
                base + Duration::seconds(i),
            );
        }
        seed_guide(
            &conn,
            "hidden-draft",
            GuideCategory::Housing,
            false,
            false,
            base + Duration::seconds(60),
        );
        seed_guide(
            &conn,
            "different-category",
            GuideCategory::Emergency,
            true,
            false,
            base + Duration::seconds(60),
        );

        let anchor = get_by_slug(&conn, "anchor", true).unwrap();
        let related = related_to(&conn, &anchor, 3).unwrap();

        assert_eq!(related.len(), 3);
        let slugs: Vec<&str> = related.iter().map(|g| g.slug.as_str()).collect();
        assert_eq!(slugs, ["sibling-4", "sibling-3", "sibling-2"]);
        assert!(!slugs.contains(&"anchor"));
    }

    #[test]
    fn returns_fewer_when_fewer_qualify() {
        let conn = memory_conn();
        seed_guide(&conn, "lonely", GuideCategory::Cultural, true, false, Utc::now());
        let lonely = get_by_slug(&conn, "lonely", true).unwrap();
        assert!(related_to(&conn, &lonely, 3).unwrap().is_empty());
    }
}
