//! Guide persistence: creation, lookup, listing, counters.

use chrono::{DateTime, Utc};
use common::model::guide::{Guide, GuideCategory, TranslationFields};
use rusqlite::types::Type;
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, ToSql, TransactionBehavior,
};

use crate::error::ApiError;
use crate::guides::{slug, translations};
use crate::pagination::PageWindow;

pub(crate) const GUIDE_COLUMNS: &str = "g.id, g.slug, g.category, g.featured_image, \
    g.is_published, g.is_featured, g.publication_date, g.view_count, g.likes, \
    g.created_at, g.updated_at";

/// Input for guide creation. When `slug` is `None` one is allocated from the
/// default language's title (or the first translation's title).
#[derive(Debug, Clone)]
pub struct NewGuide {
    pub slug: Option<String>,
    pub category: GuideCategory,
    pub featured_image: Option<String>,
    pub is_published: bool,
    pub is_featured: bool,
    pub publication_date: Option<DateTime<Utc>>,
    pub translations: Vec<(String, TranslationFields)>,
}

#[derive(Debug, Clone, Default)]
pub struct GuideFilter {
    pub category: Option<GuideCategory>,
    pub is_featured: Option<bool>,
    pub published_only: bool,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    PublicationDate,
    ViewCount,
    Title,
}

/// Listing order, parsed from the Django-style `ordering` query value
/// (`publication_date`, `-view_count`, `title`, ...). Unknown values fall
/// back to the default rather than erroring.
#[derive(Debug, Clone, Copy)]
pub struct Ordering {
    pub field: OrderField,
    pub descending: bool,
}

impl Default for Ordering {
    fn default() -> Ordering {
        Ordering {
            field: OrderField::PublicationDate,
            descending: true,
        }
    }
}

impl Ordering {
    pub fn parse(value: Option<&str>) -> Ordering {
        let Some(value) = value else {
            return Ordering::default();
        };
        let (name, descending) = match value.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (value, false),
        };
        let field = match name {
            "publication_date" => OrderField::PublicationDate,
            "view_count" => OrderField::ViewCount,
            "title" => OrderField::Title,
            _ => return Ordering::default(),
        };
        Ordering { field, descending }
    }
}

pub(crate) fn guide_from_row(row: &Row) -> rusqlite::Result<Guide> {
    let category: String = row.get(2)?;
    let category = GuideCategory::parse(&category).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            Type::Text,
            format!("unknown guide category '{}'", category).into(),
        )
    })?;
    Ok(Guide {
        id: row.get(0)?,
        slug: row.get(1)?,
        category,
        featured_image: row.get(3)?,
        is_published: row.get(4)?,
        is_featured: row.get(5)?,
        publication_date: row.get(6)?,
        view_count: row.get(7)?,
        likes: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Creates a guide and its initial translations in one transaction.
///
/// The transaction starts immediate, so slug allocation and the insert run
/// under the write lock and concurrent creations serialize around the
/// existence check. Should the `UNIQUE` constraint still fire, the
/// transaction rolls back and allocation retries against the then-current
/// slug set, advancing the numeric suffix.
pub fn create(
    conn: &mut Connection,
    new: &NewGuide,
    default_lang: &str,
) -> Result<Guide, ApiError> {
    let Some((_, slug_source)) = new
        .translations
        .iter()
        .find(|(lang, _)| lang == default_lang)
        .or_else(|| new.translations.first())
    else {
        return Err(ApiError::validation(
            "translations",
            "at least one translation is required",
        ));
    };
    let slug_source = slug_source.title.clone();

    loop {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let slug_value = match &new.slug {
            Some(explicit) => explicit.clone(),
            None => slug::allocate(&tx, &slug_source)?,
        };
        let now = Utc::now();
        let publication_date = new.publication_date.unwrap_or(now);
        let inserted = tx.execute(
            "INSERT INTO guides (slug, category, featured_image, is_published, is_featured, \
             publication_date, view_count, likes, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, 0, ?7, ?7)",
            params![
                slug_value,
                new.category.as_str(),
                new.featured_image,
                new.is_published,
                new.is_featured,
                publication_date,
                now,
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                if new.slug.is_some() {
                    return Err(ApiError::validation("slug", "slug already in use"));
                }
                // Lost the race for the candidate; reallocate and try again.
                continue;
            }
            Err(err) => return Err(err.into()),
        }
        let id = tx.last_insert_rowid();
        for (lang, fields) in &new.translations {
            translations::put(&tx, id, lang, fields)?;
        }
        tx.commit()?;
        return get_by_id(conn, id);
    }
}

fn get_by_id(conn: &Connection, id: i64) -> Result<Guide, ApiError> {
    conn.query_row(
        &format!("SELECT {} FROM guides g WHERE g.id = ?1", GUIDE_COLUMNS),
        params![id],
        guide_from_row,
    )
    .optional()?
    .ok_or(ApiError::NotFound)
}

/// Slug lookup. With `require_published` an unpublished match reads exactly
/// like an absent one.
pub fn get_by_slug(
    conn: &Connection,
    slug_value: &str,
    require_published: bool,
) -> Result<Guide, ApiError> {
    let mut sql = format!("SELECT {} FROM guides g WHERE g.slug = ?1", GUIDE_COLUMNS);
    if require_published {
        sql.push_str(" AND g.is_published = 1");
    }
    conn.query_row(&sql, params![slug_value], guide_from_row)
        .optional()?
        .ok_or(ApiError::NotFound)
}

/// Filtered, ordered, paged listing. Returns the total match count together
/// with the requested window.
pub fn list(
    conn: &Connection,
    filter: &GuideFilter,
    ordering: Ordering,
    window: &PageWindow,
    default_lang: &str,
) -> Result<(i64, Vec<Guide>), ApiError> {
    let mut conditions: Vec<&str> = Vec::new();
    let mut bound: Vec<Box<dyn ToSql>> = Vec::new();

    if filter.published_only {
        conditions.push("g.is_published = 1");
    }
    if let Some(category) = filter.category {
        conditions.push("g.category = ?");
        bound.push(Box::new(category.as_str().to_string()));
    }
    if let Some(featured) = filter.is_featured {
        conditions.push("g.is_featured = ?");
        bound.push(Box::new(featured));
    }
    if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
        conditions.push(
            "EXISTS (SELECT 1 FROM guide_translations s WHERE s.guide_id = g.id AND \
             (s.title LIKE ? OR s.short_description LIKE ? OR s.content LIKE ?))",
        );
        let pattern = format!("%{}%", search.trim());
        bound.push(Box::new(pattern.clone()));
        bound.push(Box::new(pattern.clone()));
        bound.push(Box::new(pattern));
    }

    let where_sql = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM guides g{}", where_sql),
        params_from_iter(bound.iter().map(|p| p.as_ref())),
        |row| row.get(0),
    )?;

    // Title ordering sorts by the guide's fallback-resolved title so mixed
    // catalogs order consistently regardless of which languages each guide
    // carries.
    let order_expr = match ordering.field {
        OrderField::PublicationDate => "g.publication_date".to_string(),
        OrderField::ViewCount => "g.view_count".to_string(),
        OrderField::Title => {
            bound.push(Box::new(default_lang.to_string()));
            "(SELECT t.title FROM guide_translations t WHERE t.guide_id = g.id \
             ORDER BY (t.lang = ?) DESC, t.lang ASC LIMIT 1) COLLATE NOCASE"
                .to_string()
        }
    };
    let direction = if ordering.descending { "DESC" } else { "ASC" };
    bound.push(Box::new(window.limit()));
    bound.push(Box::new(window.offset()));

    let sql = format!(
        "SELECT {} FROM guides g{} ORDER BY {} {}, g.id DESC LIMIT ? OFFSET ?",
        GUIDE_COLUMNS, where_sql, order_expr, direction
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        params_from_iter(bound.iter().map(|p| p.as_ref())),
        guide_from_row,
    )?;
    let mut guides = Vec::new();
    for row in rows {
        guides.push(row?);
    }
    Ok((count, guides))
}

/// Atomic in-place bump; durable once the statement returns.
pub fn increment_view_count(conn: &Connection, id: i64) -> Result<(), ApiError> {
    let changed = conn.execute(
        "UPDATE guides SET view_count = view_count + 1 WHERE id = ?1",
        params![id],
    )?;
    if changed == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(())
}

/// Atomic like bump for a published guide; returns the new total.
pub fn increment_likes(conn: &Connection, id: i64) -> Result<i64, ApiError> {
    let changed = conn.execute(
        "UPDATE guides SET likes = likes + 1 WHERE id = ?1 AND is_published = 1",
        params![id],
    )?;
    if changed == 0 {
        return Err(ApiError::NotFound);
    }
    let likes = conn.query_row("SELECT likes FROM guides WHERE id = ?1", params![id], |row| {
        row.get(0)
    })?;
    Ok(likes)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use common::model::guide::GuideCategory;

    use super::*;
    use crate::db::test_support::{fields, memory_conn, seed_guide};

    fn new_guide(title: &str, category: GuideCategory) -> NewGuide {
        NewGuide {
            slug: None,
            category,
            featured_image: None,
            is_published: true,
            is_featured: false,
            publication_date: None,
            translations: vec![("en".to_string(), fields(title))],
        }
    }

    #[test]
    fn create_allocates_distinct_slugs_for_equal_titles() {
        let mut conn = memory_conn();
        let first = create(
            &mut conn,
            &new_guide("Visa & Residency Guide", GuideCategory::Documentation),
            "en",
        )
        .unwrap();
        let second = create(
            &mut conn,
            &new_guide("Visa & Residency Guide", GuideCategory::Documentation),
            "en",
        )
        .unwrap();
        let third = create(
            &mut conn,
            &new_guide("Visa & Residency Guide", GuideCategory::Documentation),
            "en",
        )
        .unwrap();
        assert_eq!(first.slug, "visa-residency-guide");
        assert_eq!(second.slug, "visa-residency-guide-1");
        assert_eq!(third.slug, "visa-residency-guide-2");
    }

    #[test]
    fn create_rejects_duplicate_explicit_slug() {
        let mut conn = memory_conn();
        let mut guide = new_guide("Registering a Business", GuideCategory::Business);
        guide.slug = Some("register".to_string());
        create(&mut conn, &guide, "en").unwrap();

        let err = create(&mut conn, &guide, "en").unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    #[test]
    fn create_requires_a_translation() {
        let mut conn = memory_conn();
        let mut guide = new_guide("Anything", GuideCategory::Cultural);
        guide.translations.clear();
        assert!(matches!(
            create(&mut conn, &guide, "en"),
            Err(ApiError::Validation { .. })
        ));
    }

    #[test]
    fn get_by_slug_hides_unpublished_when_required() {
        let conn = memory_conn();
        seed_guide(
            &conn,
            "draft-guide",
            GuideCategory::Housing,
            false,
            false,
            Utc::now(),
        );
        assert!(matches!(
            get_by_slug(&conn, "draft-guide", true),
            Err(ApiError::NotFound)
        ));
        assert!(get_by_slug(&conn, "draft-guide", false).is_ok());
        assert!(matches!(
            get_by_slug(&conn, "missing", true),
            Err(ApiError::NotFound)
        ));
    }

    #[test]
    fn list_filters_orders_and_pages() {
        let conn = memory_conn();
        let base = Utc::now();
        seed_guide(&conn, "a-oldest", GuideCategory::Housing, true, false, base);
        seed_guide(
            &conn,
            "b-middle",
            GuideCategory::Housing,
            true,
            true,
            base + Duration::seconds(10),
        );
        seed_guide(
            &conn,
            "c-newest",
            GuideCategory::Housing,
            true,
            false,
            base + Duration::seconds(20),
        );
        seed_guide(
            &conn,
            "d-draft",
            GuideCategory::Housing,
            false,
            false,
            base + Duration::seconds(30),
        );
        seed_guide(
            &conn,
            "e-other",
            GuideCategory::Healthcare,
            true,
            false,
            base + Duration::seconds(40),
        );

        let filter = GuideFilter {
            category: Some(GuideCategory::Housing),
            published_only: true,
            ..GuideFilter::default()
        };
        let (count, guides) = list(
            &conn,
            &filter,
            Ordering::default(),
            &PageWindow::new(None, None),
            "en",
        )
        .unwrap();
        assert_eq!(count, 3);
        let slugs: Vec<&str> = guides.iter().map(|g| g.slug.as_str()).collect();
        assert_eq!(slugs, ["c-newest", "b-middle", "a-oldest"]);

        let featured = GuideFilter {
            is_featured: Some(true),
            published_only: true,
            ..GuideFilter::default()
        };
        let (count, guides) = list(
            &conn,
            &featured,
            Ordering::default(),
            &PageWindow::new(None, None),
            "en",
        )
        .unwrap();
        assert_eq!(count, 1);
        assert_eq!(guides[0].slug, "b-middle");

        // Title ascending, second page of one.
        let (count, guides) = list(
            &conn,
            &filter,
            Ordering::parse(Some("title")),
            &PageWindow::new(Some(2), Some(1)),
            "en",
        )
        .unwrap();
        assert_eq!(count, 3);
        assert_eq!(guides.len(), 1);
        assert_eq!(guides[0].slug, "b-middle");
    }

    #[test]
    fn list_search_matches_any_translation_field() {
        let conn = memory_conn();
        let id = seed_guide(
            &conn,
            "metro-cards",
            GuideCategory::Transportation,
            true,
            false,
            Utc::now(),
        );
        let mut ru = fields("Карта метро");
        ru.content = "<p>Пополнение карты метро</p>".to_string();
        translations::put(&conn, id, "ru", &ru).unwrap();

        let search = |needle: &str| {
            let filter = GuideFilter {
                published_only: true,
                search: Some(needle.to_string()),
                ..GuideFilter::default()
            };
            list(
                &conn,
                &filter,
                Ordering::default(),
                &PageWindow::new(None, None),
                "en",
            )
            .map(|(count, _)| count)
        };
        assert_eq!(search("metro-cards").unwrap(), 1);
        assert_eq!(search("метро").unwrap(), 1);
        assert_eq!(search("nothing-here").unwrap(), 0);
    }

    #[test]
    fn increments_are_applied_and_guarded() {
        let conn = memory_conn();
        let id = seed_guide(
            &conn,
            "likes-views",
            GuideCategory::Cultural,
            true,
            false,
            Utc::now(),
        );
        increment_view_count(&conn, id).unwrap();
        increment_view_count(&conn, id).unwrap();
        assert_eq!(increment_likes(&conn, id).unwrap(), 1);
        assert_eq!(increment_likes(&conn, id).unwrap(), 2);

        let guide = get_by_slug(&conn, "likes-views", true).unwrap();
        assert_eq!(guide.view_count, 2);
        assert_eq!(guide.likes, 2);

        assert!(matches!(
            increment_view_count(&conn, 9999),
            Err(ApiError::NotFound)
        ));

        let draft = seed_guide(
            &conn,
            "unpublished",
            GuideCategory::Cultural,
            false,
            false,
            Utc::now(),
        );
        assert!(matches!(
            increment_likes(&conn, draft),
            Err(ApiError::NotFound)
        ));
    }

    #[test]
    fn concurrent_creations_with_equal_titles_get_distinct_slugs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guides.sqlite");
        {
            let conn = Connection::open(&path).unwrap();
            crate::db::init_schema(&conn).unwrap();
        }

        let mut handles = Vec::new();
        for _ in 0..4 {
            let path = path.clone();
            handles.push(std::thread::spawn(move || {
                let mut conn = Connection::open(&path).unwrap();
                conn.busy_timeout(std::time::Duration::from_secs(5)).unwrap();
                create(
                    &mut conn,
                    &NewGuide {
                        slug: None,
                        category: GuideCategory::Documentation,
                        featured_image: None,
                        is_published: true,
                        is_featured: false,
                        publication_date: None,
                        translations: vec![("en".to_string(), fields("Visa & Residency Guide"))],
                    },
                    "en",
                )
                .unwrap()
                .slug
            }));
        }
        let mut slugs: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), 4);
    }

    #[test]
    fn concurrent_view_increments_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("views.sqlite");
        let id = {
            let conn = Connection::open(&path).unwrap();
            crate::db::init_schema(&conn).unwrap();
            seed_guide(
                &conn,
                "busy-guide",
                GuideCategory::Emergency,
                true,
                false,
                Utc::now(),
            )
        };

        let mut handles = Vec::new();
        for _ in 0..2 {
            let path = path.clone();
            handles.push(std::thread::spawn(move || {
                let conn = Connection::open(&path).unwrap();
                conn.busy_timeout(std::time::Duration::from_secs(5)).unwrap();
                for _ in 0..10 {
                    increment_view_count(&conn, id).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let conn = Connection::open(&path).unwrap();
        let views: i64 = conn
            .query_row("SELECT view_count FROM guides WHERE id = ?1", params![id], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(views, 20);
    }
}
