//! Language-aware query façade used by the HTTP layer.

use common::model::guide::{Guide, GuideDetail, GuideSummary};
use common::model::page::Page;
use rusqlite::Connection;

use crate::error::ApiError;
use crate::guides::repository::{self, GuideFilter, Ordering};
use crate::guides::{related, render, translations};
use crate::pagination::PageWindow;

/// Assumed reading speed for the estimate.
pub const READING_WORDS_PER_MINUTE: usize = 200;

/// How many same-category guides a detail payload carries.
pub const RELATED_LIMIT: u32 = 3;

/// Estimated minutes to read, never below one. Counts whitespace-separated
/// words of the stored content as-is, markup included.
pub fn reading_time_minutes(content: &str) -> u32 {
    let words = content.split_whitespace().count();
    (words / READING_WORDS_PER_MINUTE).max(1) as u32
}

fn summarize(
    conn: &Connection,
    guide: &Guide,
    lang: Option<&str>,
    default_lang: &str,
) -> Result<GuideSummary, ApiError> {
    let (language, fields) = translations::get_any(conn, guide.id, lang, default_lang)?;
    Ok(GuideSummary {
        id: guide.id,
        title: fields.title,
        slug: guide.slug.clone(),
        category: guide.category,
        short_description: fields.short_description,
        featured_image: guide.featured_image.clone(),
        is_featured: guide.is_featured,
        publication_date: guide.publication_date,
        view_count: guide.view_count,
        likes: guide.likes,
        reading_time: reading_time_minutes(&fields.content),
        language,
    })
}

/// Resolves a batch of guides into summaries in the given language.
pub fn summaries(
    conn: &Connection,
    guides: &[Guide],
    lang: Option<&str>,
    default_lang: &str,
) -> Result<Vec<GuideSummary>, ApiError> {
    guides
        .iter()
        .map(|guide| summarize(conn, guide, lang, default_lang))
        .collect()
}

/// Published listing with resolved language fields and reading times.
pub fn list_published(
    conn: &Connection,
    filter: &GuideFilter,
    ordering: Ordering,
    window: &PageWindow,
    lang: Option<&str>,
    default_lang: &str,
) -> Result<Page<GuideSummary>, ApiError> {
    let mut filter = filter.clone();
    filter.published_only = true;
    let (count, guides) = repository::list(conn, &filter, ordering, window, default_lang)?;
    Ok(Page {
        count,
        page: window.page,
        page_size: window.page_size,
        results: summaries(conn, &guides, lang, default_lang)?,
    })
}

/// Full detail payload for one slug. Counts the view (durably, before
/// returning) and reflects the new total in the payload.
pub fn get_detail(
    conn: &Connection,
    slug: &str,
    lang: Option<&str>,
    default_lang: &str,
    base_url: Option<&str>,
) -> Result<GuideDetail, ApiError> {
    let mut guide = repository::get_by_slug(conn, slug, true)?;
    repository::increment_view_count(conn, guide.id)?;
    guide.view_count += 1;

    let (language, fields) = translations::get_any(conn, guide.id, lang, default_lang)?;
    let related_guides = related::related_to(conn, &guide, RELATED_LIMIT)?;
    let related = summaries(conn, &related_guides, lang, default_lang)?;

    Ok(GuideDetail {
        id: guide.id,
        title: fields.title,
        slug: guide.slug,
        category: guide.category,
        short_description: fields.short_description,
        content: render::render(&fields.content, base_url),
        meta_description: fields.meta_description,
        keywords: fields.keywords,
        featured_image: guide.featured_image,
        is_featured: guide.is_featured,
        publication_date: guide.publication_date,
        view_count: guide.view_count,
        likes: guide.likes,
        reading_time: reading_time_minutes(&fields.content),
        language,
        related,
        created_at: guide.created_at,
        updated_at: guide.updated_at,
    })
}
