//! Per-language field sets for guides.
//!
//! Every guide owns at least one translation from creation on (the creation
//! transaction enforces it), so `get_any` failing with not-found means the
//! store was tampered with outside the API.

use common::model::guide::TranslationFields;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::ApiError;

fn fields_from_row(row: &Row) -> rusqlite::Result<TranslationFields> {
    Ok(TranslationFields {
        title: row.get(1)?,
        short_description: row.get(2)?,
        content: row.get(3)?,
        meta_description: row.get(4)?,
        keywords: row.get(5)?,
    })
}

/// The exact language's field set, if present.
pub fn get(
    conn: &Connection,
    guide_id: i64,
    lang: &str,
) -> Result<Option<TranslationFields>, ApiError> {
    let fields = conn
        .query_row(
            "SELECT lang, title, short_description, content, meta_description, keywords \
             FROM guide_translations WHERE guide_id = ?1 AND lang = ?2",
            params![guide_id, lang],
            fields_from_row,
        )
        .optional()?;
    Ok(fields)
}

/// Resolves a field set with fallback: the preferred language if available,
/// else the configured default, else the alphabetically first variant. The
/// resolved language code is returned alongside the fields.
pub fn get_any(
    conn: &Connection,
    guide_id: i64,
    preferred: Option<&str>,
    fallback: &str,
) -> Result<(String, TranslationFields), ApiError> {
    let resolved = conn
        .query_row(
            "SELECT lang, title, short_description, content, meta_description, keywords \
             FROM guide_translations WHERE guide_id = ?1 \
             ORDER BY (lang = ?2) DESC, (lang = ?3) DESC, lang ASC LIMIT 1",
            params![guide_id, preferred.unwrap_or(""), fallback],
            |row| Ok((row.get::<_, String>(0)?, fields_from_row(row)?)),
        )
        .optional()?;
    resolved.ok_or(ApiError::NotFound)
}

/// Inserts or replaces one language's field set.
pub fn put(
    conn: &Connection,
    guide_id: i64,
    lang: &str,
    fields: &TranslationFields,
) -> Result<(), ApiError> {
    conn.execute(
        "INSERT OR REPLACE INTO guide_translations \
         (guide_id, lang, title, short_description, content, meta_description, keywords) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            guide_id,
            lang,
            fields.title,
            fields.short_description,
            fields.content,
            fields.meta_description,
            fields.keywords,
        ],
    )?;
    Ok(())
}
