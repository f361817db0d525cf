use actix_web::{web, HttpResponse};
use common::model::guide::TranslationFields;
use common::requests::NewGuideRequest;
use regex::Regex;

use crate::config::Config;
use crate::db::Db;
use crate::error::ApiError;
use crate::guides::repository::{self, NewGuide};

const SHORT_DESCRIPTION_MAX: usize = 300;
const META_DESCRIPTION_MAX: usize = 160;
const KEYWORDS_MAX: usize = 200;
const TITLE_MAX: usize = 200;

fn validate_translation(lang: &str, fields: &TranslationFields) -> Result<(), ApiError> {
    if fields.title.trim().is_empty() || fields.title.chars().count() > TITLE_MAX {
        return Err(ApiError::validation(
            "title",
            format!("title ({}) must be 1-{} characters", lang, TITLE_MAX),
        ));
    }
    if fields.short_description.trim().is_empty()
        || fields.short_description.chars().count() > SHORT_DESCRIPTION_MAX
    {
        return Err(ApiError::validation(
            "short_description",
            format!(
                "short_description ({}) must be 1-{} characters",
                lang, SHORT_DESCRIPTION_MAX
            ),
        ));
    }
    if fields.content.trim().is_empty() {
        return Err(ApiError::validation(
            "content",
            format!("content ({}) must not be empty", lang),
        ));
    }
    if let Some(meta) = &fields.meta_description {
        if meta.chars().count() > META_DESCRIPTION_MAX {
            return Err(ApiError::validation(
                "meta_description",
                format!(
                    "meta_description ({}) must be at most {} characters",
                    lang, META_DESCRIPTION_MAX
                ),
            ));
        }
    }
    if let Some(keywords) = &fields.keywords {
        if keywords.chars().count() > KEYWORDS_MAX {
            return Err(ApiError::validation(
                "keywords",
                format!("keywords ({}) must be at most {} characters", lang, KEYWORDS_MAX),
            ));
        }
    }
    Ok(())
}

pub(crate) fn validate(request: &NewGuideRequest) -> Result<(), ApiError> {
    if request.translations.is_empty() {
        return Err(ApiError::validation(
            "translations",
            "at least one translation is required",
        ));
    }
    let lang_re = Regex::new(r"^[a-z]{2,8}(-[a-z0-9]{1,8})?$")
        .map_err(|e| ApiError::validation("translations", format!("regex error: {}", e)))?;
    for (lang, fields) in &request.translations {
        if !lang_re.is_match(lang) {
            return Err(ApiError::validation(
                "translations",
                format!("'{}' is not a usable language code", lang),
            ));
        }
        validate_translation(lang, fields)?;
    }
    if let Some(slug) = &request.slug {
        let slug_re = Regex::new(r"^[-a-zA-Z0-9_]+$")
            .map_err(|e| ApiError::validation("slug", format!("regex error: {}", e)))?;
        if !slug_re.is_match(slug) {
            return Err(ApiError::validation(
                "slug",
                "slug may only contain letters, numbers, hyphens and underscores",
            ));
        }
    }
    Ok(())
}

pub(crate) async fn process(
    db: web::Data<Db>,
    config: web::Data<Config>,
    payload: web::Json<NewGuideRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = payload.into_inner();
    validate(&request)?;

    let new = NewGuide {
        slug: request.slug,
        category: request.category,
        featured_image: request.featured_image,
        is_published: request.is_published.unwrap_or(true),
        is_featured: request.is_featured.unwrap_or(false),
        publication_date: request.publication_date,
        translations: request.translations.into_iter().collect(),
    };
    let mut conn = db.open()?;
    let guide = repository::create(&mut conn, &new, &config.default_lang)?;
    Ok(HttpResponse::Created().json(guide))
}
