use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::MediaKind;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Body of `POST /api/projects` and `PUT /api/projects/{id}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub completion_date: Option<String>,
    pub client: Option<String>,
    pub featured: Option<bool>,
    pub project_duration: Option<String>,
    pub project_cost: Option<String>,
    pub media_items: Option<Vec<MediaInput>>,
    pub tags: Option<Vec<String>>,
    pub materials: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MediaInput {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub src: Option<String>,
    pub thumbnail: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub completion_date: DateTime<Utc>,
    pub client: Option<String>,
    pub featured: bool,
    pub project_duration: String,
    pub project_cost: String,
    pub media: Vec<NewMedia>,
    pub tags: Vec<String>,
    pub materials: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewMedia {
    pub kind: MediaKind,
    pub src: String,
    pub thumbnail: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
}

/// Body of `POST /api/projects/{id}/comments`. Rating stays loosely typed so a
/// non-numeric value becomes a validation message rather than a parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct CommentInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
    pub rating: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub name: String,
    pub email: Option<String>,
    pub message: String,
    pub rating: i32,
}

pub fn validate_project(input: ProjectInput) -> Result<NewProject, AppError> {
    let (Some(title), Some(description), Some(category), Some(location)) = (
        non_blank(input.title),
        non_blank(input.description),
        non_blank(input.category),
        non_blank(input.location),
    ) else {
        return Err(AppError::BadRequest("البيانات الأساسية مطلوبة".to_string()));
    };

    let completion_date = match non_blank(input.completion_date) {
        Some(raw) => parse_date(&raw)
            .ok_or_else(|| AppError::BadRequest("تاريخ الإنجاز غير صحيح".to_string()))?,
        None => Utc::now(),
    };

    let mut media = Vec::new();
    let mut details = Vec::new();
    for (index, item) in input.media_items.unwrap_or_default().into_iter().enumerate() {
        let kind = item.kind.as_deref().and_then(MediaKind::parse);
        let src = non_blank(item.src);
        match (kind, src) {
            (Some(kind), Some(src)) => media.push(NewMedia {
                kind,
                src,
                thumbnail: non_blank(item.thumbnail),
                title: non_blank(item.title),
                description: non_blank(item.description),
                duration: non_blank(item.duration),
            }),
            (None, _) => details.push(format!("نوع الوسائط غير صحيح للعنصر {}", index + 1)),
            (_, None) => details.push(format!("رابط الوسائط مطلوب للعنصر {}", index + 1)),
        }
    }
    if !details.is_empty() {
        return Err(AppError::Validation(
            "بيانات الوسائط غير صحيحة".to_string(),
            details,
        ));
    }

    Ok(NewProject {
        title,
        description,
        category,
        location,
        completion_date,
        client: non_blank(input.client),
        featured: input.featured.unwrap_or(false),
        project_duration: input.project_duration.unwrap_or_default().trim().to_string(),
        project_cost: input.project_cost.unwrap_or_default().trim().to_string(),
        media,
        tags: clean_names(input.tags),
        materials: clean_names(input.materials),
    })
}

/// Collects every problem with a comment before rejecting it.
pub fn validate_comment(input: CommentInput) -> Result<NewComment, AppError> {
    let mut errors = Vec::new();

    let name = input.name.as_deref().map(str::trim).unwrap_or_default();
    let name_len = name.chars().count();
    if name.is_empty() {
        errors.push("الاسم مطلوب".to_string());
    } else if name_len < 2 {
        errors.push("الاسم يجب أن يكون على الأقل حرفين".to_string());
    } else if name_len > 100 {
        errors.push("الاسم طويل جداً".to_string());
    }

    let email = input
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty());
    if let Some(email) = email {
        if !EMAIL_RE.is_match(email) {
            errors.push("البريد الإلكتروني غير صحيح".to_string());
        }
    }

    let message = input.message.as_deref().map(str::trim).unwrap_or_default();
    let message_len = message.chars().count();
    if message.is_empty() {
        errors.push("التعليق مطلوب".to_string());
    } else if message_len < 10 {
        errors.push("التعليق يجب أن يكون على الأقل 10 أحرف".to_string());
    } else if message_len > 1000 {
        errors.push("التعليق طويل جداً".to_string());
    }

    let rating = match input.rating.as_ref().and_then(serde_json::Value::as_f64) {
        None => {
            errors.push("التقييم مطلوب".to_string());
            None
        }
        Some(r) if !(1.0..=5.0).contains(&r) || r.fract() != 0.0 => {
            errors.push("التقييم يجب أن يكون بين 1 و 5".to_string());
            None
        }
        Some(r) => Some(r as i32),
    };

    match rating {
        Some(rating) if errors.is_empty() => Ok(NewComment {
            name: name.to_string(),
            email: email.map(str::to_string),
            message: message.to_string(),
            rating,
        }),
        _ => Err(AppError::Validation("بيانات غير صحيحة".to_string(), errors)),
    }
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn clean_names(names: Option<Vec<String>>) -> Vec<String> {
    names
        .unwrap_or_default()
        .into_iter()
        .filter_map(|n| non_blank(Some(n)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn project_input() -> ProjectInput {
        ProjectInput {
            title: Some("مظلة سيارات".into()),
            description: Some("تركيب مظلات".into()),
            category: Some("مظلات".into()),
            location: Some("جدة".into()),
            ..Default::default()
        }
    }

    fn comment_input(name: &str, message: &str, rating: serde_json::Value) -> CommentInput {
        CommentInput {
            name: Some(name.into()),
            email: None,
            message: Some(message.into()),
            rating: Some(rating),
        }
    }

    fn details(err: AppError) -> Vec<String> {
        match err {
            AppError::Validation(_, details) => details,
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn project_requires_core_fields() {
        let mut input = project_input();
        input.location = Some("   ".into());
        assert!(matches!(validate_project(input), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn project_defaults_optional_fields() {
        let mut input = project_input();
        input.client = Some("".into());
        input.tags = Some(vec!["حديد".into(), " ".into()]);
        let project = validate_project(input).unwrap();
        assert_eq!(project.client, None);
        assert!(!project.featured);
        assert_eq!(project.project_cost, "");
        assert_eq!(project.tags, vec!["حديد".to_string()]);
    }

    #[test]
    fn project_rejects_unknown_media_type() {
        let mut input = project_input();
        input.media_items = Some(vec![MediaInput {
            kind: Some("AUDIO".into()),
            src: Some("/uploads/a.mp3".into()),
            ..Default::default()
        }]);
        assert_eq!(details(validate_project(input).unwrap_err()).len(), 1);
    }

    #[test]
    fn project_rejects_bad_date() {
        let mut input = project_input();
        input.completion_date = Some("yesterday".into());
        assert!(matches!(validate_project(input), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn parse_date_accepts_both_forms() {
        let day = parse_date("2024-03-15").unwrap();
        assert_eq!(day.to_rfc3339(), "2024-03-15T00:00:00+00:00");
        let ts = parse_date("2024-03-15T10:30:00+03:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-03-15T07:30:00+00:00");
    }

    #[test]
    fn comment_trims_and_accepts() {
        let comment =
            validate_comment(comment_input("  أحمد  ", "  عمل ممتاز وسريع جداً  ", json!(5)))
                .unwrap();
        assert_eq!(comment.name, "أحمد");
        assert_eq!(comment.message, "عمل ممتاز وسريع جداً");
        assert_eq!(comment.rating, 5);
    }

    #[test]
    fn comment_collects_all_errors() {
        let input = CommentInput {
            name: Some("a".into()),
            email: Some("not-an-email".into()),
            message: Some("short".into()),
            rating: Some(json!(9)),
        };
        assert_eq!(details(validate_comment(input).unwrap_err()).len(), 4);
    }

    #[test]
    fn comment_rating_must_be_whole_number() {
        let err = validate_comment(comment_input("Sara", "a long enough message", json!(4.5)))
            .unwrap_err();
        assert_eq!(details(err).len(), 1);
        let err = validate_comment(comment_input("Sara", "a long enough message", json!("5")))
            .unwrap_err();
        assert_eq!(details(err), vec!["التقييم مطلوب".to_string()]);
    }

    #[test]
    fn comment_blank_email_is_ignored() {
        let mut input = comment_input("Sara", "a long enough message", json!(3));
        input.email = Some("  ".into());
        assert_eq!(validate_comment(input).unwrap().email, None);
    }
}
