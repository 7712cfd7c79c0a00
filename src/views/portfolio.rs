use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use serde_json::json;

use crate::db;
use crate::error::AppError;
use crate::extract::{ProjectId, QueryParams};
use crate::models::ProjectDetails;
use crate::routes::comments::CommentView;
use crate::routes::projects::{load_page, project_not_found, ListParams, Pagination};
use crate::site;
use crate::state::SharedState;
use crate::storage::cloudinary::optimized_url;

use super::ProjectCard;

#[derive(Template)]
#[template(path = "portfolio.html")]
struct PortfolioTemplate {
    page_title: String,
    meta_description: String,
    projects: Vec<ProjectCard>,
    categories: Vec<CategoryLink>,
    pages: Vec<PageLink>,
    total: i64,
}

struct CategoryLink {
    name: String,
    href: String,
    active: bool,
}

struct PageLink {
    number: i64,
    href: String,
    current: bool,
    gap_before: bool,
}

/// Pages shown on each side of the current one; first and last are always shown.
const PAGE_WINDOW: i64 = 2;

#[derive(Template)]
#[template(path = "project.html")]
struct ProjectTemplate {
    page_title: String,
    meta_description: String,
    title: String,
    description: String,
    category: String,
    location: String,
    client: Option<String>,
    completion_date: String,
    project_duration: String,
    project_cost: String,
    rating: String,
    views: i32,
    media: Vec<MediaView>,
    tags: Vec<String>,
    materials: Vec<String>,
    comments: Vec<CommentView>,
    comments_endpoint: String,
    structured_data: String,
}

struct MediaView {
    is_image: bool,
    src: String,
    poster: Option<String>,
    caption: String,
}

pub async fn index(
    State(state): State<SharedState>,
    QueryParams(params): QueryParams<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let (projects, pagination) = load_page(&state, &params).await?;
    let active = params.filter().category;

    let mut categories = vec![CategoryLink {
        name: "الكل".to_string(),
        href: "/portfolio".to_string(),
        active: active.is_none(),
    }];
    for name in db::projects::categories(&state.pool).await? {
        categories.push(CategoryLink {
            href: portfolio_href(Some(&name), 1),
            active: active.as_deref() == Some(name.as_str()),
            name,
        });
    }

    let template = PortfolioTemplate {
        page_title: format!("معرض الأعمال - {}", site::COMPANY_NAME),
        meta_description: "استعرض مجموعة شاملة من مشاريعنا المميزة في مجال تنسيق الحدائق والمظلات والبرجولات وأعمال الترميم".to_string(),
        projects: projects.iter().map(ProjectCard::from).collect(),
        categories,
        pages: page_links(&pagination, active.as_deref()),
        total: pagination.total,
    };
    Ok(Html(template.render().unwrap_or_default()))
}

pub async fn show(
    State(state): State<SharedState>,
    ProjectId(id): ProjectId,
) -> Result<impl IntoResponse, AppError> {
    let project = db::projects::increment_views(&state.pool, id)
        .await?
        .ok_or_else(project_not_found)?;
    let details = db::projects::details(&state.pool, project).await?;
    let structured_data = structured_data(&details, &state.config.base_url);

    let project = &details.project;
    let template = ProjectTemplate {
        page_title: format!("{} - {}", project.title, site::COMPANY_NAME),
        meta_description: project.description.clone(),
        title: project.title.clone(),
        description: project.description.clone(),
        category: project.category.clone(),
        location: project.location.clone(),
        client: project.client.clone(),
        completion_date: project.completion_date.format("%Y-%m-%d").to_string(),
        project_duration: project.project_duration.clone(),
        project_cost: project.project_cost.clone(),
        rating: format!("{:.1}", project.rating),
        views: project.views,
        media: details
            .media_items
            .iter()
            .map(|m| MediaView {
                is_image: m.is_image(),
                src: if m.is_image() {
                    optimized_url(&m.src, 1200, None)
                } else {
                    m.src.clone()
                },
                poster: m.thumbnail.clone(),
                caption: m.title.clone().unwrap_or_else(|| project.title.clone()),
            })
            .collect(),
        tags: details.tags.iter().map(|t| t.name.clone()).collect(),
        materials: details.materials.iter().map(|m| m.name.clone()).collect(),
        comments: details
            .comments
            .clone()
            .unwrap_or_default()
            .into_iter()
            .map(CommentView::from)
            .collect(),
        comments_endpoint: format!("/api/projects/{}/comments", project.id),
        structured_data,
    };
    Ok(Html(template.render().unwrap_or_default()))
}

fn portfolio_href(category: Option<&str>, page: i64) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(category) = category {
        query.append_pair("category", category);
    }
    if page > 1 {
        query.append_pair("page", &page.to_string());
    }
    let query = query.finish();
    if query.is_empty() {
        "/portfolio".to_string()
    } else {
        format!("/portfolio?{query}")
    }
}

fn page_links(pagination: &Pagination, category: Option<&str>) -> Vec<PageLink> {
    let last = pagination.total_pages;
    let current = pagination.page.min(last);
    let from = current.saturating_sub(PAGE_WINDOW).max(1);
    let to = current.saturating_add(PAGE_WINDOW).min(last);

    let mut numbers = Vec::new();
    if from > 1 {
        numbers.push(1);
    }
    numbers.extend(from..=to);
    if to < last {
        numbers.push(last);
    }

    let mut previous = 0;
    numbers
        .into_iter()
        .map(|number| {
            let link = PageLink {
                number,
                href: portfolio_href(category, number),
                current: number == pagination.page,
                gap_before: number > previous + 1,
            };
            previous = number;
            link
        })
        .collect()
}

/// schema.org `CreativeWork` for the project page, safe to embed in a
/// `<script>` element.
pub fn structured_data(details: &ProjectDetails, base_url: &str) -> String {
    let project = &details.project;
    let images: Vec<_> = details
        .images()
        .map(|m| {
            json!({
                "@type": "ImageObject",
                "url": m.src,
                "caption": m.title.as_deref().unwrap_or(&project.title),
            })
        })
        .collect();
    let videos: Vec<_> = details
        .videos()
        .map(|m| {
            json!({
                "@type": "VideoObject",
                "name": m.title.as_deref().unwrap_or(&project.title),
                "description": m.description.as_deref().unwrap_or(&project.description),
                "contentUrl": m.src,
                "uploadDate": project.created_at.to_rfc3339(),
            })
        })
        .collect();

    let data = json!({
        "@context": "https://schema.org",
        "@type": "CreativeWork",
        "name": project.title,
        "description": project.description,
        "url": format!("{base_url}/portfolio/{}", project.id),
        "creator": {
            "@type": "Organization",
            "name": site::COMPANY_NAME,
            "url": base_url,
        },
        "dateCreated": project.created_at.to_rfc3339(),
        "dateModified": project.updated_at.to_rfc3339(),
        "locationCreated": { "@type": "Place", "name": project.location },
        "genre": project.category,
        "image": images,
        "video": videos,
    });

    data.to_string()
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portfolio_href_encodes_category_and_page() {
        assert_eq!(portfolio_href(None, 1), "/portfolio");
        assert_eq!(portfolio_href(None, 2), "/portfolio?page=2");
        assert_eq!(
            portfolio_href(Some("مظلات سيارات"), 3),
            "/portfolio?category=%D9%85%D8%B8%D9%84%D8%A7%D8%AA+%D8%B3%D9%8A%D8%A7%D8%B1%D8%A7%D8%AA&page=3"
        );
    }

    #[test]
    fn page_links_mark_current_page() {
        let links = page_links(&Pagination::new(30, 2, 12), None);
        assert_eq!(links.len(), 3);
        assert!(links[1].current);
        assert!(!links[0].current);
    }

    #[test]
    fn page_links_window_around_current_page() {
        let links = page_links(&Pagination::new(12_000, 500, 12), None);
        let numbers: Vec<i64> = links.iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![1, 498, 499, 500, 501, 502, 1000]);
        assert!(links[1].gap_before);
        assert!(links[6].gap_before);
        assert!(!links[2].gap_before);
        assert!(links[3].current);
    }

    #[test]
    fn page_links_handle_out_of_range_pages() {
        assert!(page_links(&Pagination::new(0, 1, 12), None).is_empty());
        let links = page_links(&Pagination::new(24, i64::MAX, 12), None);
        let numbers: Vec<i64> = links.iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert!(links.iter().all(|l| !l.current));
    }
}
