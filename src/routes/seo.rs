use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};

use crate::db;
use crate::error::AppError;
use crate::models::ProjectDetails;
use crate::site;
use crate::state::SharedState;

pub async fn robots(State(state): State<SharedState>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=86400, s-maxage=86400"),
        ],
        render_robots(&state.config.base_url),
    )
}

pub async fn sitemap(State(state): State<SharedState>) -> Result<impl IntoResponse, AppError> {
    let rows = db::projects::list_all(&state.pool).await?;
    let projects = db::projects::with_relations(&state.pool, rows).await?;
    let xml = render_sitemap(
        &state.config.base_url,
        &site::static_pages(),
        &projects,
        Utc::now(),
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/xml; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        xml,
    ))
}

pub fn render_robots(base_url: &str) -> String {
    format!(
        "User-agent: *
Allow: /
Allow: /services/
Allow: /portfolio/

Disallow: /api/
Disallow: /dashboard/
Disallow: /login

User-agent: Googlebot-Image
Allow: /static/
Allow: /uploads/

User-agent: Googlebot-Video
Allow: /uploads/

Crawl-delay: 1

Sitemap: {base_url}/sitemap.xml
Host: {base_url}
"
    )
}

pub fn render_sitemap(
    base_url: &str,
    static_pages: &[String],
    projects: &[ProjectDetails],
    now: DateTime<Utc>,
) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"
        xmlns:image="http://www.google.com/schemas/sitemap-image/1.1"
        xmlns:video="http://www.google.com/schemas/sitemap-video/1.1">
"#,
    );

    let today = now.to_rfc3339();
    for page in static_pages {
        let (freq, priority) = if page.is_empty() {
            ("daily", "1.0")
        } else {
            ("weekly", "0.8")
        };
        xml.push_str(&format!(
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{today}</lastmod>\n    <changefreq>{freq}</changefreq>\n    <priority>{priority}</priority>\n  </url>\n",
            escape_xml(&format!("{base_url}{page}"))
        ));
    }

    for details in projects {
        let project = &details.project;
        xml.push_str(&format!(
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>weekly</changefreq>\n    <priority>0.7</priority>\n",
            escape_xml(&format!("{base_url}/portfolio/{}", project.id)),
            project.updated_at.to_rfc3339()
        ));
        for image in details.images() {
            xml.push_str(&format!(
                "    <image:image>\n      <image:loc>{}</image:loc>\n      <image:title>{}</image:title>\n    </image:image>\n",
                escape_xml(&absolute(base_url, &image.src)),
                escape_xml(image.title.as_deref().unwrap_or(&project.title))
            ));
        }
        for video in details.videos() {
            xml.push_str(&format!(
                "    <video:video>\n      <video:content_loc>{}</video:content_loc>\n      <video:title>{}</video:title>\n      <video:description>{}</video:description>\n    </video:video>\n",
                escape_xml(&absolute(base_url, &video.src)),
                escape_xml(video.title.as_deref().unwrap_or(&project.title)),
                escape_xml(video.description.as_deref().unwrap_or(&project.description))
            ));
        }
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Local uploads are stored as site-relative paths.
fn absolute(base_url: &str, src: &str) -> String {
    if src.starts_with('/') {
        format!("{base_url}{src}")
    } else {
        src.to_string()
    }
}

pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use uuid::Uuid;

    use super::*;
    use crate::models::{MediaItem, MediaKind, Project};

    fn project_with_media(kinds: &[MediaKind]) -> ProjectDetails {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let id = Uuid::now_v7();
        ProjectDetails {
            project: Project {
                id,
                title: "برجولة & جلسة".into(),
                description: "وصف".into(),
                category: "برجولات".into(),
                location: "جدة".into(),
                completion_date: at,
                client: None,
                featured: false,
                project_duration: String::new(),
                project_cost: String::new(),
                views: 0,
                rating: 0.0,
                created_at: at,
                updated_at: at,
            },
            media_items: kinds
                .iter()
                .enumerate()
                .map(|(i, kind)| MediaItem {
                    id: Uuid::now_v7(),
                    project_id: id,
                    kind: *kind,
                    src: format!("/uploads/{i}.bin"),
                    thumbnail: None,
                    title: None,
                    description: None,
                    duration: None,
                    sort_order: i as i32,
                    created_at: at,
                    updated_at: at,
                })
                .collect(),
            tags: vec![],
            materials: vec![],
            comment_count: 0,
            comments: None,
        }
    }

    #[test]
    fn sitemap_lists_static_pages_and_projects() {
        let project = project_with_media(&[MediaKind::Image, MediaKind::Video]);
        let xml = render_sitemap(
            "https://example.test",
            &["".to_string(), "/portfolio".to_string()],
            std::slice::from_ref(&project),
            Utc::now(),
        );

        assert!(xml.contains("<loc>https://example.test</loc>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(xml.contains("<loc>https://example.test/portfolio</loc>"));
        assert!(xml.contains(&format!(
            "<loc>https://example.test/portfolio/{}</loc>",
            project.project.id
        )));
        assert!(xml.contains("<lastmod>2024-05-01T12:00:00+00:00</lastmod>"));
        assert!(xml.contains("<image:loc>https://example.test/uploads/0.bin</image:loc>"));
        assert!(xml.contains("<video:content_loc>https://example.test/uploads/1.bin"));
        assert!(xml.contains("برجولة &amp; جلسة"));
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn sitemap_omits_empty_media_blocks() {
        let project = project_with_media(&[]);
        let xml = render_sitemap("https://example.test", &[], &[project], Utc::now());
        assert!(!xml.contains("image:image>"));
        assert!(!xml.contains("video:video>"));
    }

    #[test]
    fn robots_points_at_sitemap() {
        let robots = render_robots("https://example.test");
        assert!(robots.contains("Sitemap: https://example.test/sitemap.xml"));
        assert!(robots.contains("Disallow: /api/"));
    }

    #[test]
    fn escape_xml_handles_markup() {
        assert_eq!(escape_xml(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&apos;");
    }
}
