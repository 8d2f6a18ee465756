//! Built-in site templates using the Tera template engine
//!
//! The templates are embedded in the binary; a blog needs nothing but its
//! posts and `_config.yml`.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::archive::YearGroup;
use crate::config::SiteConfig;
use crate::content::Post;
use crate::helpers::{archive_url, format_date, url_for};

/// Template renderer with the embedded default theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // URLs must reach href attributes unescaped; templates escape
        // user text explicitly with `| escape`
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("default/layout.html")),
            ("index.html", include_str!("default/index.html")),
            ("post.html", include_str!("default/post.html")),
            ("archive.html", include_str!("default/archive.html")),
            (
                "partials/archive_list.html",
                include_str!("default/partials/archive_list.html"),
            ),
        ])?;

        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Render just the year-grouped archive list
    pub fn render_archive_fragment(&self, groups: &[YearGroup], date_format: &str) -> Result<String> {
        let mut context = Context::new();
        context.insert("archive_years", &ArchiveYearData::from_groups(groups, date_format));
        self.render("partials/archive_list.html", &context)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    Ok(tera::Value::String(result.trim().to_string()))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };

    if s.chars().count() <= length {
        return Ok(tera::Value::String(s));
    }
    let truncated: String = s.chars().take(length).collect();
    Ok(tera::Value::String(format!("{}…", truncated.trim_end())))
}

// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,
    pub home_url: String,
    pub archive_url: String,
    pub archive_title: String,
}

impl SiteData {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            url: config.url.clone(),
            home_url: url_for(config, ""),
            archive_url: archive_url(config),
            archive_title: config.archive.title.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub date: String,
    pub url: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub content: String,
    pub excerpt: Option<String>,
}

impl From<&Post> for PostData {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            date: post.date.format("%Y-%m-%d").to_string(),
            url: post.url.clone(),
            description: post.description.clone(),
            tags: post.tags.iter().cloned().collect(),
            categories: post.categories.iter().cloned().collect(),
            content: post.content.clone(),
            excerpt: post.excerpt.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub url: String,
}

impl From<&Post> for NavPost {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            url: post.url.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ArchiveEntry {
    pub title: String,
    pub url: String,
    pub date: String,
    pub date_label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArchiveYearData {
    pub year: i32,
    pub posts: Vec<ArchiveEntry>,
}

impl ArchiveYearData {
    pub fn from_groups(groups: &[YearGroup], date_format: &str) -> Vec<Self> {
        groups
            .iter()
            .map(|group| ArchiveYearData {
                year: group.year,
                posts: group
                    .posts
                    .iter()
                    .map(|post| ArchiveEntry {
                        title: post.title.clone(),
                        url: post.url.clone(),
                        date: post.date.format("%Y-%m-%d").to_string(),
                        date_label: format_date(&post.date, date_format),
                    })
                    .collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{group_by_year, ArchiveOrder};
    use chrono::NaiveDate;

    fn post(title: &str, y: i32, m: u32, d: u32) -> Post {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let url = format!("/{}/{:02}/{:02}/{}.html", y, m, d, slug::slugify(title));
        Post::new(title.to_string(), date, url)
    }

    #[test]
    fn test_archive_fragment() {
        let posts = vec![
            post("New Year", 2026, 1, 22),
            post("Year End", 2025, 12, 30),
            post("Valentine", 2025, 2, 14),
        ];
        let groups = group_by_year(&posts, ArchiveOrder::Descending);

        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer.render_archive_fragment(&groups, "MMM DD").unwrap();

        let y2026 = html.find(r#"<h2 class="archive-year" id="y2026">2026</h2>"#).unwrap();
        let y2025 = html.find(r#"<h2 class="archive-year" id="y2025">2025</h2>"#).unwrap();
        assert!(y2026 < y2025);

        assert!(html.contains(
            r#"<span class="archive-date">Feb 14</span> &mdash; <a href="/2025/02/14/valentine.html">Valentine</a>"#
        ));
        let dec = html.find("Dec 30").unwrap();
        let feb = html.find("Feb 14").unwrap();
        assert!(y2025 < dec && dec < feb);
    }

    #[test]
    fn test_archive_fragment_escapes_titles() {
        let posts = vec![post("Tom & <Jerry>", 2024, 5, 1)];
        let groups = group_by_year(&posts, ArchiveOrder::Descending);

        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer.render_archive_fragment(&groups, "MMM DD").unwrap();
        assert!(html.contains("Tom &amp; &lt;Jerry&gt;"));
    }

    #[test]
    fn test_empty_archive_fragment() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer.render_archive_fragment(&[], "MMM DD").unwrap();
        assert!(!html.contains("<h2"));
        assert!(!html.contains("<li>"));
    }

    #[test]
    fn test_site_data_urls() {
        let config = SiteConfig {
            baseurl: "/blog".to_string(),
            ..Default::default()
        };
        let site = SiteData::new(&config);
        assert_eq!(site.home_url, "/blog/");
        assert_eq!(site.archive_url, "/blog/archive/");
    }

    #[test]
    fn test_truncate_chars_filter() {
        let mut args = HashMap::new();
        args.insert("length".to_string(), tera::Value::from(5));
        let out = truncate_chars_filter(&tera::Value::from("hello world"), &args).unwrap();
        assert_eq!(out, tera::Value::from("hello…"));
    }

    #[test]
    fn test_strip_html_filter() {
        let out =
            strip_html_filter(&tera::Value::from("<p>Hi <b>there</b></p>"), &HashMap::new())
                .unwrap();
        assert_eq!(out, tera::Value::from("Hi there"));
    }
}
