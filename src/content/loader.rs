//! Content loader - loads posts from the posts directory

use chrono::NaiveDate;
use chrono_tz::Tz;
use indexmap::{IndexMap, IndexSet};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::frontmatter::parse_date;
use super::{FrontMatter, MarkdownRenderer, Post};
use crate::error::{ConfigError, ContentError};
use crate::helpers::{archive_url, has_relative_segment, output_path_for, permalink, url_for};
use crate::Blog;

/// Loads content from the source directory
pub struct ContentLoader<'a> {
    blog: &'a Blog,
    renderer: MarkdownRenderer,
    tz: Option<Tz>,
    exclude: Vec<glob::Pattern>,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(blog: &'a Blog) -> Result<Self, ConfigError> {
        Ok(Self {
            blog,
            renderer: MarkdownRenderer::new(&blog.config.markdown),
            tz: blog.config.tz()?,
            exclude: blog.config.exclude_patterns()?,
        })
    }

    /// The directory posts are read from
    pub fn posts_dir(&self) -> PathBuf {
        self.blog.source_dir.join(&self.blog.config.posts_dir)
    }

    /// Load all published posts, newest first
    ///
    /// The first document that fails validation aborts loading; a build
    /// never proceeds with a post silently left out. Two posts writing the
    /// same output file, or a post taking the home or archive page's file,
    /// is a validation failure too.
    pub fn load_posts(&self) -> Result<Vec<Post>, ContentError> {
        let posts_dir = self.posts_dir();
        if !posts_dir.exists() {
            tracing::debug!("No posts directory at {:?}", posts_dir);
            return Ok(Vec::new());
        }

        let config = &self.blog.config;
        let reserved = [
            (output_path_for(&url_for(config, "")), "home"),
            (output_path_for(&archive_url(config)), "archive"),
        ];

        let mut posts = Vec::new();
        let mut seen: IndexMap<String, PathBuf> = IndexMap::new();

        for entry in WalkDir::new(&posts_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| ContentError::Io {
                path: e.path().unwrap_or(&posts_dir).to_path_buf(),
                source: e.into(),
            })?;
            let path = entry.path();

            if !entry.file_type().is_file() || !is_markdown_file(path) || self.is_excluded(path)
            {
                continue;
            }

            let Some(post) = self.load_post(path)? else {
                tracing::debug!("Skipping unpublished {:?}", path);
                continue;
            };

            let target = output_path_for(&post.url);
            if let Some((_, page)) = reserved.iter().find(|(t, _)| *t == target) {
                return Err(ContentError::ReservedUrl {
                    path: path.to_path_buf(),
                    url: post.url,
                    page: *page,
                });
            }
            if let Some(other) = seen.get(&target) {
                return Err(ContentError::DuplicateUrl {
                    path: path.to_path_buf(),
                    other: other.clone(),
                    url: post.url,
                });
            }
            seen.insert(target, path.to_path_buf());
            posts.push(post);
        }

        // Newest first
        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.title.cmp(&b.title)));

        tracing::debug!("Loaded {} posts from {:?}", posts.len(), posts_dir);
        Ok(posts)
    }

    /// Load a single post from a file, `None` when it is unpublished
    pub fn load_post(&self, path: &Path) -> Result<Option<Post>, ContentError> {
        let content = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (fm, body) = FrontMatter::parse(&content).map_err(|e| ContentError::FrontMatter {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if !fm.published {
            return Ok(None);
        }

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled");
        let (file_date, slug) = split_dated_name(stem);

        let date = match fm.date.as_deref() {
            Some(value) => parse_date(value, self.tz).ok_or_else(|| ContentError::InvalidDate {
                path: path.to_path_buf(),
                value: value.to_string(),
            })?,
            None => file_date.ok_or_else(|| ContentError::MissingDate {
                path: path.to_path_buf(),
            })?,
        };

        let slug = slug::slugify(slug);
        let title = fm.title.unwrap_or_else(|| title_from_slug(&slug));
        let categories: IndexSet<String> = fm.categories.into_iter().collect();

        let url = match fm.permalink.as_deref() {
            Some(link) => url_for(&self.blog.config, link),
            None => {
                let cats: Vec<String> = categories.iter().cloned().collect();
                let link = permalink(&self.blog.config.permalink, &date, &slug, &cats);
                url_for(&self.blog.config, &link)
            }
        };
        if has_relative_segment(&url) {
            return Err(ContentError::InvalidUrl {
                path: path.to_path_buf(),
                url,
            });
        }

        let (excerpt, full) = MarkdownRenderer::split_excerpt(body);

        let mut post = Post::new(title, date, url);
        post.description = fm.description;
        post.tags = fm.tags.into_iter().collect();
        post.categories = categories;
        post.layout = fm.layout.unwrap_or_else(|| "post".to_string());
        post.slug = slug;
        post.source = path
            .strip_prefix(&self.blog.source_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();
        post.content = self.renderer.render(&full);
        post.excerpt = excerpt.map(|e| self.renderer.render(e));
        post.extra = fm.extra;

        Ok(Some(post))
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.blog.source_dir).unwrap_or(path);
        self.exclude.iter().any(|p| p.matches_path(relative))
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(true);

    !hidden
        && path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e == "md" || e == "markdown")
            .unwrap_or(false)
}

/// Split a `YYYY-MM-DD-name` file stem into its date and name
fn split_dated_name(stem: &str) -> (Option<NaiveDate>, &str) {
    if let (Some(prefix), Some(name)) = (stem.get(..10), stem.get(11..)) {
        if stem.as_bytes()[10] == b'-' && !name.is_empty() {
            if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
                return (Some(date), name);
            }
        }
    }
    (None, stem)
}

fn title_from_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
