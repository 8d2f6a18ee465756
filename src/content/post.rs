//! Post model

use chrono::NaiveDate;
use indexmap::IndexSet;
use serde::Serialize;
use std::collections::HashMap;

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    /// Post title
    pub title: String,

    /// Publication date
    pub date: NaiveDate,

    /// Site-relative URL, including the configured baseurl
    pub url: String,

    /// Short summary from front-matter
    pub description: Option<String>,

    /// Post tags, in the order first written
    pub tags: IndexSet<String>,

    /// Post categories, in the order first written
    pub categories: IndexSet<String>,

    /// Layout template to use
    pub layout: String,

    /// Slug (URL-friendly name, derived from the filename)
    pub slug: String,

    /// Source file path relative to the source directory
    pub source: String,

    /// Rendered HTML content
    pub content: String,

    /// Rendered excerpt (before <!-- more -->)
    pub excerpt: Option<String>,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(title: String, date: NaiveDate, url: String) -> Self {
        let slug = slug::slugify(&title);
        Self {
            title,
            date,
            url,
            description: None,
            tags: IndexSet::new(),
            categories: IndexSet::new(),
            layout: "post".to_string(),
            slug,
            source: String::new(),
            content: String::new(),
            excerpt: None,
            extra: HashMap::new(),
        }
    }

    /// Get the newer neighbour in a newest-first list
    pub fn newer<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.url == self.url)?;
        pos.checked_sub(1).map(|i| &posts[i])
    }

    /// Get the older neighbour in a newest-first list
    pub fn older<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.url == self.url)?;
        posts.get(pos + 1)
    }
}
