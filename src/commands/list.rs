//! List site content

use anyhow::{bail, Result};
use indexmap::IndexMap;
use std::fmt::Write as _;

use crate::archive::group_by_year;
use crate::content::loader::ContentLoader;
use crate::helpers::format_date;
use crate::Blog;

/// Print site content by type
pub fn run(blog: &Blog, content_type: &str) -> Result<()> {
    print!("{}", render(blog, content_type)?);
    Ok(())
}

/// Render the listing for a content type as plain text
pub fn render(blog: &Blog, content_type: &str) -> Result<String> {
    let loader = ContentLoader::new(blog)?;
    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            let posts = loader.load_posts()?;
            writeln!(out, "Posts ({}):", posts.len())?;
            for post in posts {
                writeln!(out, "  {} - {} [{}]", post.date, post.title, post.source)?;
            }
        }
        "tag" | "tags" => {
            let posts = loader.load_posts()?;
            let counts = count(posts.iter().flat_map(|p| p.tags.iter()));
            writeln!(out, "Tags ({}):", counts.len())?;
            for (tag, n) in counts {
                writeln!(out, "  {} ({})", tag, n)?;
            }
        }
        "category" | "categories" => {
            let posts = loader.load_posts()?;
            let counts = count(posts.iter().flat_map(|p| p.categories.iter()));
            writeln!(out, "Categories ({}):", counts.len())?;
            for (cat, n) in counts {
                writeln!(out, "  {} ({})", cat, n)?;
            }
        }
        "archive" | "year" | "years" => {
            let posts = loader.load_posts()?;
            let config = &blog.config;
            for group in group_by_year(&posts, config.archive.order) {
                writeln!(out, "{} ({})", group.year, group.len())?;
                for post in group.posts {
                    let label = format_date(&post.date, &config.date_format);
                    writeln!(out, "  {}  {}  {}", label, post.title, post.url)?;
                }
            }
        }
        _ => {
            bail!(
                "Unknown type: {}. Available: post, tag, category, archive",
                content_type
            );
        }
    }

    Ok(out)
}

/// Count occurrences, most used first, ties by name
fn count<'a>(names: impl Iterator<Item = &'a String>) -> Vec<(&'a str, usize)> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for name in names {
        *counts.entry(name.as_str()).or_insert(0) += 1;
    }
    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    counts
}
