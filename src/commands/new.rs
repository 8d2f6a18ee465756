//! Create a new post

use anyhow::{bail, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

use crate::Blog;

const DEFAULT_SCAFFOLD: &str = "---\ntitle: \"{{ title }}\"\ndate: {{ date }}\ntags: []\n---\n";

/// Create `<posts_dir>/YYYY-MM-DD-<slug>.md` and return its path
///
/// The file body comes from `_scaffolds/post.md` when the blog has one.
pub fn create_post(blog: &Blog, title: &str, date: Option<NaiveDate>) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        bail!("Title {:?} has nothing to build a file name from", title);
    }

    let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let target_dir = blog.source_dir.join(&blog.config.posts_dir);
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(format!("{}-{}.md", date.format("%Y-%m-%d"), slug));
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    let scaffold_path = blog.base_dir.join("_scaffolds").join("post.md");
    let scaffold = if scaffold_path.exists() {
        fs::read_to_string(&scaffold_path)?
    } else {
        DEFAULT_SCAFFOLD.to_string()
    };

    let content = scaffold
        .replace("{{ title }}", &title.replace('"', "\\\""))
        .replace("{{ date }}", &date.format("%Y-%m-%d").to_string());

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}
