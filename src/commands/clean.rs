//! Clean the public directory

use anyhow::{bail, Result};
use std::fs;

use crate::Blog;

/// Remove the generated site
pub fn run(blog: &Blog) -> Result<()> {
    if blog.public_dir == blog.base_dir || blog.public_dir == blog.source_dir {
        bail!(
            "Refusing to delete {:?}: public_dir points at the blog itself",
            blog.public_dir
        );
    }

    if blog.public_dir.exists() {
        fs::remove_dir_all(&blog.public_dir)?;
        tracing::info!("Deleted: {:?}", blog.public_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    #[test]
    fn test_clean_removes_public_dir() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());
        fs::create_dir_all(blog.public_dir.join("archive")).unwrap();

        run(&blog).unwrap();
        assert!(!blog.public_dir.exists());
        // Cleaning twice is fine
        run(&blog).unwrap();
    }

    #[test]
    fn test_clean_refuses_source_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig {
            public_dir: String::new(),
            ..Default::default()
        };
        let blog = Blog::with_config(dir.path(), config);
        assert!(run(&blog).is_err());
        assert!(dir.path().exists());
    }
}
