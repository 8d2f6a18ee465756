//! Generator module - writes the static HTML files for a set of posts

use anyhow::{Context as _, Result};
use chrono::Datelike;
use std::fs;
use std::path::{Path, PathBuf};
use tera::Context;
use walkdir::WalkDir;

use crate::archive::group_by_year;
use crate::content::Post;
use crate::helpers::{full_url_for, output_path_for, url_for};
use crate::templates::{ArchiveYearData, NavPost, PostData, SiteData, TemplateRenderer};
use crate::Blog;

/// Source directory copied verbatim into the output
const ASSETS_DIR: &str = "assets";

/// What a build produced
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildStats {
    pub posts: usize,
    pub years: usize,
    pub assets: usize,
}

/// Static site generator using Tera templates
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        Ok(Self {
            blog: blog.clone(),
            renderer: TemplateRenderer::new()?,
        })
    }

    /// Generate the entire site from newest-first posts
    pub fn generate(&self, posts: &[Post]) -> Result<BuildStats> {
        fs::create_dir_all(&self.blog.public_dir)
            .with_context(|| format!("creating {:?}", self.blog.public_dir))?;

        let assets = self.copy_assets()?;
        let site = SiteData::new(&self.blog.config);

        self.generate_post_pages(posts, &site)?;
        self.generate_index_page(posts, &site)?;
        let years = self.generate_archive_page(posts, &site)?;

        Ok(BuildStats {
            posts: posts.len(),
            years,
            assets,
        })
    }

    fn base_context(&self, site: &SiteData, url: &str) -> Context {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("current_year", &chrono::Local::now().year());
        context.insert("canonical_url", &self.canonical_url(url));
        context
    }

    /// Generate one page per post
    fn generate_post_pages(&self, posts: &[Post], site: &SiteData) -> Result<()> {
        for post in posts {
            let mut context = self.base_context(site, &post.url);
            context.insert("post", &PostData::from(post));
            context.insert("newer", &post.newer(posts).map(NavPost::from));
            context.insert("older", &post.older(posts).map(NavPost::from));

            if post.layout != "post" {
                tracing::debug!(
                    "{}: layout {:?} rendered with the post template",
                    post.source,
                    post.layout
                );
            }

            let html = self
                .renderer
                .render("post.html", &context)
                .with_context(|| format!("rendering {}", post.source))?;
            self.write_page(&post.url, &html)?;
        }

        tracing::info!("Generated {} post pages", posts.len());
        Ok(())
    }

    /// Generate the home page listing recent posts
    fn generate_index_page(&self, posts: &[Post], site: &SiteData) -> Result<()> {
        let recent = self.blog.config.index.recent;
        let listed: Vec<PostData> = posts.iter().take(recent).map(PostData::from).collect();

        let url = url_for(&self.blog.config, "");
        let mut context = self.base_context(site, &url);
        context.insert("posts", &listed);
        context.insert("has_more", &(posts.len() > recent));

        let html = self.renderer.render("index.html", &context)?;
        self.write_page(&url, &html)?;
        tracing::info!("Generated index page");
        Ok(())
    }

    /// Generate the archive page, returning the number of year groups
    fn generate_archive_page(&self, posts: &[Post], site: &SiteData) -> Result<usize> {
        let config = &self.blog.config;
        let groups = group_by_year(posts, config.archive.order);
        let archive_years = ArchiveYearData::from_groups(&groups, &config.date_format);

        let mut context = self.base_context(site, &site.archive_url);
        context.insert("archive_years", &archive_years);

        let html = self.renderer.render("archive.html", &context)?;
        self.write_page(&site.archive_url, &html)?;
        tracing::info!("Generated archive page ({} years)", groups.len());

        Ok(groups.len())
    }

    fn canonical_url(&self, url: &str) -> String {
        full_url_for(&self.blog.config, self.strip_baseurl(url))
    }

    /// A site URL without the baseurl, as used for output paths
    fn strip_baseurl<'u>(&self, url: &'u str) -> &'u str {
        let base = url_for(&self.blog.config, "");
        let base = base.trim_end_matches('/');
        match url.strip_prefix(base) {
            Some(rest) if base.is_empty() || rest.is_empty() || rest.starts_with('/') => rest,
            _ => url,
        }
    }

    /// The file a site URL is written to
    pub fn output_file(&self, url: &str) -> PathBuf {
        self.blog
            .public_dir
            .join(output_path_for(self.strip_baseurl(url)))
    }

    fn write_page(&self, url: &str, html: &str) -> Result<()> {
        let output_path = self.output_file(url);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, html).with_context(|| format!("writing {:?}", output_path))?;
        tracing::debug!("Wrote {:?}", output_path);
        Ok(())
    }

    /// Copy `<source>/assets` into the output, returning the number of files
    fn copy_assets(&self) -> Result<usize> {
        let src = self.blog.source_dir.join(ASSETS_DIR);
        if !src.exists() {
            return Ok(0);
        }
        let dst = self.blog.public_dir.join(ASSETS_DIR);
        copy_dir(&src, &dst)
    }
}

fn copy_dir(src: &Path, dst: &Path) -> Result<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(src)?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)
                .with_context(|| format!("copying {:?}", entry.path()))?;
            copied += 1;
        }
    }
    Ok(copied)
}
