//! Build the static site

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::generator::{BuildStats, Generator};
use crate::Blog;

/// Load every post, then write the site
///
/// Loading happens before anything is written, so a post that fails
/// validation stops the build with the output directory untouched.
pub fn run(blog: &Blog) -> Result<BuildStats> {
    let start = std::time::Instant::now();

    let loader = ContentLoader::new(blog)?;
    let posts = loader.load_posts()?;
    tracing::info!("Loaded {} posts", posts.len());

    let generator = Generator::new(blog)?;
    let stats = generator.generate(&posts)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(stats)
}
