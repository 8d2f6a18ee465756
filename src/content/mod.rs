//! Content module - handles posts, front-matter and markdown

mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use frontmatter::{parse_date, FrontMatter};
pub use markdown::{escape_html, MarkdownRenderer};
pub use post::Post;
