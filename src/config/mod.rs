//! Configuration module

mod site;

pub use site::ArchiveConfig;
pub use site::IndexConfig;
pub use site::MarkdownConfig;
pub use site::SiteConfig;
