//! Helper functions shared by the loader and the templates

mod date;
mod url;

pub use date::*;
pub use url::*;
