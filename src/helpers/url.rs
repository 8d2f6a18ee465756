//! URL helper functions

use chrono::NaiveDate;

use crate::config::SiteConfig;

/// Generate a URL under the configured baseurl
///
/// # Examples
/// ```ignore
/// url_for(&config, "/archive/") // -> "/blog/archive/"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.baseurl.trim_matches('/');
    let path = path.trim_start_matches('/');

    match (base.is_empty(), path.is_empty()) {
        (true, _) => format!("/{}", path),
        (false, true) => format!("/{}/", base),
        (false, false) => format!("/{}/{}", base, path),
    }
}

/// Generate a full URL including the domain
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    format!("{}{}", config.url.trim_end_matches('/'), url_for(config, path))
}

/// URL of the archive page
pub fn archive_url(config: &SiteConfig) -> String {
    url_for(config, &format!("{}/", config.archive.path.trim_matches('/')))
}

/// Expand a permalink pattern for a post
///
/// Supported placeholders: `:year :month :day :i_month :i_day :title
/// :categories`. A pattern ending in `/` is left as a directory URL.
pub fn permalink(pattern: &str, date: &NaiveDate, slug: &str, categories: &[String]) -> String {
    let categories = categories
        .iter()
        .map(|c| slug::slugify(c))
        .collect::<Vec<_>>()
        .join("/");

    let expanded = pattern
        .replace(":year", &date.format("%Y").to_string())
        .replace(":month", &date.format("%m").to_string())
        .replace(":day", &date.format("%d").to_string())
        .replace(":i_month", &date.format("%-m").to_string())
        .replace(":i_day", &date.format("%-d").to_string())
        .replace(":title", slug)
        .replace(":categories", &categories);

    // Empty placeholders would otherwise leave `//` behind
    let mut path = String::with_capacity(expanded.len() + 1);
    for segment in expanded.split('/').filter(|s| !s.is_empty()) {
        path.push('/');
        path.push_str(segment);
    }
    if expanded.ends_with('/') || path.is_empty() {
        path.push('/');
    }
    path
}

/// The file a URL is written to, relative to the output directory
///
/// Directory URLs map to their `index.html`.
pub fn output_path_for(url: &str) -> String {
    let path = url.trim_start_matches('/');
    if path.is_empty() || path.ends_with('/') {
        format!("{}index.html", path)
    } else {
        path.to_string()
    }
}

/// Whether a URL has a `.` or `..` segment
///
/// Such a URL would resolve outside the page it names once mapped to a file.
pub fn has_relative_segment(url: &str) -> bool {
    url.split(['/', '\\']).any(|s| s == "." || s == "..")
}
