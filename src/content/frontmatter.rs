//! Front-matter parsing

use anyhow::{anyhow, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// A YAML or JSON scalar taken as text, so `tags: [2024]` reads as `"2024"`
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Str(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

/// Deserialize either a whitespace-separated string or a list of scalars
fn words_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum WordsOrSeq {
        One(Scalar),
        Seq(Vec<Scalar>),
    }

    Ok(match Option::<WordsOrSeq>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(WordsOrSeq::One(Scalar::Str(s))) => {
            s.split_whitespace().map(str::to_string).collect()
        }
        Some(WordsOrSeq::One(other)) => vec![other.into()],
        Some(WordsOrSeq::Seq(v)) => v.into_iter().map(String::from).collect(),
    })
}

/// Front-matter data from a post
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub layout: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "words_or_seq", alias = "tag")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "words_or_seq", alias = "category")]
    pub categories: Vec<String>,
    pub permalink: Option<String>,
    pub published: bool,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            title: None,
            date: None,
            layout: None,
            description: None,
            tags: Vec::new(),
            categories: Vec::new(),
            permalink: None,
            published: true,
            extra: HashMap::new(),
        }
    }
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str)> {
        let content = content.trim_start_matches('\u{feff}');

        if let Some(rest) = content.strip_prefix("---") {
            return Self::parse_yaml(rest);
        }

        if content.starts_with(";;;") || content.starts_with('{') {
            return Self::parse_json(content);
        }

        Ok((FrontMatter::default(), content))
    }

    fn parse_yaml(rest: &str) -> Result<(Self, &str)> {
        let rest = rest.trim_start_matches([' ', '\t']);
        let rest = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
            .ok_or_else(|| anyhow!("opening `---` must be on its own line"))?;

        // An empty block closes immediately
        let (yaml, remaining) = if let Some(after) = rest.strip_prefix("---") {
            ("", after)
        } else {
            let end = rest
                .find("\n---")
                .ok_or_else(|| anyhow!("missing closing `---`"))?;
            (&rest[..end], &rest[end + 4..])
        };
        let remaining = remaining.trim_start_matches(['\n', '\r']);

        if yaml.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml)?;
        Ok((fm, remaining))
    }

    fn parse_json(content: &str) -> Result<(Self, &str)> {
        if let Some(rest) = content.strip_prefix(";;;") {
            let end = rest
                .find(";;;")
                .ok_or_else(|| anyhow!("missing closing `;;;`"))?;
            let fm: FrontMatter = serde_json::from_str(&rest[..end])?;
            return Ok((fm, rest[end + 3..].trim_start_matches(['\n', '\r'])));
        }

        // A leading JSON object; let serde_json find where it ends
        let mut stream = serde_json::Deserializer::from_str(content).into_iter::<FrontMatter>();
        match stream.next() {
            Some(Ok(fm)) => {
                let remaining = &content[stream.byte_offset()..];
                Ok((fm, remaining.trim_start_matches(['\n', '\r'])))
            }
            Some(Err(e)) => Err(anyhow!("invalid JSON front-matter: {}", e)),
            None => Err(anyhow!("invalid JSON front-matter")),
        }
    }
}

/// Parse a front-matter date into a calendar date
///
/// Timestamps that carry an offset are shifted into `tz` first, when given,
/// so a post written late at night abroad lands on the site's calendar day.
/// Timestamps without an offset are taken as already being in site time.
pub fn parse_date(value: &str, tz: Option<Tz>) -> Option<NaiveDate> {
    let s = value.trim();

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    let naive_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
    ];
    for fmt in naive_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    let offset = DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S %z"))
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%d %H:%M %z"))
        .ok()?;
    Some(local_date(offset, tz))
}

fn local_date(dt: DateTime<FixedOffset>, tz: Option<Tz>) -> NaiveDate {
    match tz {
        Some(tz) => dt.with_timezone(&tz).date_naive(),
        None => dt.date_naive(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15 10:30:00
layout: post
description: First one
tags:
  - rust
  - blog
categories: notes
---

This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello World"));
        assert_eq!(fm.date.as_deref(), Some("2024-01-15 10:30:00"));
        assert_eq!(fm.layout.as_deref(), Some("post"));
        assert_eq!(fm.description.as_deref(), Some("First one"));
        assert_eq!(fm.tags, vec!["rust", "blog"]);
        assert_eq!(fm.categories, vec!["notes"]);
        assert!(fm.published);
        assert!(remaining.starts_with("This is the content."));
    }

    #[test]
    fn test_space_separated_tags() {
        let content = "---\ntitle: T\ntags: rust web  cli\n---\nbody";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.tags, vec!["rust", "web", "cli"]);
        assert_eq!(remaining, "body");
    }

    #[test]
    fn test_numeric_tags_and_categories() {
        let content = "---\ntags: [2024, rust, true]\ncategories: 2025\n---\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.tags, vec!["2024", "rust", "true"]);
        assert_eq!(fm.categories, vec!["2025"]);

        let (fm, _) = FrontMatter::parse(r#"{"tags": [1.5, "go"], "category": 7}"#).unwrap();
        assert_eq!(fm.tags, vec!["1.5", "go"]);
        assert_eq!(fm.categories, vec!["7"]);
    }

    #[test]
    fn test_extra_fields_and_unpublished() {
        let content = "---\ntitle: Draft\npublished: false\nmood: sunny\n---\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert!(!fm.published);
        assert_eq!(
            fm.extra.get("mood"),
            Some(&serde_yaml::Value::String("sunny".to_string()))
        );
    }

    #[test]
    fn test_empty_frontmatter() {
        let (fm, remaining) = FrontMatter::parse("---\n---\n# Heading\n").unwrap();
        assert!(fm.title.is_none());
        assert_eq!(remaining, "# Heading\n");
    }

    #[test]
    fn test_no_frontmatter() {
        let (fm, remaining) = FrontMatter::parse("Just text").unwrap();
        assert!(fm.title.is_none());
        assert_eq!(remaining, "Just text");
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        assert!(FrontMatter::parse("---\ntitle: [oops\n---\nbody").is_err());
        assert!(FrontMatter::parse("---\ntitle: never closed\n").is_err());
    }

    #[test]
    fn test_parse_json_frontmatter() {
        let content = "{\"title\": \"Test Post\", \"tags\": [\"a\", \"b\"]}\n\nThis is content.\n";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Test Post"));
        assert_eq!(fm.tags, vec!["a", "b"]);
        assert_eq!(remaining, "This is content.\n");

        let content = ";;;\n{\"title\": \"Fenced\"}\n;;;\nBody";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Fenced"));
        assert_eq!(remaining, "Body");
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2025-02-14", None), Some(ymd(2025, 2, 14)));
        assert_eq!(parse_date("2025/12/30", None), Some(ymd(2025, 12, 30)));
        assert_eq!(parse_date("2026-01-22 08:15", None), Some(ymd(2026, 1, 22)));
        assert_eq!(
            parse_date("2026-01-22T08:15:00.250", None),
            Some(ymd(2026, 1, 22))
        );
        assert_eq!(
            parse_date("2024-06-01 12:00:00 +0200", None),
            Some(ymd(2024, 6, 1))
        );
        assert_eq!(
            parse_date("2024-06-01T12:00:00Z", None),
            Some(ymd(2024, 6, 1))
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date("yesterday", None), None);
        assert_eq!(parse_date("2024-13-45", None), None);
        assert_eq!(parse_date("", None), None);
    }

    #[test]
    fn test_parse_date_shifts_into_site_timezone() {
        // 23:30 in Berlin on New Year's Eve is still 2024 there, but
        // already 2025 in Tokyo.
        let s = "2024-12-31T23:30:00+01:00";
        assert_eq!(parse_date(s, None), Some(ymd(2024, 12, 31)));
        assert_eq!(
            parse_date(s, Some(chrono_tz::Asia::Tokyo)),
            Some(ymd(2025, 1, 1))
        );
    }
}
