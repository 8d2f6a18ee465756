//! Archive grouping - buckets posts by publication year
//!
//! Grouping is a single pass over the posts: the year of each post's date
//! selects a bucket in an insertion-ordered map, so posts inside a bucket keep
//! the order they were given in. [`ArchiveOrder`] then decides how the buckets
//! themselves are emitted.

use chrono::Datelike;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::content::Post;

/// Order in which year groups are emitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveOrder {
    /// Newest year first, regardless of input order
    #[default]
    Descending,
    /// Years in the order they first appear in the input
    FirstSeen,
}

/// Posts sharing a publication year
#[derive(Debug, Clone, PartialEq)]
pub struct YearGroup<'a> {
    /// Calendar year of every post in the group
    pub year: i32,
    /// The year's posts, in input order
    pub posts: Vec<&'a Post>,
}

impl YearGroup<'_> {
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Group posts by the calendar year of their date
pub fn group_by_year(posts: &[Post], order: ArchiveOrder) -> Vec<YearGroup<'_>> {
    let mut years: IndexMap<i32, Vec<&Post>> = IndexMap::new();
    for post in posts {
        years.entry(post.date.year()).or_default().push(post);
    }

    if order == ArchiveOrder::Descending {
        years.sort_by(|a, _, b, _| b.cmp(a));
    }

    let groups: Vec<YearGroup> = years
        .into_iter()
        .map(|(year, posts)| YearGroup { year, posts })
        .collect();

    tracing::debug!(
        "Grouped {} posts into {} years ({:?})",
        posts.len(),
        groups.len(),
        order
    );

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn post(title: &str, y: i32, m: u32, d: u32) -> Post {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        Post::new(title.to_string(), date, format!("/{}.html", title))
    }

    fn titles(group: &YearGroup) -> Vec<String> {
        group.posts.iter().map(|p| p.title.clone()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(group_by_year(&[], ArchiveOrder::Descending).is_empty());
        assert!(group_by_year(&[], ArchiveOrder::FirstSeen).is_empty());
    }

    #[test]
    fn test_groups_newest_year_first() {
        let posts = vec![
            post("feb", 2025, 2, 14),
            post("dec", 2025, 12, 30),
            post("jan", 2026, 1, 22),
        ];

        let groups = group_by_year(&posts, ArchiveOrder::Descending);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].year, 2026);
        assert_eq!(titles(&groups[0]), vec!["jan"]);
        assert_eq!(groups[1].year, 2025);
        assert_eq!(titles(&groups[1]), vec!["feb", "dec"]);
    }

    #[test]
    fn test_first_seen_keeps_input_order() {
        let posts = vec![
            post("a", 2023, 5, 1),
            post("b", 2025, 1, 1),
            post("c", 2023, 1, 1),
            post("d", 2024, 7, 4),
        ];

        let groups = group_by_year(&posts, ArchiveOrder::FirstSeen);
        let years: Vec<i32> = groups.iter().map(|g| g.year).collect();
        assert_eq!(years, vec![2023, 2025, 2024]);
        assert_eq!(titles(&groups[0]), vec!["a", "c"]);

        let groups = group_by_year(&posts, ArchiveOrder::Descending);
        let years: Vec<i32> = groups.iter().map(|g| g.year).collect();
        assert_eq!(years, vec![2025, 2024, 2023]);
        // Posts are not re-sorted inside a year
        assert_eq!(titles(&groups[2]), vec!["a", "c"]);
    }

    #[test]
    fn test_every_post_in_exactly_one_group() {
        let posts: Vec<Post> = (0..40)
            .map(|i| post(&format!("p{}", i), 2000 + (i * 7 % 5), 1 + (i % 12) as u32, 1))
            .collect();

        for order in [ArchiveOrder::Descending, ArchiveOrder::FirstSeen] {
            let groups = group_by_year(&posts, order);

            let total: usize = groups.iter().map(YearGroup::len).sum();
            assert_eq!(total, posts.len());

            for p in &posts {
                let owners = groups
                    .iter()
                    .filter(|g| g.posts.iter().any(|q| std::ptr::eq(*q, p)))
                    .count();
                assert_eq!(owners, 1, "{} should be in one group", p.title);
            }

            let years: HashSet<i32> = groups.iter().map(|g| g.year).collect();
            assert_eq!(years.len(), groups.len(), "year labels are unique");

            for group in &groups {
                assert!(!group.is_empty());
                assert!(group.posts.iter().all(|p| p.date.year() == group.year));
            }
        }
    }

    #[test]
    fn test_grouping_is_idempotent() {
        let posts = vec![
            post("x", 2019, 3, 3),
            post("y", 2021, 3, 3),
            post("z", 2019, 9, 9),
        ];
        assert_eq!(
            group_by_year(&posts, ArchiveOrder::Descending),
            group_by_year(&posts, ArchiveOrder::Descending)
        );
    }

    #[test]
    fn test_order_from_config_value() {
        let order: ArchiveOrder = serde_yaml::from_str("first_seen").unwrap();
        assert_eq!(order, ArchiveOrder::FirstSeen);
        let order: ArchiveOrder = serde_yaml::from_str("descending").unwrap();
        assert_eq!(order, ArchiveOrder::Descending);
    }
}
