use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::Post;

/// Canonical address of a post: `/{year}/{month}/{day}/{slug}/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostLocator {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub slug: String,
}

impl PostLocator {
    pub fn new(year: i32, month: u32, day: u32, slug: impl Into<String>) -> Self {
        Self {
            year,
            month,
            day,
            slug: slug.into(),
        }
    }

    pub fn for_post(post: &Post) -> Self {
        Self::new(
            post.publish_date.year(),
            post.publish_date.month(),
            post.publish_date.day(),
            post.slug.clone(),
        )
    }

    /// The calendar date this locator points at, if it exists.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    pub fn path(&self) -> String {
        format!("/{}/{}/{}/{}/", self.year, self.month, self.day, self.slug)
    }

    /// Resolve a path produced by [`PostLocator::path`] back into a locator.
    pub fn parse(path: &str) -> Option<Self> {
        let mut segments = path.trim_matches('/').split('/');
        let year = segments.next()?.parse().ok()?;
        let month = segments.next()?.parse().ok()?;
        let day = segments.next()?.parse().ok()?;
        let slug = segments.next()?;
        if slug.is_empty() || segments.next().is_some() {
            return None;
        }
        Some(Self::new(year, month, day, slug))
    }
}

impl fmt::Display for PostLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_uses_unpadded_date_parts() {
        let locator = PostLocator::new(2024, 3, 7, "spring-notes");
        assert_eq!(locator.path(), "/2024/3/7/spring-notes/");
    }

    #[test]
    fn parse_round_trips_a_post_path() {
        let post = Post::new(
            uuid::Uuid::new_v4(),
            "Spring notes",
            "spring-notes",
            "body",
            NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
        );
        let locator = PostLocator::parse(&post.absolute_path()).unwrap();
        assert_eq!(locator, PostLocator::for_post(&post));
        assert_eq!(locator.date(), Some(post.publish_date));
    }

    #[test]
    fn parse_rejects_malformed_paths() {
        assert_eq!(PostLocator::parse("/2024/3/spring-notes/"), None);
        assert_eq!(PostLocator::parse("/2024/march/7/spring-notes/"), None);
        assert_eq!(PostLocator::parse("/2024/3/7/spring-notes/extra/"), None);
    }

    #[test]
    fn impossible_dates_have_no_calendar_day() {
        assert_eq!(PostLocator::new(2023, 2, 30, "x").date(), None);
    }
}
