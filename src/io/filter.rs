// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Topic selection.
//!
//! A [`TopicFilter`] is resolved against a catalog's topic list before
//! reading, so the reader itself only ever sees concrete topic names.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::core::{BagError, Result};

/// Which recorded topics to read.
#[derive(Clone, Default)]
pub enum TopicFilter {
    /// Every topic in the catalog
    #[default]
    All,
    /// Exactly these topics
    Include(Vec<String>),
    /// Every topic except these
    Exclude(Vec<String>),
    /// Topics the pattern matches
    RegexInclude(Arc<Regex>),
    /// Topics the pattern does not match
    RegexExclude(Arc<Regex>),
}

impl fmt::Debug for TopicFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Include(names) => write!(f, "Include({names:?})"),
            Self::Exclude(names) => write!(f, "Exclude({names:?})"),
            Self::RegexInclude(pattern) => write!(f, "RegexInclude({:?})", pattern.as_str()),
            Self::RegexExclude(pattern) => write!(f, "RegexExclude({:?})", pattern.as_str()),
        }
    }
}

impl TopicFilter {
    /// Whether `topic` passes the filter.
    pub fn should_include(&self, topic: &str) -> bool {
        let listed = |names: &[String]| names.iter().any(|name| name == topic);
        match self {
            Self::All => true,
            Self::Include(names) => listed(names),
            Self::Exclude(names) => !listed(names),
            Self::RegexInclude(pattern) => pattern.is_match(topic),
            Self::RegexExclude(pattern) => !pattern.is_match(topic),
        }
    }

    /// Keep the topics this filter selects, preserving their order.
    pub fn apply<S: AsRef<str>>(&self, topics: &[S]) -> Vec<String> {
        topics
            .iter()
            .map(AsRef::as_ref)
            .filter(|t| self.should_include(t))
            .map(str::to_string)
            .collect()
    }

    pub fn include(topics: Vec<String>) -> Self {
        Self::Include(topics)
    }

    pub fn exclude(topics: Vec<String>) -> Self {
        Self::Exclude(topics)
    }

    /// Select topics matching `pattern`. Fails with `Config` on a bad pattern.
    pub fn regex_include(pattern: &str) -> Result<Self> {
        compile(pattern).map(Self::RegexInclude)
    }

    /// Drop topics matching `pattern`. Fails with `Config` on a bad pattern.
    pub fn regex_exclude(pattern: &str) -> Result<Self> {
        compile(pattern).map(Self::RegexExclude)
    }

    /// Build a filter from command line style options.
    ///
    /// Explicit topics win over a pattern; neither selects everything.
    pub fn from_options(topics: &[String], pattern: Option<&str>) -> Result<Self> {
        match (topics.is_empty(), pattern) {
            (false, _) => Ok(Self::include(topics.to_vec())),
            (true, Some(pattern)) => Self::regex_include(pattern),
            (true, None) => Ok(Self::All),
        }
    }
}

fn compile(pattern: &str) -> Result<Arc<Regex>> {
    Regex::new(pattern)
        .map(Arc::new)
        .map_err(|e| BagError::config(format!("invalid topic pattern '{pattern}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDED: [&str; 5] = ["/odom", "/tf", "/tf_static", "/velodyne/points", "/zed/left"];

    #[test]
    fn test_all_selects_catalog() {
        assert_eq!(TopicFilter::default().apply(&RECORDED).len(), RECORDED.len());
    }

    #[test]
    fn test_named_topics() {
        let only = TopicFilter::include(vec!["/tf".into(), "/not_recorded".into()]);
        assert_eq!(only.apply(&RECORDED), vec!["/tf"]);

        let without = TopicFilter::exclude(vec!["/tf".into()]);
        assert!(without.should_include("/tf_static"));
        assert!(!without.should_include("/tf"));
    }

    #[test]
    fn test_pattern_topics() {
        let transforms = TopicFilter::regex_include("^/tf").unwrap();
        assert_eq!(transforms.apply(&RECORDED), vec!["/tf", "/tf_static"]);

        let sensors = TopicFilter::regex_exclude("^/(tf|odom)").unwrap();
        assert_eq!(sensors.apply(&RECORDED), vec!["/velodyne/points", "/zed/left"]);
    }

    #[test]
    fn test_bad_pattern_is_config_error() {
        let err = TopicFilter::regex_include("/zed/[left").unwrap_err();
        assert!(matches!(err, BagError::Config { .. }));
    }

    #[test]
    fn test_apply_keeps_order() {
        let unsorted = ["/zed/left", "/odom", "/tf"];
        let filter = TopicFilter::exclude(vec!["/odom".into()]);
        assert_eq!(filter.apply(&unsorted), vec!["/zed/left", "/tf"]);
    }

    #[test]
    fn test_from_options() {
        let topics = vec!["/odom".to_string()];
        let filter = TopicFilter::from_options(&topics, Some("^/tf")).unwrap();
        assert_eq!(filter.apply(&RECORDED), vec!["/odom"]);

        let filter = TopicFilter::from_options(&[], Some("^/tf")).unwrap();
        assert!(matches!(filter, TopicFilter::RegexInclude(_)));

        let filter = TopicFilter::from_options(&[], None).unwrap();
        assert!(matches!(filter, TopicFilter::All));
        assert_eq!(format!("{filter:?}"), "All");
    }
}
