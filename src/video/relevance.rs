use serde::{Deserialize, Serialize};

use super::CandidateVideo;

/// Terms that mark a video as educational
pub const DEFAULT_ALLOW_TERMS: &[&str] = &[
    "tutorial",
    "course",
    "lesson",
    "lecture",
    "explained",
    "learn",
    "introduction",
    "guide",
    "how to",
    "overview",
    "crash course",
];

/// Entertainment / non-educational markers. Any hit rejects the video outright.
pub const DEFAULT_BAN_TERMS: &[&str] = &[
    "funny",
    "shorts",
    "reaction",
    "music",
    "meme",
    "song",
    "asmr",
    "review (unboxing)",
];

/// Keyword allow/deny classifier over a candidate's title and description
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelevanceFilter {
    allow_terms: Vec<String>,
    ban_terms: Vec<String>,
}

impl RelevanceFilter {
    /// Build a filter from custom term lists. Terms are case-folded once here.
    pub fn new<A, B>(allow_terms: A, ban_terms: B) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        B: IntoIterator,
        B::Item: AsRef<str>,
    {
        let fold = |t: &str| t.trim().to_lowercase();
        Self {
            allow_terms: allow_terms
                .into_iter()
                .map(|t| fold(t.as_ref()))
                .filter(|t| !t.is_empty())
                .collect(),
            ban_terms: ban_terms
                .into_iter()
                .map(|t| fold(t.as_ref()))
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// A candidate is relevant when no ban term appears and at least one allow term does.
    /// No signal either way counts as irrelevant.
    pub fn is_relevant(&self, video: &CandidateVideo) -> bool {
        let text = format!(
            "{} {}",
            video.title.as_deref().unwrap_or(""),
            video.description.as_deref().unwrap_or("")
        )
        .to_lowercase();

        if self.ban_terms.iter().any(|b| text.contains(b.as_str())) {
            return false;
        }
        self.allow_terms.iter().any(|k| text.contains(k.as_str()))
    }

    pub fn allow_terms(&self) -> &[String] {
        &self.allow_terms
    }

    pub fn ban_terms(&self) -> &[String] {
        &self.ban_terms
    }
}

impl Default for RelevanceFilter {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOW_TERMS, DEFAULT_BAN_TERMS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(title: &str, description: &str) -> CandidateVideo {
        CandidateVideo::new("id")
            .with_title(title)
            .with_description(description)
    }

    #[test]
    fn test_allow_term_in_title() {
        let filter = RelevanceFilter::default();
        assert!(filter.is_relevant(&video("Graph Theory Lecture 3", "")));
    }

    #[test]
    fn test_allow_term_in_description_only() {
        let filter = RelevanceFilter::default();
        assert!(filter.is_relevant(&video("Dijkstra", "A step by step Tutorial")));
    }

    #[test]
    fn test_ban_term_beats_allow_terms() {
        let filter = RelevanceFilter::default();
        assert!(!filter.is_relevant(&video("Calculus tutorial #shorts", "full course")));
        assert!(!filter.is_relevant(&video("Learn chemistry", "reaction video")));
    }

    #[test]
    fn test_no_signal_is_irrelevant() {
        let filter = RelevanceFilter::default();
        assert!(!filter.is_relevant(&video("Neural networks", "my thoughts")));
        assert!(!filter.is_relevant(&CandidateVideo::new("bare")));
    }

    #[test]
    fn test_custom_terms_are_case_folded() {
        let filter = RelevanceFilter::new(["WORKSHOP"], ["Vlog"]);
        assert!(filter.is_relevant(&video("Rust workshop", "")));
        assert!(!filter.is_relevant(&video("Rust workshop vlog", "")));
        assert!(!filter.is_relevant(&video("Rust tutorial", "")));
    }
}
