/// Suffixes appended to a topic, in query order. Earlier phrasings are
/// preferred because the orchestrator stops once a topic has enough candidates.
pub const VARIANT_SUFFIXES: &[&str] = &[
    "tutorial",
    "explained",
    "lecture",
    "crash course",
    "for beginners",
    "overview",
    "full course",
];

/// Expand a topic into educational-intent search strings.
///
/// Blank topics produce no variants.
pub fn query_variants(topic: &str) -> Vec<String> {
    let base = topic.trim().to_lowercase();
    if base.is_empty() {
        return Vec::new();
    }

    VARIANT_SUFFIXES
        .iter()
        .map(|suffix| format!("{} {}", base, suffix))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_order() {
        let variants = query_variants("  Neural Networks ");
        assert_eq!(
            variants,
            vec![
                "neural networks tutorial",
                "neural networks explained",
                "neural networks lecture",
                "neural networks crash course",
                "neural networks for beginners",
                "neural networks overview",
                "neural networks full course",
            ]
        );
    }

    #[test]
    fn test_blank_topic() {
        assert!(query_variants("").is_empty());
        assert!(query_variants("   ").is_empty());
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(query_variants("sorting"), query_variants("sorting"));
    }
}
