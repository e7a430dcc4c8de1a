use serde_json::Value;

use super::CandidateVideo;

/// Popularity score used purely as a sort key.
///
/// Reads `statistics.likeCount` first and falls back to the top-level
/// `likeCount`. Anything absent, negative or non-numeric scores 0.
pub fn engagement_score(video: &CandidateVideo) -> u64 {
    let nested = video.statistics.get("likeCount").filter(|v| !v.is_null());
    let raw = nested.or(video.like_count.as_ref());
    raw.map(like_count_value).unwrap_or(0)
}

fn like_count_value(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f as u64)
            })
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}
