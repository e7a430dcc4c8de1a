use once_cell::sync::Lazy;
use regex::Regex;

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").expect("duration pattern is valid")
});

/// Decode a compact ISO-8601 duration token (`PT1H2M3S`) into seconds.
///
/// Missing or unparseable tokens decode to 0 so they can never slip past a
/// minimum-length filter.
pub fn decode_duration(token: Option<&str>) -> u64 {
    let token = match token {
        Some(t) if !t.is_empty() => t,
        _ => return 0,
    };

    let captures = match DURATION_RE.captures(token) {
        Some(c) => c,
        None => return 0,
    };

    let field = |idx: usize| -> u64 {
        captures
            .get(idx)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };

    field(1)
        .saturating_mul(3600)
        .saturating_add(field(2).saturating_mul(60))
        .saturating_add(field(3))
}
