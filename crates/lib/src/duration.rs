//! # ISO-8601 Duration Parsing
//!
//! The video platform reports content length in the ISO-8601 duration
//! grammar (`PT1M30S`, `PT2H`, `P1DT4H`). Parsing is total: any malformed or
//! absent input yields 0 seconds. An unknown duration is represented
//! identically to a true zero-length video; the classifier was trained under
//! that convention, so the ambiguity is preserved rather than surfaced.

/// Parses an ISO-8601 duration string into whole seconds.
///
/// Returns 0 for anything that does not follow the grammar, including the
/// empty string. Fractional second designators are truncated.
pub fn parse_iso8601_duration(text: &str) -> u64 {
    let mut chars = text.trim().chars().peekable();
    if chars.next() != Some('P') {
        return 0;
    }

    let mut total: u64 = 0;
    let mut in_time = false;
    let mut saw_component = false;

    while let Some(&c) = chars.peek() {
        if c == 'T' {
            chars.next();
            in_time = true;
            continue;
        }

        let mut digits = String::new();
        while let Some(&d) = chars.peek() {
            if d.is_ascii_digit() || d == '.' {
                digits.push(d);
                chars.next();
            } else {
                break;
            }
        }
        let Some(designator) = chars.next() else {
            return 0; // trailing number with no designator
        };
        let Ok(value) = digits.parse::<f64>() else {
            return 0;
        };

        let multiplier = match (in_time, designator) {
            (false, 'D') => 86_400,
            (true, 'H') => 3_600,
            (true, 'M') => 60,
            (true, 'S') => 1,
            _ => return 0,
        };
        // Saturate rather than overflow: the cast clamps at u64::MAX, and
        // repeated oversized components must not panic the addition.
        total = total.saturating_add((value * multiplier as f64) as u64);
        saw_component = true;
    }

    // A bare "P" or "PT" carries no components; treat it as unknown.
    if saw_component {
        total
    } else {
        0
    }
}
