//! Legacy line splitting
//!
//! The oldest era caps team prefix and suffix at sixteen characters each, so
//! a sidebar line longer than sixteen spreads across both, for thirty-two in
//! total. Styling markers active at the end of the prefix must be replayed
//! at the start of the suffix or the second half renders unstyled.

use scorebar_core::{last_colors, ScorebarError, ScorebarResult, COLOR_CHAR};

/// Splits a line into team prefix and suffix for the oldest era.
///
/// Lines up to sixteen characters fit in the prefix alone. Longer lines
/// split at sixteen; a control marker sitting on the boundary pulls the
/// split and the overall budget back one character so the marker pair is
/// never chopped. Carried-over markers count against the budget, so a full
/// thirty-two character styled line loses its tail.
pub fn split_line(line: &str) -> ScorebarResult<(String, String)> {
    let chars: Vec<char> = line.chars().collect();

    if chars.len() > 32 {
        return Err(ScorebarError::LineTooLong { len: chars.len() });
    }
    if chars.len() <= 16 {
        return Ok((line.to_string(), String::new()));
    }

    let mut max_length = 32;
    let mut mid_point = 16;

    if chars[mid_point - 1] == COLOR_CHAR {
        mid_point -= 1;
        max_length -= 1;
    }

    let prefix: String = chars[..mid_point].iter().collect();
    let carried = last_colors(&prefix);
    max_length -= carried.chars().count();

    let end = chars.len().min(max_length);
    let mut suffix = carried;
    suffix.extend(&chars[mid_point..end]);

    Ok((prefix, suffix))
}
