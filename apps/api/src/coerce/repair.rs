//! Textual repairs for almost-JSON completions.
//!
//! Models drop commas between sibling objects, arrays, and keys, and cut
//! off mid-object when they hit the token limit. Each repair here patches
//! exactly one of those failure modes. All of them are best-effort string
//! surgery: a repaired candidate must still parse AND validate before the
//! coercer accepts it.
//!
//! Each function returns `Some(new_text)` only when it changed something,
//! so the caller can skip a re-parse for repairs that did not apply.

use once_cell::sync::Lazy;
use regex::Regex;

static OBJECT_GAP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\}\s*\{").expect("hardcoded pattern compiles"));
static ARRAY_GAP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\]\s*\[").expect("hardcoded pattern compiles"));
static KEY_GAP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\}\s*""#).expect("hardcoded pattern compiles"));

/// `}{` → `}, {` — sibling objects missing a separating comma.
pub fn insert_comma_between_objects(text: &str) -> Option<String> {
    if !OBJECT_GAP.is_match(text) {
        return None;
    }
    Some(OBJECT_GAP.replace_all(text, "}, {").into_owned())
}

/// `][` → `], [` — sibling arrays missing a separating comma.
pub fn insert_comma_between_arrays(text: &str) -> Option<String> {
    if !ARRAY_GAP.is_match(text) {
        return None;
    }
    Some(ARRAY_GAP.replace_all(text, "], [").into_owned())
}

/// `}"` → `}, "` — a key following a nested object without a comma.
pub fn insert_comma_before_key(text: &str) -> Option<String> {
    if !KEY_GAP.is_match(text) {
        return None;
    }
    Some(KEY_GAP.replace_all(text, r#"}, ""#).into_owned())
}

/// Closes a completion that was cut off mid-object.
///
/// If the text ends inside a quoted token, the partial token is dropped back
/// to the last comma outside any string; then enough `]`/`}` are appended to
/// balance the brackets still open at that point. Returns `None` when the
/// text is already balanced or too mangled to close (no comma to cut at, or
/// still inside a string after cutting).
pub fn close_truncated(text: &str) -> Option<String> {
    let first = scan(text);
    if first.open.is_empty() && !first.in_string {
        return None;
    }

    let mut repaired = if first.in_string {
        let cut = first.last_comma?;
        if !text[cut + 1..].trim_start().starts_with('"') {
            return None;
        }
        text[..cut].trim_end().to_string()
    } else {
        text.trim_end().trim_end_matches(',').trim_end().to_string()
    };

    let rest = scan(&repaired);
    if rest.in_string {
        return None;
    }
    for closer in rest.open.iter().rev() {
        repaired.push(*closer);
    }

    (repaired != text).then_some(repaired)
}

struct Scan {
    /// Closers for brackets still open at end of text, in opening order.
    open: Vec<char>,
    /// Byte index of the last comma seen outside any string.
    last_comma: Option<usize>,
    in_string: bool,
}

fn scan(text: &str) -> Scan {
    let mut open = Vec::new();
    let mut last_comma = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => open.push('}'),
            '[' => open.push(']'),
            '}' | ']' => {
                open.pop();
            }
            ',' => last_comma = Some(i),
            _ => {}
        }
    }

    Scan {
        open,
        last_comma,
        in_string,
    }
}
