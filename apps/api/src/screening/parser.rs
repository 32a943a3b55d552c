//! Best-effort extraction of a question list from free-form completion text.
//!
//! Recognised numbering: `1. `, `1) `, `1 - `, optionally after a `-`/`*` bullet.
//! Anything else (multi-line questions, other numbering styles) is kept or dropped
//! line by line as-is.

/// Upper bound on questions kept from one completion.
pub const MAX_QUESTIONS: usize = 15;

/// Source lines shorter than this are treated as noise.
const MIN_LINE_CHARS: usize = 10;

const NUMBER_SEPARATORS: [&str; 3] = [". ", ") ", " - "];

pub fn parse_questions(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.chars().count() >= MIN_LINE_CHARS)
        .map(clean_line)
        .filter(|question| !question.is_empty())
        .take(MAX_QUESTIONS)
        .collect()
}

/// Strips a leading bullet, then the first numeric prefix found.
fn clean_line(line: &str) -> String {
    let cleaned = line
        .trim_start_matches(|c: char| matches!(c, '-' | '*' | ' '))
        .trim();

    for sep in NUMBER_SEPARATORS {
        if let Some((prefix, rest)) = cleaned.split_once(sep) {
            if !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_digit()) {
                return rest.trim().to_string();
            }
        }
    }

    cleaned.to_string()
}
