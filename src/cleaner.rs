//! Per-line cleanup applied before classification.
//!
//! Removes comments (`#`, `//`), filter-list comment lines (`!`), YAML list
//! markers and surrounding quotes. The result is always a fixpoint, so
//! cleaning a cleaned line is a no-op.

const QUOTES: [char; 2] = ['\'', '"'];

/// Clean one raw input line. Returns an empty string for lines that carry
/// no rule.
pub fn clean_line(line: &str) -> String {
    let mut current = strip_comment(line);

    loop {
        let trimmed = current.trim();
        if trimmed.starts_with('!') {
            return String::new();
        }

        let unmarked = trimmed.strip_prefix("- ").unwrap_or(trimmed);
        let unquoted = strip_quotes(unmarked);

        if unquoted == current {
            return unquoted.to_string();
        }
        current = unquoted;
    }
}

/// Truncate at the first `#` or `//`, whichever comes first.
fn strip_comment(line: &str) -> &str {
    let cut = [line.find('#'), line.find("//")]
        .into_iter()
        .flatten()
        .min();

    match cut {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Drop one quote character from each end, independently.
fn strip_quotes(s: &str) -> &str {
    let s = s.strip_prefix(QUOTES).unwrap_or(s);
    s.strip_suffix(QUOTES).unwrap_or(s)
}
