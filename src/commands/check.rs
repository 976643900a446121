//! Check command implementation.
//!
//! Runs one line through the cleaner and classifier and prints what each
//! dialect would contain, which is handy when a source line goes missing.

use anyhow::Result;

use crate::classifier::classify;
use crate::cleaner::clean_line;
use crate::formatter::Dialect;
use crate::merger::is_metadata_line;
use crate::rule::ClassifiedRule;

/// What the merge would do with a single line.
#[derive(Debug, PartialEq, Eq)]
pub enum LineVerdict {
    /// Blank or comment-only after cleaning
    Empty,
    /// Header or config directive, skipped
    Metadata,
    /// Not a recognizable rule
    Rejected,
    Rule(ClassifiedRule),
}

/// Clean and classify `line` the same way a merge does.
pub fn inspect(line: &str, strict: bool) -> (String, LineVerdict) {
    let cleaned = clean_line(line);
    let verdict = if cleaned.is_empty() {
        LineVerdict::Empty
    } else if is_metadata_line(&cleaned) {
        LineVerdict::Metadata
    } else {
        match classify(&cleaned, strict) {
            Some(rule) => LineVerdict::Rule(rule),
            None => LineVerdict::Rejected,
        }
    };
    (cleaned, verdict)
}

/// Run the check command
pub fn run(line: &str, strict: bool, policy: &str) -> Result<()> {
    let (cleaned, verdict) = inspect(line, strict);

    println!();
    println!("  Input:     {:?}", line);
    println!("  Cleaned:   {:?}", cleaned);

    match verdict {
        LineVerdict::Empty => println!("  Result:    skipped (empty or comment)"),
        LineVerdict::Metadata => println!("  Result:    skipped (metadata line)"),
        LineVerdict::Rejected => println!("  Result:    REJECTED"),
        LineVerdict::Rule(rule) => {
            println!("  Kind:      {} ({} task)", rule.kind, rule.kind.family());
            for dialect in Dialect::ALL {
                println!("  {:<10} {}", format!("{}:", dialect), dialect.render(&rule, policy));
            }
        }
    }
    println!();

    Ok(())
}
