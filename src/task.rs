//! Validated, immutable description of one rule set to build.

use serde::Serialize;

use crate::rule::RuleFamily;

/// One logical rule set: its sources are merged, in order, into three files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSpec {
    /// Unique identifier, also the output file stem
    pub name: String,
    /// Policy label embedded in the qualified dialect
    pub policy: String,
    /// Rule family retained by the merge
    pub family: RuleFamily,
    /// Read bare domains as exact matches instead of suffix matches
    pub strict: bool,
    /// Source addresses, in merge order
    pub sources: Vec<String>,
}

impl TaskSpec {
    pub fn new(
        name: impl Into<String>,
        policy: impl Into<String>,
        family: RuleFamily,
        strict: bool,
        sources: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            policy: policy.into(),
            family,
            strict,
            sources,
        }
    }
}
