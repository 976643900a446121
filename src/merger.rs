//! Multi-source merge with specificity-aware deduplication.
//!
//! Every line of every source is cleaned, classified and folded into a
//! [`RuleTable`]. Order matters: consumers match rules top to bottom, so the
//! table position of a value is its runtime precedence.
//!
//! Merge rules for a value already in the table:
//! - exact, then suffix: the suffix rule replaces it and moves to the end
//! - suffix, then exact: the exact rule is ignored
//! - same kind twice: the first position is kept

use serde::Serialize;
use std::collections::HashMap;

use crate::classifier::classify;
use crate::cleaner::clean_line;
use crate::rule::{ClassifiedRule, RuleFamily, RuleKind};
use crate::task::TaskSpec;

/// Maximum number of rejected lines kept as samples in [`MergeStats`]
pub const REJECTED_SAMPLE_LIMIT: usize = 5;

/// Case-insensitive prefixes of metadata lines (YAML headers, SmartDNS config)
const METADATA_PREFIXES: &[&str] = &["payload:", "version:", "address", "#"];

/// What happened to one observed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    /// New value, appended at the end
    Inserted,
    /// Exact entry replaced by a suffix entry at the end
    Widened,
    /// Value already covered by an equal or broader entry
    Ignored,
    /// Kind does not belong to the table's family
    OutOfFamily,
}

/// Insertion-ordered rule set keyed by value.
///
/// Removed entries leave a tombstone so that re-inserting a value lands at
/// the logical end without shifting the other entries.
#[derive(Debug, Clone)]
pub struct RuleTable {
    family: RuleFamily,
    slots: Vec<Option<ClassifiedRule>>,
    index: HashMap<String, usize>,
}

impl RuleTable {
    pub fn new(family: RuleFamily) -> Self {
        Self {
            family,
            slots: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn family(&self) -> RuleFamily {
        self.family
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Kind currently stored for `value`.
    pub fn get(&self, value: &str) -> Option<RuleKind> {
        let slot = *self.index.get(value)?;
        self.slots[slot].as_ref().map(|rule| rule.kind)
    }

    /// Entries in precedence order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassifiedRule> {
        self.slots.iter().flatten()
    }

    /// Fold one rule into the table.
    pub fn observe(&mut self, rule: ClassifiedRule) -> MergeAction {
        if rule.kind.family() != self.family {
            return MergeAction::OutOfFamily;
        }

        let Some(&slot) = self.index.get(&rule.value) else {
            self.push(rule);
            return MergeAction::Inserted;
        };

        let existing = self.slots[slot].as_ref().map(|r| r.kind);
        if existing == Some(RuleKind::ExactDomain) && rule.kind == RuleKind::SuffixDomain {
            self.slots[slot] = None;
            self.push(rule);
            return MergeAction::Widened;
        }

        MergeAction::Ignored
    }

    fn push(&mut self, rule: ClassifiedRule) {
        self.index.insert(rule.value.clone(), self.slots.len());
        self.slots.push(Some(rule));
    }
}

/// Counters describing one merge, returned instead of console narration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    /// Sources consumed
    pub sources: usize,
    /// Raw lines read
    pub lines: usize,
    /// Blank, comment and metadata lines
    pub skipped: usize,
    /// Lines the classifier could not express
    pub rejected: usize,
    /// Rules dropped because their kind is outside the task family
    pub filtered: usize,
    /// Rules already covered by an equal or broader entry
    pub duplicates: usize,
    /// Exact entries widened to suffix entries
    pub widened: usize,
    /// Entries in the final table
    pub entries: usize,
    /// First few rejected lines, for diagnostics
    pub rejected_samples: Vec<String>,
}

/// Result of merging all sources of one task.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub table: RuleTable,
    pub stats: MergeStats,
}

/// Streaming merger for one task.
///
/// Feed source texts in declared order, then call [`RuleMerger::finish`].
#[derive(Debug)]
pub struct RuleMerger {
    strict: bool,
    table: RuleTable,
    stats: MergeStats,
}

impl RuleMerger {
    pub fn new(family: RuleFamily, strict: bool) -> Self {
        Self {
            strict,
            table: RuleTable::new(family),
            stats: MergeStats::default(),
        }
    }

    pub fn for_task(task: &TaskSpec) -> Self {
        Self::new(task.family, task.strict)
    }

    /// Merge every line of one source text.
    pub fn feed(&mut self, text: &str) {
        self.stats.sources += 1;

        for raw in text.lines() {
            self.stats.lines += 1;

            let line = clean_line(raw);
            if line.is_empty() || is_metadata_line(&line) {
                self.stats.skipped += 1;
                continue;
            }

            let Some(rule) = classify(&line, self.strict) else {
                self.stats.rejected += 1;
                if self.stats.rejected_samples.len() < REJECTED_SAMPLE_LIMIT {
                    self.stats.rejected_samples.push(line);
                }
                continue;
            };

            match self.table.observe(rule) {
                MergeAction::Inserted => {}
                MergeAction::Widened => self.stats.widened += 1,
                MergeAction::Ignored => self.stats.duplicates += 1,
                MergeAction::OutOfFamily => self.stats.filtered += 1,
            }
        }
    }

    pub fn finish(mut self) -> MergeOutcome {
        self.stats.entries = self.table.len();
        MergeOutcome {
            table: self.table,
            stats: self.stats,
        }
    }
}

/// Merge all source texts of a task, in order.
pub fn merge_sources<S: AsRef<str>>(task: &TaskSpec, sources: &[S]) -> MergeOutcome {
    let mut merger = RuleMerger::for_task(task);
    for source in sources {
        merger.feed(source.as_ref());
    }
    merger.finish()
}

/// Whether a cleaned line is a list header or config directive rather than a rule.
pub fn is_metadata_line(line: &str) -> bool {
    METADATA_PREFIXES.iter().any(|prefix| {
        line.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain_task(strict: bool) -> TaskSpec {
        TaskSpec::new("test", "Proxy", RuleFamily::Domain, strict, vec![])
    }

    fn ip_task() -> TaskSpec {
        TaskSpec::new("test", "Proxy", RuleFamily::Ip, false, vec![])
    }

    fn entries(table: &RuleTable) -> Vec<(RuleKind, &str)> {
        table.iter().map(|r| (r.kind, r.value.as_str())).collect()
    }

    #[test]
    fn test_widen_moves_to_end() {
        let a = "DOMAIN,a.com\nDOMAIN,b.com";
        let b = "DOMAIN-SUFFIX,c.com\nDOMAIN-SUFFIX,a.com\nDOMAIN-SUFFIX,d.com";
        let outcome = merge_sources(&domain_task(true), &[a, b]);

        assert_eq!(
            entries(&outcome.table),
            vec![
                (RuleKind::ExactDomain, "b.com"),
                (RuleKind::SuffixDomain, "c.com"),
                (RuleKind::SuffixDomain, "a.com"),
                (RuleKind::SuffixDomain, "d.com"),
            ]
        );
        assert_eq!(outcome.stats.widened, 1);
        assert_eq!(outcome.stats.entries, 4);
    }

    #[test]
    fn test_narrower_loses() {
        let a = "+.a.com\nb.com";
        let b = "DOMAIN,a.com";
        let outcome = merge_sources(&domain_task(true), &[a, b]);

        assert_eq!(
            entries(&outcome.table),
            vec![
                (RuleKind::SuffixDomain, "a.com"),
                (RuleKind::ExactDomain, "b.com"),
            ]
        );
        assert_eq!(outcome.stats.duplicates, 1);
        assert_eq!(outcome.stats.widened, 0);
    }

    #[test]
    fn test_same_kind_keeps_first_position() {
        let a = "a.com\nb.com";
        let b = "c.com\na.com";
        let outcome = merge_sources(&domain_task(false), &[a, b]);

        assert_eq!(
            entries(&outcome.table),
            vec![
                (RuleKind::SuffixDomain, "a.com"),
                (RuleKind::SuffixDomain, "b.com"),
                (RuleKind::SuffixDomain, "c.com"),
            ]
        );
        assert_eq!(outcome.stats.duplicates, 1);
    }

    #[test]
    fn test_widen_within_single_source() {
        let outcome = merge_sources(&domain_task(true), &["a.com\nb.com\n+.a.com"]);
        assert_eq!(
            entries(&outcome.table),
            vec![
                (RuleKind::ExactDomain, "b.com"),
                (RuleKind::SuffixDomain, "a.com"),
            ]
        );
    }

    #[test]
    fn test_family_filter_domain() {
        let text = "1.1.1.1\nexample.com\nIP-CIDR6,2001:db8::/32";
        let outcome = merge_sources(&domain_task(false), &[text]);

        assert_eq!(
            entries(&outcome.table),
            vec![(RuleKind::SuffixDomain, "example.com")]
        );
        assert_eq!(outcome.stats.filtered, 2);
    }

    #[test]
    fn test_family_filter_ip() {
        let text = "10.0.0.0/8\nexample.com\nIP-CIDR6,2001:db8::/32,no-resolve\n10.0.0.1/8";
        let outcome = merge_sources(&ip_task(), &[text]);

        assert_eq!(
            entries(&outcome.table),
            vec![
                (RuleKind::Ipv4Cidr, "10.0.0.0/8"),
                (RuleKind::Ipv6Cidr, "2001:db8::/32"),
            ]
        );
        assert_eq!(outcome.stats.filtered, 1);
        assert_eq!(outcome.stats.duplicates, 1);
    }

    #[test]
    fn test_skips_headers_and_comments() {
        let text = "payload:\n  - '+.example.com'\n# comment\nVersion: 2\n! adguard\n\naddress /x.com/#";
        let outcome = merge_sources(&domain_task(true), &[text]);

        assert_eq!(
            entries(&outcome.table),
            vec![(RuleKind::SuffixDomain, "example.com")]
        );
        assert_eq!(outcome.stats.lines, 7);
        assert_eq!(outcome.stats.skipped, 6);
        assert_eq!(outcome.stats.rejected, 0);
    }

    #[test]
    fn test_rejected_samples_bounded() {
        let text = (0..10)
            .map(|i| format!("USER-AGENT,agent{}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let outcome = merge_sources(&domain_task(false), &[text]);

        assert!(outcome.table.is_empty());
        assert_eq!(outcome.stats.rejected, 10);
        assert_eq!(outcome.stats.rejected_samples.len(), REJECTED_SAMPLE_LIMIT);
        assert_eq!(outcome.stats.rejected_samples[0], "USER-AGENT,agent0");
    }

    #[test]
    fn test_exemptions_dropped() {
        let text = "||ads.example.com^\n@@||ok.example.com^\n@@example.org";
        let outcome = merge_sources(&domain_task(false), &[text]);
        assert_eq!(
            entries(&outcome.table),
            vec![(RuleKind::SuffixDomain, "ads.example.com")]
        );
    }

    #[test]
    fn test_cosmetic_rules_cut_to_domain() {
        // The cleaner cuts at the first '#', so element hiding rules keep
        // only their domain part and never reach the classifier whole
        let text = "example.com##.banner\nexample.org#@#.ad\n##.sidebar";
        let outcome = merge_sources(&domain_task(true), &[text]);
        assert_eq!(
            entries(&outcome.table),
            vec![
                (RuleKind::ExactDomain, "example.com"),
                (RuleKind::ExactDomain, "example.org"),
            ]
        );
        assert_eq!(outcome.stats.rejected, 0);
        assert_eq!(outcome.stats.skipped, 1);
    }

    #[test]
    fn test_table_observe_actions() {
        let mut table = RuleTable::new(RuleFamily::Domain);
        let exact = ClassifiedRule::new(RuleKind::ExactDomain, "a.com");
        let suffix = ClassifiedRule::new(RuleKind::SuffixDomain, "a.com");

        assert_eq!(table.observe(exact.clone()), MergeAction::Inserted);
        assert_eq!(table.observe(exact.clone()), MergeAction::Ignored);
        assert_eq!(table.observe(suffix.clone()), MergeAction::Widened);
        assert_eq!(table.observe(exact), MergeAction::Ignored);
        assert_eq!(table.observe(suffix), MergeAction::Ignored);
        assert_eq!(
            table.observe(ClassifiedRule::new(RuleKind::Ipv4Cidr, "1.1.1.1/32")),
            MergeAction::OutOfFamily
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("a.com"), Some(RuleKind::SuffixDomain));
        assert_eq!(table.get("b.com"), None);
    }

    #[test]
    fn test_empty_sources() {
        let outcome = merge_sources::<&str>(&domain_task(true), &[]);
        assert!(outcome.table.is_empty());
        assert_eq!(outcome.stats, MergeStats::default());
    }

    #[test]
    fn test_is_metadata_line() {
        assert!(is_metadata_line("payload:"));
        assert!(is_metadata_line("PAYLOAD:"));
        assert!(is_metadata_line("address=/x.com/0.0.0.0"));
        assert!(!is_metadata_line("example.com"));
        assert!(!is_metadata_line("pay"));
    }
}
