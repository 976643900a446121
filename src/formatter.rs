//! Render a merged [`RuleTable`] into the three output dialects.
//!
//! | kind          | qualified                      | classic                    | bare      |
//! |---------------|--------------------------------|----------------------------|-----------|
//! | IPv4 CIDR     | `IP-CIDR, v, policy`           | `IP-CIDR,v,no-resolve`     | `v`       |
//! | IPv6 CIDR     | `IP6-CIDR, v, policy`          | `IP-CIDR6,v,no-resolve`    | `v`       |
//! | domain suffix | `HOST-SUFFIX, v, policy`       | `DOMAIN-SUFFIX,v`          | `+.v`     |
//! | exact domain  | `HOST, v, policy`              | `DOMAIN,v`                 | `v`       |

use serde::Serialize;
use std::fmt;

use crate::merger::RuleTable;
use crate::rule::{ClassifiedRule, RuleKind};

/// Output dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Policy-qualified lines (QuantumultX filter lists)
    Qualified,
    /// Classic keyword lines without policy (Surge / Clash classical)
    Classic,
    /// Bare values with `+.` suffix convention (Clash domain / ipcidr behavior)
    Bare,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Qualified, Dialect::Classic, Dialect::Bare];

    /// Directory segment used in output paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Qualified => "qualified",
            Dialect::Classic => "classic",
            Dialect::Bare => "bare",
        }
    }

    /// Render one rule.
    pub fn render(&self, rule: &ClassifiedRule, policy: &str) -> String {
        let value = &rule.value;
        match (self, rule.kind) {
            (Dialect::Qualified, RuleKind::Ipv4Cidr) => format!("IP-CIDR, {value}, {policy}"),
            (Dialect::Qualified, RuleKind::Ipv6Cidr) => format!("IP6-CIDR, {value}, {policy}"),
            (Dialect::Qualified, RuleKind::SuffixDomain) => {
                format!("HOST-SUFFIX, {value}, {policy}")
            }
            (Dialect::Qualified, RuleKind::ExactDomain) => format!("HOST, {value}, {policy}"),

            (Dialect::Classic, RuleKind::Ipv4Cidr) => format!("IP-CIDR,{value},no-resolve"),
            (Dialect::Classic, RuleKind::Ipv6Cidr) => format!("IP-CIDR6,{value},no-resolve"),
            (Dialect::Classic, RuleKind::SuffixDomain) => format!("DOMAIN-SUFFIX,{value}"),
            (Dialect::Classic, RuleKind::ExactDomain) => format!("DOMAIN,{value}"),

            (Dialect::Bare, RuleKind::SuffixDomain) => format!("+.{value}"),
            (Dialect::Bare, _) => value.clone(),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Three parallel line lists sharing the table's order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedOutput {
    pub qualified: Vec<String>,
    pub classic: Vec<String>,
    pub bare: Vec<String>,
}

impl RenderedOutput {
    pub fn lines(&self, dialect: Dialect) -> &[String] {
        match dialect {
            Dialect::Qualified => &self.qualified,
            Dialect::Classic => &self.classic,
            Dialect::Bare => &self.bare,
        }
    }

    pub fn len(&self) -> usize {
        self.bare.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bare.is_empty()
    }
}

/// Render every entry of `table`, in order, into all three dialects.
pub fn render(table: &RuleTable, policy: &str) -> RenderedOutput {
    let mut output = RenderedOutput {
        qualified: Vec::with_capacity(table.len()),
        classic: Vec::with_capacity(table.len()),
        bare: Vec::with_capacity(table.len()),
    };

    for rule in table.iter() {
        output.qualified.push(Dialect::Qualified.render(rule, policy));
        output.classic.push(Dialect::Classic.render(rule, policy));
        output.bare.push(Dialect::Bare.render(rule, policy));
    }

    output
}
