//! The closed rule vocabulary every input line is normalized into.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which rule kinds a task keeps.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RuleFamily {
    Domain,
    Ip,
}

impl RuleFamily {
    /// Directory segment used in output paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleFamily::Domain => "domain",
            RuleFamily::Ip => "ip",
        }
    }
}

impl fmt::Display for RuleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Kind of a normalized rule.
///
/// `ExactDomain` is narrower than `SuffixDomain`. The two CIDR kinds have no
/// specificity relation to each other or to the domain kinds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    ExactDomain,
    SuffixDomain,
    Ipv4Cidr,
    Ipv6Cidr,
}

impl RuleKind {
    pub fn family(&self) -> RuleFamily {
        match self {
            RuleKind::ExactDomain | RuleKind::SuffixDomain => RuleFamily::Domain,
            RuleKind::Ipv4Cidr | RuleKind::Ipv6Cidr => RuleFamily::Ip,
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleKind::ExactDomain => "exact-domain",
            RuleKind::SuffixDomain => "suffix-domain",
            RuleKind::Ipv4Cidr => "ipv4-cidr",
            RuleKind::Ipv6Cidr => "ipv6-cidr",
        };
        f.pad(name)
    }
}

/// A rule in canonical form.
///
/// `value` is a bare domain (no `+.`/`.` marker) for domain kinds and a
/// canonical CIDR string for IP kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedRule {
    pub kind: RuleKind,
    pub value: String,
}

impl ClassifiedRule {
    pub fn new(kind: RuleKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_family() {
        assert_eq!(RuleKind::ExactDomain.family(), RuleFamily::Domain);
        assert_eq!(RuleKind::SuffixDomain.family(), RuleFamily::Domain);
        assert_eq!(RuleKind::Ipv4Cidr.family(), RuleFamily::Ip);
        assert_eq!(RuleKind::Ipv6Cidr.family(), RuleFamily::Ip);
    }

    #[test]
    fn test_family_serde() {
        let family: RuleFamily = serde_yaml::from_str("domain").unwrap();
        assert_eq!(family, RuleFamily::Domain);
        let family: RuleFamily = serde_yaml::from_str("ip").unwrap();
        assert_eq!(family, RuleFamily::Ip);
        assert!(serde_yaml::from_str::<RuleFamily>("geoip").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(RuleFamily::Ip.to_string(), "ip");
        assert_eq!(RuleKind::SuffixDomain.to_string(), "suffix-domain");
    }
}
