//! Map one cleaned line onto the closed rule vocabulary.
//!
//! Recognized inputs:
//! - AdGuard block rules (`||example.com^`)
//! - SmartDNS / Dnsmasq `address /example.com/...` lines
//! - Clash / Surge / Quantumult keyword rules (`DOMAIN-SUFFIX,example.com`)
//! - Bare IP addresses and CIDRs
//! - Geosite style domains (`+.example.com`, `.example.com`, `example.com`)
//!
//! Exemption rules (`@@`), cosmetic filters (`##`, `#@#`), regex/wildcard
//! patterns and unsupported keyword families are rejected.

use ipnet::IpNet;
use std::net::IpAddr;

use crate::rule::{ClassifiedRule, RuleKind};

/// Characters that mark a pattern dialect we cannot express.
const UNSUPPORTED_CHARS: &[char] = &['/', '*', '=', '|', ':', '(', ')', '[', ']'];

/// Classify a cleaned line.
///
/// `strict` decides how a bare `example.com` is read: exact match when set,
/// suffix match otherwise.
pub fn classify(line: &str, strict: bool) -> Option<ClassifiedRule> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if line.starts_with("@@") || line.contains("##") || line.contains("#@#") {
        return None;
    }

    let token = if let Some(rest) = line.strip_prefix("||") {
        rest.split('^').next().unwrap_or_default().trim()
    } else if let Some(value) = address_value(line) {
        value
    } else {
        line
    };

    if token.contains(',') {
        return classify_keyword_rule(token);
    }

    if let Some(net) = parse_network(token) {
        return Some(cidr_rule(net));
    }

    if token.contains(UNSUPPORTED_CHARS) {
        return None;
    }

    if let Some(suffix) = token.strip_prefix("+.").or_else(|| token.strip_prefix('.')) {
        return non_empty(suffix).map(|s| ClassifiedRule::new(RuleKind::SuffixDomain, s));
    }

    if !token.contains(' ') && token.contains('.') {
        let kind = if strict {
            RuleKind::ExactDomain
        } else {
            RuleKind::SuffixDomain
        };
        return Some(ClassifiedRule::new(kind, token));
    }

    None
}

/// Extract `example.com` from `address /example.com/0.0.0.0` style lines.
fn address_value(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("address")?;
    let rest = rest.strip_prefix('=').unwrap_or(rest);
    if !rest.contains('/') {
        return None;
    }
    rest.split('/').nth(1).map(str::trim)
}

/// Classify `PREFIX,VALUE[,...]` keyword rules.
fn classify_keyword_rule(token: &str) -> Option<ClassifiedRule> {
    let (prefix, remainder) = token.split_once(',')?;
    let prefix = prefix.trim().to_uppercase();
    let value = remainder.split(',').next().unwrap_or_default();
    let value = non_empty(strip_no_resolve(value))?;

    if prefix.contains("IP") && prefix.contains("CIDR") {
        // IP6-CIDR (Quantumult) and IP-CIDR6 (Clash/Surge) are both IPv6
        let kind = if prefix.contains('6') {
            RuleKind::Ipv6Cidr
        } else {
            RuleKind::Ipv4Cidr
        };
        let net = parse_network(value)?;
        return Some(ClassifiedRule::new(kind, net.to_string()));
    }

    if prefix.contains("SUFFIX") {
        return Some(ClassifiedRule::new(RuleKind::SuffixDomain, value));
    }

    if prefix.contains("DOMAIN") || prefix.contains("HOST") {
        return Some(ClassifiedRule::new(RuleKind::ExactDomain, value));
    }

    None
}

/// Remove a trailing case-insensitive `no-resolve` marker.
fn strip_no_resolve(value: &str) -> &str {
    const MARKER: &str = "no-resolve";

    let value = value.trim();
    let split = value.len().saturating_sub(MARKER.len());
    match (value.get(..split), value.get(split..)) {
        (Some(head), Some(tail)) if tail.eq_ignore_ascii_case(MARKER) => head.trim(),
        _ => value,
    }
}

/// Parse a bare address or CIDR and mask off host bits.
fn parse_network(token: &str) -> Option<IpNet> {
    if token.contains('/') {
        token.parse::<IpNet>().ok().map(|net| net.trunc())
    } else {
        token.parse::<IpAddr>().ok().map(IpNet::from)
    }
}

fn cidr_rule(net: IpNet) -> ClassifiedRule {
    let kind = match net {
        IpNet::V4(_) => RuleKind::Ipv4Cidr,
        IpNet::V6(_) => RuleKind::Ipv6Cidr,
    };
    ClassifiedRule::new(kind, net.to_string())
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}
