//! Centralized validation functions for rulecast.
//!
//! This module provides unified validation for:
//! - Task names (used as output file stems)
//! - Policy labels (embedded in comma separated dialects)
//! - Source URLs

use crate::error::RulecastError;

/// Validate a task name.
///
/// Names become file names, so only ASCII letters, digits and `_ . - @ ! +`
/// are accepted and a leading dot is refused.
///
/// # Examples
/// ```
/// use rulecast::validation::validate_task_name;
/// assert!(validate_task_name("private_domain").is_ok());
/// assert!(validate_task_name("../etc").is_err());
/// assert!(validate_task_name("").is_err());
/// ```
pub fn validate_task_name(name: &str) -> Result<(), RulecastError> {
    if name.is_empty() {
        return Err(RulecastError::Config("task name must not be empty".into()));
    }
    if name.starts_with('.') {
        return Err(RulecastError::Config(format!(
            "task name '{}' must not start with '.'",
            name
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "_.-@!+".contains(c))
    {
        return Err(RulecastError::Config(format!(
            "task name '{}' contains invalid characters (allowed: A-Z a-z 0-9 _ . - @ ! +)",
            name
        )));
    }
    Ok(())
}

/// Validate a policy label.
///
/// The label is written verbatim into `HOST, value, policy` lines, so it may
/// not contain the field separator or line breaks.
///
/// # Examples
/// ```
/// use rulecast::validation::validate_policy;
/// assert!(validate_policy("Private Network").is_ok());
/// assert!(validate_policy("a,b").is_err());
/// ```
pub fn validate_policy(policy: &str) -> Result<(), RulecastError> {
    if policy.trim().is_empty() {
        return Err(RulecastError::Config("policy must not be empty".into()));
    }
    if policy.contains(',') || policy.contains('\n') || policy.contains('\r') {
        return Err(RulecastError::Config(format!(
            "policy '{}' must not contain ',' or line breaks",
            policy.escape_default()
        )));
    }
    Ok(())
}

/// Validate a source URL (HTTPS only).
///
/// # Examples
/// ```
/// use rulecast::validation::validate_source_url;
/// assert!(validate_source_url("https://example.org/list.txt").is_ok());
/// assert!(validate_source_url("http://example.org/list.txt").is_err());
/// ```
pub fn validate_source_url(url: &str) -> Result<(), RulecastError> {
    let Some(rest) = url.strip_prefix("https://") else {
        return Err(RulecastError::Config(format!(
            "source URL must use HTTPS: {}",
            url
        )));
    };
    if rest.is_empty() || rest.chars().any(char::is_whitespace) {
        return Err(RulecastError::Config(format!("invalid source URL: '{}'", url)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_task_name_valid() {
        assert!(validate_task_name("private_domain").is_ok());
        assert!(validate_task_name("public-tracker_domain").is_ok());
        assert!(validate_task_name("cn.v2").is_ok());
        assert!(validate_task_name("cd@cn_domain").is_ok());
        assert!(validate_task_name("ai-!cn_domain").is_ok());
    }

    #[test]
    fn test_validate_task_name_invalid() {
        assert!(validate_task_name("").is_err());
        assert!(validate_task_name(".hidden").is_err());
        assert!(validate_task_name("a/b").is_err());
        assert!(validate_task_name("a b").is_err());
        assert!(validate_task_name("广告").is_err());
    }

    #[test]
    fn test_validate_policy() {
        assert!(validate_policy("🎠 Private").is_ok());
        assert!(validate_policy("Proxy").is_ok());
        assert!(validate_policy("").is_err());
        assert!(validate_policy("   ").is_err());
        assert!(validate_policy("a,b").is_err());
        assert!(validate_policy("a\nb").is_err());
    }

    #[test]
    fn test_validate_source_url() {
        assert!(validate_source_url("https://raw.githubusercontent.com/x/y.list").is_ok());
        assert!(validate_source_url("http://example.org/a").is_err());
        assert!(validate_source_url("ftp://example.org/a").is_err());
        assert!(validate_source_url("https://").is_err());
        assert!(validate_source_url("https://exa mple.org").is_err());
    }

    #[test]
    fn test_error_message() {
        let err = validate_policy("a,b").unwrap_err();
        assert!(err.to_string().starts_with("Configuration error:"));
    }
}
