//! Field validation for the form flows.
//!
//! Every field is checked against its rules and all failures are collected,
//! so a form can show every problem at once. Each field reports only its
//! first failing rule.

use std::collections::BTreeMap;
use std::fmt;

/// Maximum length of an e-mail local part
const MAX_EMAIL_LOCAL_LENGTH: usize = 64;

/// Maximum length of an e-mail domain
const MAX_EMAIL_DOMAIN_LENGTH: usize = 255;

pub const INVALID_EMAIL_MESSAGE: &str = "Enter a valid e-mail";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Fails on empty or whitespace-only input; later rules are skipped
    Required(&'static str),
    Email,
    MinLength(usize, &'static str),
}

impl Rule {
    fn check(&self, value: &str) -> Option<&'static str> {
        match *self {
            Rule::Required(message) if value.trim().is_empty() => Some(message),
            Rule::Email if !is_valid_email(value) => Some(INVALID_EMAIL_MESSAGE),
            Rule::MinLength(min, message) if value.chars().count() < min => Some(message),
            _ => None,
        }
    }
}

/// Field name to error message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, &'static str>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `rules` against `value` and record the first failure for `field`
    pub fn check(&mut self, field: &'static str, value: &str, rules: &[Rule]) -> &mut Self {
        if value.trim().is_empty() {
            // Only presence is checked on empty input
            if let Some(message) = rules.iter().find_map(|r| match r {
                Rule::Required(_) => r.check(value),
                _ => None,
            }) {
                self.0.insert(field, message);
            }
            return self;
        }
        if let Some(message) = rules.iter().find_map(|r| r.check(value)) {
            self.0.insert(field, message);
        }
        self
    }

    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// `Ok` when nothing failed
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", field, message)?;
        }
        Ok(())
    }
}

/// Input that can be checked before it is submitted
pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

/// Basic structural e-mail check: one `@`, sane local part, dotted domain.
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if domain.contains('@') {
        return false;
    }

    if local.is_empty() || local.len() > MAX_EMAIL_LOCAL_LENGTH {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    if local.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }

    if domain.is_empty() || domain.len() > MAX_EMAIL_DOMAIN_LENGTH {
        return false;
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }
    domain.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}
