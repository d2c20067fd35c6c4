//! # Request Options
//!
//! Options accepted by the proxy (the caller's dialect) and the options understood by
//! backing clients (the backing dialect). The two list dialects differ: callers hand over
//! parsed [`Selector`]s, backing clients take rendered selector strings with zero-valued
//! defaults. [`BackingListOptions::try_from`] is the translation between them.

use crate::error::{ApiError, ConversionError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    Equals,
    NotEquals,
    Exists,
    DoesNotExist,
}

/// One `key op value` term of a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub key: String,
    pub operator: Operator,
    pub value: Option<String>,
}

impl Requirement {
    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            operator: Operator::Equals,
            value: Some(value.into()),
        }
    }

    pub fn not_equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            operator: Operator::NotEquals,
            value: Some(value.into()),
        }
    }

    pub fn exists(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            operator: Operator::Exists,
            value: None,
        }
    }

    pub fn does_not_exist(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            operator: Operator::DoesNotExist,
            value: None,
        }
    }

    fn matches(&self, fields: &BTreeMap<String, String>) -> bool {
        let actual = fields.get(&self.key);
        match self.operator {
            Operator::Equals => actual == self.value.as_ref(),
            Operator::NotEquals => actual != self.value.as_ref(),
            Operator::Exists => actual.is_some(),
            Operator::DoesNotExist => actual.is_none(),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.value.as_deref().unwrap_or_default();
        match self.operator {
            Operator::Equals => write!(f, "{}={}", self.key, value),
            Operator::NotEquals => write!(f, "{}!={}", self.key, value),
            Operator::Exists => write!(f, "{}", self.key),
            Operator::DoesNotExist => write!(f, "!{}", self.key),
        }
    }
}

/// A conjunction of requirements. The empty selector matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    requirements: Vec<Requirement>,
}

impl Selector {
    pub fn everything() -> Self {
        Self::default()
    }

    pub fn and(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// Parses `a=b,c!=d,e,!f`.
    pub fn parse(input: &str) -> Result<Self, ApiError> {
        let mut selector = Self::default();
        for term in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let requirement = if let Some(key) = term.strip_prefix('!') {
                Requirement::does_not_exist(key.trim())
            } else if let Some((key, value)) = term.split_once("!=") {
                Requirement::not_equals(key.trim(), value.trim())
            } else if let Some((key, value)) = term.split_once("==") {
                Requirement::equals(key.trim(), value.trim())
            } else if let Some((key, value)) = term.split_once('=') {
                Requirement::equals(key.trim(), value.trim())
            } else {
                Requirement::exists(term)
            };
            if requirement.key.is_empty() {
                return Err(ApiError::BadRequest(format!(
                    "invalid selector term {term:?}: empty key"
                )));
            }
            selector.requirements.push(requirement);
        }
        Ok(selector)
    }

    pub fn matches(&self, fields: &BTreeMap<String, String>) -> bool {
        self.requirements.iter().all(|r| r.matches(fields))
    }

    fn render(&self, field: &str) -> Result<String, ConversionError> {
        if self.requirements.iter().any(|r| r.key.is_empty()) {
            return Err(ConversionError::new(field, "selector requirement has an empty key"));
        }
        Ok(self.to_string())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, requirement) in self.requirements.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{requirement}")?;
        }
        Ok(())
    }
}

/// List options in the caller's dialect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub label_selector: Option<Selector>,
    pub field_selector: Option<Selector>,
    pub limit: Option<u64>,
    pub continue_token: Option<String>,
    pub resource_version: Option<String>,
}

/// List options in the backing client's dialect: plain strings, zero means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackingListOptions {
    #[serde(default)]
    pub label_selector: String,
    #[serde(default)]
    pub field_selector: String,
    #[serde(default)]
    pub limit: u64,
    #[serde(default, rename = "continue")]
    pub continue_token: String,
    #[serde(default)]
    pub resource_version: String,
}

impl TryFrom<&ListOptions> for BackingListOptions {
    type Error = ConversionError;

    fn try_from(options: &ListOptions) -> Result<Self, Self::Error> {
        let label_selector = match &options.label_selector {
            Some(selector) => selector.render("labelSelector")?,
            None => String::new(),
        };
        let field_selector = match &options.field_selector {
            Some(selector) => selector.render("fieldSelector")?,
            None => String::new(),
        };
        Ok(Self {
            label_selector,
            field_selector,
            limit: options.limit.unwrap_or(0),
            continue_token: options.continue_token.clone().unwrap_or_default(),
            resource_version: options.resource_version.clone().unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetOptions {
    #[serde(default)]
    pub resource_version: String,
}

/// Accepted for parity with the public API. The proxy does not forward `dry_run`; the
/// backing client has no dry-run write path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOptions {
    #[serde(default)]
    pub dry_run: Vec<String>,
}

/// Accepted for parity with the public API. The proxy does not forward `dry_run`; the
/// backing client has no dry-run write path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOptions {
    #[serde(default)]
    pub dry_run: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preconditions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropagationPolicy {
    Orphan,
    Background,
    Foreground,
}

/// Delete options. The proxy forwards these to the backing client as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grace_period_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preconditions: Option<Preconditions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub propagation_policy: Option<PropagationPolicy>,
    #[serde(default)]
    pub dry_run: Vec<String>,
}
