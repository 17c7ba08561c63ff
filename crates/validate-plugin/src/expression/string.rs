// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::LazyLock;

use async_graphql_value::ConstValue;
use regex::Regex;

use super::{ArgumentPath, Expression, ValidationIssue, invalid_type};

// No look-around in `regex`, so the "no leading dot" and "no consecutive dots" rules are checked
// separately in `is_email`.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

fn is_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && EMAIL_REGEX.is_match(value)
}

#[derive(Debug, Clone)]
enum StringCheck {
    Min(usize),
    Max(usize),
    Email,
    Url,
    Pattern { regex: Regex, message: String },
}

/// Accepts strings, optionally normalizing them before running length and format checks.
#[derive(Debug, Clone, Default)]
pub struct StringExpression {
    trim: bool,
    lowercase: bool,
    checks: Vec<StringCheck>,
}

pub fn string() -> StringExpression {
    StringExpression::default()
}

impl StringExpression {
    pub fn trim(mut self) -> Self {
        self.trim = true;
        self
    }

    pub fn to_lowercase(mut self) -> Self {
        self.lowercase = true;
        self
    }

    pub fn min(mut self, length: usize) -> Self {
        self.checks.push(StringCheck::Min(length));
        self
    }

    pub fn max(mut self, length: usize) -> Self {
        self.checks.push(StringCheck::Max(length));
        self
    }

    pub fn email(mut self) -> Self {
        self.checks.push(StringCheck::Email);
        self
    }

    pub fn url(mut self) -> Self {
        self.checks.push(StringCheck::Url);
        self
    }

    pub fn matches(mut self, regex: Regex, message: impl Into<String>) -> Self {
        self.checks.push(StringCheck::Pattern {
            regex,
            message: message.into(),
        });
        self
    }

    fn normalize(&self, value: &str) -> String {
        let value = if self.trim { value.trim() } else { value };

        if self.lowercase {
            value.to_lowercase()
        } else {
            value.to_string()
        }
    }
}

impl Expression for StringExpression {
    fn validate(
        &self,
        value: &ConstValue,
        path: &ArgumentPath,
    ) -> Result<ConstValue, Vec<ValidationIssue>> {
        let ConstValue::String(value) = value else {
            return Err(invalid_type("string", value, path));
        };

        let value = self.normalize(value);
        let length = value.chars().count();

        let issues: Vec<_> = self
            .checks
            .iter()
            .filter_map(|check| match check {
                StringCheck::Min(min) if length < *min => Some(format!(
                    "String must contain at least {min} character(s)"
                )),
                StringCheck::Max(max) if length > *max => {
                    Some(format!("String must contain at most {max} character(s)"))
                }
                StringCheck::Email if !is_email(&value) => Some("Invalid email".to_string()),
                StringCheck::Url if url::Url::parse(&value).is_err() => {
                    Some("Invalid url".to_string())
                }
                StringCheck::Pattern { regex, message } if !regex.is_match(&value) => {
                    Some(message.clone())
                }
                _ => None,
            })
            .map(|message| ValidationIssue::new(path, message))
            .collect();

        if issues.is_empty() {
            Ok(ConstValue::String(value))
        } else {
            Err(issues)
        }
    }
}
