// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Turning validation failures into errors for the caller.

use std::{
    fmt::{self, Display},
    str::FromStr,
    sync::Arc,
};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
    error::{FieldError, UserInputError},
    expression::ValidationIssue,
    resolver::Arguments,
};

/// Every issue found while validating the arguments of one invocation, in the order found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    issues: Vec<ValidationIssue>,
}

impl ValidationFailure {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn first(&self) -> Option<&ValidationIssue> {
        self.issues.first()
    }
}

impl Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed")?;
        for (i, issue) in self.issues.iter().enumerate() {
            write!(f, "{} {issue}", if i == 0 { ":" } else { ";" })?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

/// An error raised while validating arguments, before it is formatted.
#[derive(Error, Debug)]
pub enum ValidateError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// Raised by the validate function itself. Passed through unchanged by the default formatter.
    #[error(transparent)]
    Resolver(#[from] FieldError),
}

/// Shape of the extensions produced for a validation failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorFormat {
    /// `{ code, invalidArgs: [segment, ...] }` for the first issue, with that issue's message
    First,
    /// `{ code, invalidArgs: [path, ...], validationMessages: [message, ...] }`
    List,
    /// `{ code, validationErrors: { argument: message } }`, one entry per failing argument
    #[default]
    Map,
}

impl FromStr for ErrorFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first" => Ok(ErrorFormat::First),
            "list" => Ok(ErrorFormat::List),
            "map" => Ok(ErrorFormat::Map),
            _ => Err("Must be one of 'first', 'list', or 'map'".to_string()),
        }
    }
}

const VALIDATION_FAILED: &str = "Validation failed";

impl ErrorFormat {
    pub fn user_input_error(self, failure: &ValidationFailure) -> UserInputError {
        let mut extensions = Map::new();

        match self {
            ErrorFormat::First => {
                let (message, invalid_args) = match failure.first() {
                    Some(issue) => (
                        issue.message.clone(),
                        issue
                            .path
                            .segments()
                            .iter()
                            .map(|segment| Value::String(segment.to_string()))
                            .collect(),
                    ),
                    None => (VALIDATION_FAILED.to_string(), vec![]),
                };
                extensions.insert("invalidArgs".to_string(), Value::Array(invalid_args));

                UserInputError::new(message, extensions)
            }
            ErrorFormat::List => {
                let (paths, messages): (Vec<_>, Vec<_>) = failure
                    .issues()
                    .iter()
                    .map(|issue| {
                        (
                            Value::String(issue.path.to_string()),
                            Value::String(issue.message.clone()),
                        )
                    })
                    .unzip();
                extensions.insert("invalidArgs".to_string(), Value::Array(paths));
                extensions.insert("validationMessages".to_string(), Value::Array(messages));

                UserInputError::new(VALIDATION_FAILED, extensions)
            }
            ErrorFormat::Map => {
                // Later issues for the same argument replace earlier ones
                let errors: Map<String, Value> = failure
                    .issues()
                    .iter()
                    .map(|issue| {
                        let argument = issue
                            .path
                            .argument()
                            .map(|segment| segment.to_string())
                            .unwrap_or_default();
                        (argument, Value::String(issue.message.clone()))
                    })
                    .collect();
                extensions.insert("validationErrors".to_string(), Value::Object(errors));

                UserInputError::new(VALIDATION_FAILED, extensions)
            }
        }
    }
}

/// What a [`FormatErrorFn`] gets to work with.
pub struct FormatErrorParams<'a, C> {
    pub error: ValidateError,
    /// The raw arguments of the invocation
    pub args: &'a Arguments,
    pub ctx: &'a C,
}

/// Maps a validation error to the error returned for the field.
pub type FormatErrorFn<C> = Arc<dyn Fn(FormatErrorParams<'_, C>) -> FieldError + Send + Sync>;

/// Validation failures become [`UserInputError`]s in the given format; any other error is returned
/// unchanged.
pub fn default_format_error<C>(format: ErrorFormat, params: FormatErrorParams<'_, C>) -> FieldError {
    match params.error {
        ValidateError::Validation(failure) => format.user_input_error(&failure).into(),
        ValidateError::Resolver(error) => error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::BAD_USER_INPUT, expression::ArgumentPath};

    fn failure() -> ValidationFailure {
        let email = ArgumentPath::root().key("email");
        let tags = ArgumentPath::root().key("tags");

        ValidationFailure::new(vec![
            ValidationIssue::new(&email, "Invalid email"),
            ValidationIssue::new(&tags.index(0), "Required"),
            ValidationIssue::new(&tags.index(3), "String must contain at least 2 character(s)"),
        ])
    }

    #[test]
    fn map_format() {
        let error = ErrorFormat::Map.user_input_error(&failure());

        insta::assert_json_snapshot!(error.to_graphql_error(), @r#"
        {
          "message": "Validation failed",
          "extensions": {
            "code": "BAD_USER_INPUT",
            "validationErrors": {
              "email": "Invalid email",
              "tags": "String must contain at least 2 character(s)"
            }
          }
        }
        "#);
    }

    #[test]
    fn first_format() {
        let failure = ValidationFailure::new(vec![ValidationIssue::new(
            &ArgumentPath::root().key("input").key("email"),
            "Invalid email",
        )]);

        let error = ErrorFormat::First.user_input_error(&failure);

        assert_eq!(error.message(), "Invalid email");
        insta::assert_json_snapshot!(error.extensions(), @r#"
        {
          "code": "BAD_USER_INPUT",
          "invalidArgs": [
            "input",
            "email"
          ]
        }
        "#);
    }

    #[test]
    fn list_format() {
        let error = ErrorFormat::List.user_input_error(&failure());

        assert_eq!(error.message(), "Validation failed");
        assert_eq!(error.code(), Some(BAD_USER_INPUT));
        insta::assert_json_snapshot!(error.extensions(), @r#"
        {
          "code": "BAD_USER_INPUT",
          "invalidArgs": [
            "email",
            "tags.0",
            "tags.3"
          ],
          "validationMessages": [
            "Invalid email",
            "Required",
            "String must contain at least 2 character(s)"
          ]
        }
        "#);
    }

    #[test]
    fn other_errors_pass_through() {
        let args = Arguments::new();
        let error = default_format_error(
            ErrorFormat::Map,
            FormatErrorParams {
                error: ValidateError::Resolver(FieldError::Generic("lookup failed".to_string())),
                args: &args,
                ctx: &(),
            },
        );

        assert!(matches!(&error, FieldError::Generic(message) if message == "lookup failed"));
        assert_eq!(error.user_input(), None);
    }

    #[test]
    fn parse_format() {
        assert_eq!("LIST".parse::<ErrorFormat>(), Ok(ErrorFormat::List));
        assert!("verbose".parse::<ErrorFormat>().is_err());
    }

    #[test]
    fn failure_display() {
        assert_eq!(
            failure().to_string(),
            "Validation failed: email: Invalid email; tags.0: Required; tags.3: String must contain at least 2 character(s)"
        );
    }
}
