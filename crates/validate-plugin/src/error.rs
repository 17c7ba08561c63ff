// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde_json::{Map, Value, json};
use thiserror::Error;

/// Error code attached to errors caused by invalid arguments.
pub const BAD_USER_INPUT: &str = "BAD_USER_INPUT";

/// An error meant to be shown to the caller, carrying GraphQL error extensions.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct UserInputError {
    message: String,
    extensions: Map<String, Value>,
}

impl UserInputError {
    /// Create an error with the given extensions. The `code` extension defaults to
    /// [`BAD_USER_INPUT`] and always comes first.
    pub fn new(message: impl Into<String>, extensions: Map<String, Value>) -> Self {
        let code = extensions
            .get("code")
            .cloned()
            .unwrap_or_else(|| Value::String(BAD_USER_INPUT.to_string()));

        let mut ordered = Map::new();
        ordered.insert("code".to_string(), code);
        ordered.extend(extensions.into_iter().filter(|(key, _)| key != "code"));

        Self {
            message: message.into(),
            extensions: ordered,
        }
    }

    /// An error reporting one message per argument, in the `validationErrors` form.
    pub fn validation_errors<I, K, M>(errors: I) -> Self
    where
        I: IntoIterator<Item = (K, M)>,
        K: Into<String>,
        M: Into<String>,
    {
        let errors: Map<String, Value> = errors
            .into_iter()
            .map(|(argument, message)| (argument.into(), Value::String(message.into())))
            .collect();

        let mut extensions = Map::new();
        extensions.insert("validationErrors".to_string(), Value::Object(errors));

        Self::new("Validation failed", extensions)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> Option<&str> {
        self.extensions.get("code").and_then(Value::as_str)
    }

    pub fn extensions(&self) -> &Map<String, Value> {
        &self.extensions
    }

    /// The error as it appears in the `errors` array of a GraphQL response
    pub fn to_graphql_error(&self) -> Value {
        json!({
            "message": self.message,
            "extensions": self.extensions,
        })
    }
}

/// Error produced while resolving a field.
#[derive(Error, Debug)]
pub enum FieldError {
    #[error("{0}")]
    UserInput(#[from] UserInputError),

    #[error("{0}")]
    Delegate(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("{0}")]
    Generic(String),

    #[error("Field '{field_name}' is not defined on type '{parent_type}'")]
    FieldNotFound {
        parent_type: String,
        field_name: String,
    },
}

impl FieldError {
    pub fn delegate(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        FieldError::Delegate(Box::new(error))
    }

    pub fn user_input(&self) -> Option<&UserInputError> {
        match self {
            FieldError::UserInput(error) => Some(error),
            FieldError::Delegate(error) => error.downcast_ref::<UserInputError>(),
            _ => None,
        }
    }

    /// The error as it appears in the `errors` array of a GraphQL response.
    ///
    /// Only user input errors carry extensions; everything else is reported with its message alone.
    pub fn to_graphql_error(&self) -> Value {
        match self.user_input() {
            Some(error) => error.to_graphql_error(),
            None => json!({ "message": self.to_string() }),
        }
    }
}
