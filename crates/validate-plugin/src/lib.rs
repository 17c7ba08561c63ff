// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Argument validation for GraphQL field resolvers.
//!
//! Attach a [`ValidateProps`] rule to a field and register the [`ValidatePlugin`]; the field's
//! resolver then only ever runs with arguments that passed validation.

pub mod diagnostic;
pub mod env;
pub mod error;
pub mod expression;
pub mod plugin;
pub mod resolver;
pub mod schema;
pub mod validate;

pub use error::{BAD_USER_INPUT, FieldError, UserInputError};
pub use plugin::{GRAPHQL_VALIDATE_ERROR_FORMAT, ValidatePlugin, ValidatePluginConfig};
pub use resolver::{Arguments, FieldMiddleware, FieldResolver, ResolveInfo, resolver_fn};
pub use schema::{FieldDefinition, Plugin, Schema};
pub use validate::{
    ValidateFn, ValidateProps,
    format::{ErrorFormat, FormatErrorParams, ValidateError, ValidationFailure},
};
