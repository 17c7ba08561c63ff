// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Argument validation for field resolvers.
//!
//! A field opts in by carrying a [`ValidateProps`] under the [`VALIDATE_EXTENSION`] key. The
//! [`ValidatePlugin`](crate::plugin::ValidatePlugin) then installs a [`ValidateMiddleware`] that
//! runs before the field's resolver:
//!
//! 1. The rule is normalized into a [`CompositeValidator`] (once for shapes, per invocation for
//!    functions, which may also decide to skip validation).
//! 2. The raw arguments are validated; coerced values replace the raw ones for the keys the shape
//!    declares, all other keys pass through untouched.
//! 3. On failure the error is formatted (see [`format`]) and returned without calling the resolver.
//!    Errors returned by the resolver itself are formatted the same way.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::{error::FieldError, expression::Shape, resolver::Arguments};

pub mod format;
mod interceptor;
mod normalizer;

pub use interceptor::ValidateMiddleware;
pub use normalizer::{CompositeValidator, Validation, ValidationNormalizer};

/// The field extension key holding the validation rule
pub const VALIDATE_EXTENSION: &str = "validate";

/// Computes the validation shape for a single invocation.
///
/// Returning `Ok(None)` skips validation for that invocation. An `Err` is reported as is (it is
/// not turned into a validation failure).
#[async_trait]
pub trait ValidateFn<C>: Send + Sync
where
    C: Send + Sync,
{
    async fn shape(&self, args: &Arguments, ctx: &C) -> Result<Option<Shape>, FieldError>;
}

/// The validation rule attached to a field.
pub enum ValidateProps<C>
where
    C: Send + Sync,
{
    /// The same shape for every invocation
    Shape(Shape),
    /// A shape computed from the arguments and the request context
    Function(Arc<dyn ValidateFn<C>>),
}

impl<C> ValidateProps<C>
where
    C: Send + Sync + 'static,
{
    pub fn shape(shape: Shape) -> Self {
        ValidateProps::Shape(shape)
    }

    pub fn from_fn(validate: impl ValidateFn<C> + 'static) -> Self {
        ValidateProps::Function(Arc::new(validate))
    }

    pub fn function<F>(validate: F) -> Self
    where
        F: Fn(&Arguments, &C) -> Result<Option<Shape>, FieldError> + Send + Sync + 'static,
    {
        Self::from_fn(SyncValidateFn(validate))
    }

    pub fn function_async<F>(validate: F) -> Self
    where
        F: for<'a> Fn(&'a Arguments, &'a C) -> BoxFuture<'a, Result<Option<Shape>, FieldError>>
            + Send
            + Sync
            + 'static,
    {
        Self::from_fn(AsyncValidateFn(validate))
    }
}

impl<C> Clone for ValidateProps<C>
where
    C: Send + Sync,
{
    fn clone(&self) -> Self {
        match self {
            ValidateProps::Shape(shape) => ValidateProps::Shape(shape.clone()),
            ValidateProps::Function(validate) => ValidateProps::Function(validate.clone()),
        }
    }
}

impl<C> fmt::Debug for ValidateProps<C>
where
    C: Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidateProps::Shape(shape) => f.debug_tuple("Shape").field(shape).finish(),
            ValidateProps::Function(_) => f.write_str("Function"),
        }
    }
}

struct SyncValidateFn<F>(F);

#[async_trait]
impl<C, F> ValidateFn<C> for SyncValidateFn<F>
where
    C: Send + Sync,
    F: Fn(&Arguments, &C) -> Result<Option<Shape>, FieldError> + Send + Sync,
{
    async fn shape(&self, args: &Arguments, ctx: &C) -> Result<Option<Shape>, FieldError> {
        (self.0)(args, ctx)
    }
}

struct AsyncValidateFn<F>(F);

#[async_trait]
impl<C, F> ValidateFn<C> for AsyncValidateFn<F>
where
    C: Send + Sync,
    F: for<'a> Fn(&'a Arguments, &'a C) -> BoxFuture<'a, Result<Option<Shape>, FieldError>>
        + Send
        + Sync,
{
    async fn shape(&self, args: &Arguments, ctx: &C) -> Result<Option<Shape>, FieldError> {
        (self.0)(args, ctx).await
    }
}
