// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! A small library of argument validation expressions.
//!
//! Each [`Expression`] checks a single [`ConstValue`] and returns either the (possibly coerced)
//! value or the list of issues found. Expressions compose: [`object`] and [`list`] validate nested
//! values and prefix the issues they collect with the path of the offending element.
//!
//! ```ignore
//! let shape = Shape::new()
//!     .field("email", string().trim().email())
//!     .field("age", int().min(18).optional());
//! ```

use std::{fmt, sync::Arc};

use async_graphql_value::ConstValue;

mod combinators;
mod list;
mod number;
mod object;
mod path;
mod scalar;
mod string;

pub use combinators::{Optional, Refine, Transform};
pub use list::{ListExpression, list};
pub use number::{FloatExpression, IntExpression, float, int};
pub use object::{ObjectExpression, Shape, object};
pub use path::{ArgumentPath, PathSegment, ValidationIssue};
pub use scalar::{BooleanExpression, EnumExpression, boolean, enumeration};
pub use string::{StringExpression, string};

pub(crate) use object::{ShapeEntries, validate_entries};

/// A validation rule for a single value.
pub trait Expression: Send + Sync + fmt::Debug {
    /// Validate `value` (found at `path`), returning the coerced value on success.
    fn validate(
        &self,
        value: &ConstValue,
        path: &ArgumentPath,
    ) -> Result<ConstValue, Vec<ValidationIssue>>;

    /// Whether a missing value is acceptable (in which case it stays missing)
    fn accepts_missing(&self) -> bool {
        false
    }
}

pub type BoxedExpression = Arc<dyn Expression>;

impl<E: Expression + ?Sized> Expression for Arc<E> {
    fn validate(
        &self,
        value: &ConstValue,
        path: &ArgumentPath,
    ) -> Result<ConstValue, Vec<ValidationIssue>> {
        self.as_ref().validate(value, path)
    }

    fn accepts_missing(&self) -> bool {
        self.as_ref().accepts_missing()
    }
}

pub trait ExpressionExt: Expression + Sized + 'static {
    /// Accept a null or missing value in addition to what `self` accepts
    fn optional(self) -> Optional<Self> {
        Optional::new(self)
    }

    /// Run an additional check on the value produced by `self`
    fn refine<F>(self, predicate: F, message: impl Into<String>) -> Refine<Self, F>
    where
        F: Fn(&ConstValue) -> bool + Send + Sync,
    {
        Refine::new(self, predicate, message.into())
    }

    /// Map the value produced by `self`
    fn transform<F>(self, transform: F) -> Transform<Self, F>
    where
        F: Fn(ConstValue) -> ConstValue + Send + Sync,
    {
        Transform::new(self, transform)
    }

    fn boxed(self) -> BoxedExpression {
        Arc::new(self)
    }
}

impl<E: Expression + Sized + 'static> ExpressionExt for E {}

/// The name of the kind of a value, as used in "Expected ..., received ..." messages.
pub(crate) fn received_type(value: &ConstValue) -> &'static str {
    match value {
        ConstValue::Null => "null",
        ConstValue::Number(_) => "number",
        ConstValue::String(_) => "string",
        ConstValue::Boolean(_) => "boolean",
        ConstValue::Binary(_) => "binary",
        ConstValue::Enum(_) => "enum",
        ConstValue::List(_) => "array",
        ConstValue::Object(_) => "object",
    }
}

pub(crate) fn invalid_type(
    expected: &str,
    value: &ConstValue,
    path: &ArgumentPath,
) -> Vec<ValidationIssue> {
    vec![ValidationIssue::new(
        path,
        format!("Expected {expected}, received {}", received_type(value)),
    )]
}
