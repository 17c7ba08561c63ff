// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt;

use async_graphql_value::ConstValue;

use super::{ArgumentPath, Expression, ValidationIssue};

/// Accepts null or a missing value, delegating anything else to the inner expression.
#[derive(Debug, Clone)]
pub struct Optional<E> {
    inner: E,
}

impl<E> Optional<E> {
    pub(super) fn new(inner: E) -> Self {
        Self { inner }
    }
}

impl<E: Expression> Expression for Optional<E> {
    fn validate(
        &self,
        value: &ConstValue,
        path: &ArgumentPath,
    ) -> Result<ConstValue, Vec<ValidationIssue>> {
        match value {
            ConstValue::Null => Ok(ConstValue::Null),
            _ => self.inner.validate(value, path),
        }
    }

    fn accepts_missing(&self) -> bool {
        true
    }
}

pub struct Refine<E, F> {
    inner: E,
    predicate: F,
    message: String,
}

impl<E, F> Refine<E, F> {
    pub(super) fn new(inner: E, predicate: F, message: String) -> Self {
        Self {
            inner,
            predicate,
            message,
        }
    }
}

impl<E: fmt::Debug, F> fmt::Debug for Refine<E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refine")
            .field("inner", &self.inner)
            .field("message", &self.message)
            .finish()
    }
}

impl<E, F> Expression for Refine<E, F>
where
    E: Expression,
    F: Fn(&ConstValue) -> bool + Send + Sync,
{
    fn validate(
        &self,
        value: &ConstValue,
        path: &ArgumentPath,
    ) -> Result<ConstValue, Vec<ValidationIssue>> {
        let value = self.inner.validate(value, path)?;

        if (self.predicate)(&value) {
            Ok(value)
        } else {
            Err(vec![ValidationIssue::new(path, self.message.clone())])
        }
    }

    fn accepts_missing(&self) -> bool {
        self.inner.accepts_missing()
    }
}

pub struct Transform<E, F> {
    inner: E,
    transform: F,
}

impl<E, F> Transform<E, F> {
    pub(super) fn new(inner: E, transform: F) -> Self {
        Self { inner, transform }
    }
}

impl<E: fmt::Debug, F> fmt::Debug for Transform<E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<E, F> Expression for Transform<E, F>
where
    E: Expression,
    F: Fn(ConstValue) -> ConstValue + Send + Sync,
{
    fn validate(
        &self,
        value: &ConstValue,
        path: &ArgumentPath,
    ) -> Result<ConstValue, Vec<ValidationIssue>> {
        self.inner.validate(value, path).map(&self.transform)
    }

    fn accepts_missing(&self) -> bool {
        self.inner.accepts_missing()
    }
}
