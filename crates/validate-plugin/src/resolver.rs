// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use async_graphql_value::{ConstValue, Name, indexmap::IndexMap};
use async_trait::async_trait;

use crate::{diagnostic::FieldCoordinate, error::FieldError};

/// Arguments of a field invocation, in the order they were supplied.
pub type Arguments = IndexMap<Name, ConstValue>;

/// Static information about the field being resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveInfo {
    pub parent_type: String,
    pub field_name: String,
    pub return_type: String,
}

impl ResolveInfo {
    pub fn coordinate(&self) -> FieldCoordinate {
        FieldCoordinate::new(&self.parent_type, &self.field_name)
    }
}

/// Computes the value of a field.
#[async_trait]
pub trait FieldResolver<C>: Send + Sync
where
    C: Send + Sync,
{
    async fn resolve(
        &self,
        root: &ConstValue,
        args: Arguments,
        ctx: &C,
        info: &ResolveInfo,
    ) -> Result<ConstValue, FieldError>;
}

/// Runs around a field resolver, deciding whether (and with which arguments) to proceed to `next`.
#[async_trait]
pub trait FieldMiddleware<C>: Send + Sync
where
    C: Send + Sync,
{
    async fn around(
        &self,
        root: &ConstValue,
        args: Arguments,
        ctx: &C,
        info: &ResolveInfo,
        next: &dyn FieldResolver<C>,
    ) -> Result<ConstValue, FieldError>;
}

/// A resolver wrapped by a middleware. The middleware is the only way to reach the core resolver.
pub struct InterceptedResolver<C>
where
    C: Send + Sync,
{
    middleware: Arc<dyn FieldMiddleware<C>>,
    core: Arc<dyn FieldResolver<C>>,
}

impl<C> InterceptedResolver<C>
where
    C: Send + Sync,
{
    pub fn new(middleware: Arc<dyn FieldMiddleware<C>>, core: Arc<dyn FieldResolver<C>>) -> Self {
        Self { middleware, core }
    }
}

#[async_trait]
impl<C> FieldResolver<C> for InterceptedResolver<C>
where
    C: Send + Sync,
{
    async fn resolve(
        &self,
        root: &ConstValue,
        args: Arguments,
        ctx: &C,
        info: &ResolveInfo,
    ) -> Result<ConstValue, FieldError> {
        self.middleware
            .around(root, args, ctx, info, self.core.as_ref())
            .await
    }
}

struct FnResolver<F>(F);

#[async_trait]
impl<C, F> FieldResolver<C> for FnResolver<F>
where
    C: Send + Sync,
    F: Fn(&ConstValue, Arguments, &C, &ResolveInfo) -> Result<ConstValue, FieldError>
        + Send
        + Sync,
{
    async fn resolve(
        &self,
        root: &ConstValue,
        args: Arguments,
        ctx: &C,
        info: &ResolveInfo,
    ) -> Result<ConstValue, FieldError> {
        (self.0)(root, args, ctx, info)
    }
}

/// A resolver backed by a synchronous function
pub fn resolver_fn<C, F>(resolve: F) -> Arc<dyn FieldResolver<C>>
where
    C: Send + Sync + 'static,
    F: Fn(&ConstValue, Arguments, &C, &ResolveInfo) -> Result<ConstValue, FieldError>
        + Send
        + Sync
        + 'static,
{
    Arc::new(FnResolver(resolve))
}
