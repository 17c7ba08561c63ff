// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! A minimal field registry to host plugins.
//!
//! Mirrors how a schema-building system hands each field definition to its plugins and installs
//! whatever middleware they return around the declared resolver.

use std::{
    any::{Any, type_name},
    collections::HashMap,
    fmt,
    sync::Arc,
};

use async_graphql_value::ConstValue;
use tracing::{debug, instrument};

use crate::{
    diagnostic::FieldCoordinate,
    error::FieldError,
    resolver::{Arguments, FieldMiddleware, FieldResolver, InterceptedResolver, ResolveInfo},
    validate::{VALIDATE_EXTENSION, ValidateProps},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentDefinition {
    pub name: String,
    pub ty: String,
}

#[derive(Clone)]
struct FieldExtension {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

/// Plugin-specific configuration attached to a field, keyed by name.
#[derive(Clone, Default)]
pub struct FieldExtensions {
    entries: HashMap<String, FieldExtension>,
}

impl FieldExtensions {
    pub fn insert<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.entries.insert(
            key.into(),
            FieldExtension {
                value: Arc::new(value),
                type_name: type_name::<T>(),
            },
        );
    }

    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<&T> {
        self.entries
            .get(key)
            .and_then(|extension| extension.value.downcast_ref::<T>())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Name of the type stored under `key`
    pub fn type_name(&self, key: &str) -> Option<&'static str> {
        self.entries.get(key).map(|extension| extension.type_name)
    }
}

impl fmt::Debug for FieldExtensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|(key, extension)| (key, extension.type_name)),
            )
            .finish()
    }
}

pub struct FieldDefinition<C>
where
    C: Send + Sync,
{
    parent_type: String,
    name: String,
    ty: String,
    arguments: Vec<ArgumentDefinition>,
    extensions: FieldExtensions,
    resolver: Arc<dyn FieldResolver<C>>,
}

impl<C> FieldDefinition<C>
where
    C: Send + Sync + 'static,
{
    pub fn new(
        parent_type: impl Into<String>,
        name: impl Into<String>,
        ty: impl Into<String>,
        resolver: Arc<dyn FieldResolver<C>>,
    ) -> Self {
        Self {
            parent_type: parent_type.into(),
            name: name.into(),
            ty: ty.into(),
            arguments: vec![],
            extensions: FieldExtensions::default(),
            resolver,
        }
    }

    pub fn argument(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.arguments.push(ArgumentDefinition {
            name: name.into(),
            ty: ty.into(),
        });
        self
    }

    pub fn extension<T: Any + Send + Sync>(mut self, key: impl Into<String>, value: T) -> Self {
        self.extensions.insert(key, value);
        self
    }

    /// Attach a validation rule to the field's arguments
    pub fn validate(self, props: ValidateProps<C>) -> Self {
        self.extension(VALIDATE_EXTENSION, props)
    }

    fn create_info(&self) -> CreateFieldResolverInfo<'_> {
        CreateFieldResolverInfo {
            parent_type: &self.parent_type,
            field_name: &self.name,
            field_type: &self.ty,
            arguments: &self.arguments,
            extensions: &self.extensions,
        }
    }
}

/// What a plugin gets to see about a field while its resolver is being created.
#[derive(Debug, Clone, Copy)]
pub struct CreateFieldResolverInfo<'a> {
    pub parent_type: &'a str,
    pub field_name: &'a str,
    pub field_type: &'a str,
    pub arguments: &'a [ArgumentDefinition],
    pub extensions: &'a FieldExtensions,
}

impl CreateFieldResolverInfo<'_> {
    pub fn coordinate(&self) -> FieldCoordinate {
        FieldCoordinate::new(self.parent_type, self.field_name)
    }
}

pub trait Plugin<C>: Send + Sync
where
    C: Send + Sync,
{
    fn name(&self) -> &str;

    /// Return a middleware to install around the field's resolver, or `None` to leave it as is.
    fn on_create_field_resolver(
        &self,
        info: &CreateFieldResolverInfo<'_>,
    ) -> Option<Arc<dyn FieldMiddleware<C>>>;
}

pub struct SchemaBuilder<C>
where
    C: Send + Sync,
{
    fields: Vec<FieldDefinition<C>>,
    plugins: Vec<Arc<dyn Plugin<C>>>,
}

impl<C> Default for SchemaBuilder<C>
where
    C: Send + Sync,
{
    fn default() -> Self {
        Self {
            fields: vec![],
            plugins: vec![],
        }
    }
}

impl<C> SchemaBuilder<C>
where
    C: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: FieldDefinition<C>) -> Self {
        self.fields.push(field);
        self
    }

    pub fn plugin(mut self, plugin: impl Plugin<C> + 'static) -> Self {
        self.plugins.push(Arc::new(plugin));
        self
    }

    /// Create the resolver of every field, letting each plugin wrap it. The first plugin
    /// registered ends up outermost.
    pub fn build(self) -> Schema<C> {
        let fields = self
            .fields
            .into_iter()
            .map(|field| {
                let create_info = field.create_info();

                let mut resolver = field.resolver.clone();
                for plugin in self.plugins.iter().rev() {
                    if let Some(middleware) = plugin.on_create_field_resolver(&create_info) {
                        debug!(
                            plugin = plugin.name(),
                            field = %create_info.coordinate(),
                            "Installing field middleware"
                        );
                        resolver = Arc::new(InterceptedResolver::new(middleware, resolver));
                    }
                }

                let info = ResolveInfo {
                    parent_type: field.parent_type,
                    field_name: field.name,
                    return_type: field.ty,
                };

                (info.coordinate(), ResolvedField { info, resolver })
            })
            .collect();

        Schema { fields }
    }
}

struct ResolvedField<C>
where
    C: Send + Sync,
{
    info: ResolveInfo,
    resolver: Arc<dyn FieldResolver<C>>,
}

pub struct Schema<C>
where
    C: Send + Sync,
{
    fields: HashMap<FieldCoordinate, ResolvedField<C>>,
}

impl<C> Schema<C>
where
    C: Send + Sync + 'static,
{
    pub fn builder() -> SchemaBuilder<C> {
        SchemaBuilder::new()
    }

    /// Resolve a single field invocation.
    #[instrument(
        name = "Schema::resolve",
        skip_all,
        fields(parent_type = %parent_type, field_name = %field_name)
    )]
    pub async fn resolve(
        &self,
        parent_type: &str,
        field_name: &str,
        root: &ConstValue,
        args: Arguments,
        ctx: &C,
    ) -> Result<ConstValue, FieldError> {
        let field = self
            .fields
            .get(&FieldCoordinate::new(parent_type, field_name))
            .ok_or_else(|| FieldError::FieldNotFound {
                parent_type: parent_type.to_string(),
                field_name: field_name.to_string(),
            })?;

        field
            .resolver
            .resolve(root, args, ctx, &field.info)
            .await
    }
}
