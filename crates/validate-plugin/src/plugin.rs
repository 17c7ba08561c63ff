// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The plugin that installs argument validation on fields carrying a validate rule.

use std::sync::Arc;

use crate::{
    diagnostic::{Diagnostic, DiagnosticSink, TracingDiagnostics},
    env::{EnvError, Environment},
    error::FieldError,
    resolver::FieldMiddleware,
    schema::{CreateFieldResolverInfo, Plugin},
    validate::{
        VALIDATE_EXTENSION, ValidateMiddleware, ValidateProps, ValidationNormalizer,
        format::{ErrorFormat, FormatErrorFn, FormatErrorParams, default_format_error},
    },
};

/// Selects the default error format (`first`, `list` or `map`)
pub const GRAPHQL_VALIDATE_ERROR_FORMAT: &str = "GRAPHQL_VALIDATE_ERROR_FORMAT";

pub const PLUGIN_NAME: &str = "validate";

pub struct ValidatePluginConfig<C> {
    /// Overrides the default formatting (see [`default_format_error`])
    pub format_error: Option<FormatErrorFn<C>>,
    pub error_format: ErrorFormat,
    pub diagnostics: Arc<dyn DiagnosticSink>,
}

impl<C> Default for ValidatePluginConfig<C> {
    fn default() -> Self {
        Self {
            format_error: None,
            error_format: ErrorFormat::default(),
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }
}

impl<C> ValidatePluginConfig<C>
where
    C: Send + Sync + 'static,
{
    pub fn from_env(env: &dyn Environment) -> Result<Self, EnvError> {
        let error_format = match env.get(GRAPHQL_VALIDATE_ERROR_FORMAT) {
            Some(value) => value.parse::<ErrorFormat>().map_err(|message| EnvError::InvalidEnum {
                env_key: GRAPHQL_VALIDATE_ERROR_FORMAT,
                env_value: value.clone(),
                message,
            })?,
            None => ErrorFormat::default(),
        };

        Ok(Self {
            error_format,
            ..Self::default()
        })
    }

    pub fn with_format_error<F>(mut self, format_error: F) -> Self
    where
        F: Fn(FormatErrorParams<'_, C>) -> FieldError + Send + Sync + 'static,
    {
        self.format_error = Some(Arc::new(format_error));
        self
    }

    pub fn with_error_format(mut self, error_format: ErrorFormat) -> Self {
        self.error_format = error_format;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

/// Validates the arguments of every field with a [`ValidateProps`] extension before its resolver
/// runs.
pub struct ValidatePlugin<C> {
    format_error: FormatErrorFn<C>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl<C> ValidatePlugin<C>
where
    C: Send + Sync + 'static,
{
    pub fn new(config: ValidatePluginConfig<C>) -> Self {
        let error_format = config.error_format;

        Self {
            format_error: config.format_error.unwrap_or_else(|| {
                Arc::new(move |params| default_format_error(error_format, params))
            }),
            diagnostics: config.diagnostics,
        }
    }
}

impl<C> Default for ValidatePlugin<C>
where
    C: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(ValidatePluginConfig::default())
    }
}

impl<C> Plugin<C> for ValidatePlugin<C>
where
    C: Send + Sync + 'static,
{
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn on_create_field_resolver(
        &self,
        info: &CreateFieldResolverInfo<'_>,
    ) -> Option<Arc<dyn FieldMiddleware<C>>> {
        if !info.extensions.contains_key(VALIDATE_EXTENSION) {
            return None;
        }

        let field = info.coordinate();

        if info.arguments.is_empty() {
            self.diagnostics.emit(Diagnostic::missing_arguments(&field));
        }

        let Some(props) = info.extensions.get::<ValidateProps<C>>(VALIDATE_EXTENSION) else {
            let found = info
                .extensions
                .type_name(VALIDATE_EXTENSION)
                .unwrap_or("unknown");
            self.diagnostics.emit(Diagnostic::unsupported_validate_attribute(
                &field,
                info.field_type,
                found,
            ));
            return None;
        };

        let normalizer = ValidationNormalizer::new(field, self.diagnostics.clone());
        let rule = normalizer.prepare(props);

        Some(Arc::new(ValidateMiddleware::new(
            rule,
            normalizer,
            self.format_error.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_graphql_value::{ConstValue, Name};

    use super::*;
    use crate::{
        diagnostic::{DiagnosticKind, RecordedDiagnostics},
        expression::{Shape, string},
        resolver::resolver_fn,
        schema::{FieldDefinition, Schema},
    };

    fn echo() -> Arc<dyn crate::resolver::FieldResolver<()>> {
        resolver_fn::<(), _>(|_root, args, _ctx, _info| Ok(ConstValue::Object(args)))
    }

    fn schema(field: FieldDefinition<()>, diagnostics: Arc<RecordedDiagnostics>) -> Schema<()> {
        Schema::builder()
            .field(field)
            .plugin(ValidatePlugin::new(
                ValidatePluginConfig::default().with_diagnostics(diagnostics),
            ))
            .build()
    }

    #[test]
    fn error_format_from_env() {
        let config = ValidatePluginConfig::<()>::from_env(&HashMap::from([(
            GRAPHQL_VALIDATE_ERROR_FORMAT,
            "list",
        )]))
        .unwrap();
        assert_eq!(config.error_format, ErrorFormat::List);

        let config = ValidatePluginConfig::<()>::from_env(&HashMap::<&str, &str>::new()).unwrap();
        assert_eq!(config.error_format, ErrorFormat::Map);
    }

    #[test]
    fn invalid_error_format_from_env() {
        let result = ValidatePluginConfig::<()>::from_env(&HashMap::from([(
            GRAPHQL_VALIDATE_ERROR_FORMAT,
            "everything",
        )]));

        assert!(matches!(
            result,
            Err(EnvError::InvalidEnum { env_key: GRAPHQL_VALIDATE_ERROR_FORMAT, ref env_value, .. })
                if env_value == "everything"
        ));
    }

    #[test]
    fn fields_without_rule_are_left_alone() {
        let diagnostics = Arc::new(RecordedDiagnostics::new());
        let plugin = ValidatePlugin::<()>::new(
            ValidatePluginConfig::default().with_diagnostics(diagnostics.clone()),
        );

        let extensions = Default::default();
        let info = CreateFieldResolverInfo {
            parent_type: "Query",
            field_name: "users",
            field_type: "[User!]!",
            arguments: &[],
            extensions: &extensions,
        };

        assert!(plugin.on_create_field_resolver(&info).is_none());
        assert!(diagnostics.diagnostics().is_empty());
    }

    #[tokio::test]
    async fn rule_without_arguments_warns_and_still_resolves() {
        let diagnostics = Arc::new(RecordedDiagnostics::new());
        let schema = schema(
            FieldDefinition::new("Query", "me", "User", echo())
                .validate(ValidateProps::<()>::function(|_, _| Ok(None))),
            diagnostics.clone(),
        );

        let recorded = diagnostics.take();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].kind, DiagnosticKind::MissingArguments);
        assert_eq!(
            recorded[0].message,
            "[Query.me] does not have any arguments, but a validate rule was passed"
        );

        let value = schema
            .resolve("Query", "me", &ConstValue::Null, Default::default(), &())
            .await
            .unwrap();
        assert_eq!(value, ConstValue::Object(Default::default()));
    }

    #[tokio::test]
    async fn unsupported_rule_warns_and_leaves_resolver_alone() {
        let diagnostics = Arc::new(RecordedDiagnostics::new());
        let schema = schema(
            FieldDefinition::new("Mutation", "createUser", "User", echo())
                .argument("email", "String!")
                .extension(VALIDATE_EXTENSION, "not a rule"),
            diagnostics.clone(),
        );

        let recorded = diagnostics.take();
        assert_eq!(recorded.len(), 1);
        assert_eq!(
            recorded[0].kind,
            DiagnosticKind::UnsupportedValidateAttribute {
                found: "&str".to_string()
            }
        );
        assert_eq!(
            recorded[0].message,
            "The validate property provided to [createUser] with type [User] should be a function or a shape, saw [&str]"
        );

        let args = [(Name::new("email"), ConstValue::String("bad@email".into()))]
            .into_iter()
            .collect();
        let value = schema
            .resolve("Mutation", "createUser", &ConstValue::Null, args, &())
            .await
            .unwrap();
        assert_eq!(
            value,
            ConstValue::Object(
                [(Name::new("email"), ConstValue::String("bad@email".into()))]
                    .into_iter()
                    .collect()
            )
        );
    }

    #[tokio::test]
    async fn shape_rule_is_installed() {
        let diagnostics = Arc::new(RecordedDiagnostics::new());
        let schema = schema(
            FieldDefinition::new("Mutation", "createUser", "User", echo())
                .argument("email", "String!")
                .validate(ValidateProps::shape(
                    Shape::new().field("email", string().email()),
                )),
            diagnostics.clone(),
        );

        assert!(diagnostics.diagnostics().is_empty());

        let args = [(Name::new("email"), ConstValue::String("bad@email".into()))]
            .into_iter()
            .collect();
        let error = schema
            .resolve("Mutation", "createUser", &ConstValue::Null, args, &())
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "Validation failed");
    }
}
