// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use tracing::{instrument, trace};

use crate::{
    diagnostic::{Diagnostic, DiagnosticSink, FieldCoordinate},
    error::FieldError,
    expression::{ArgumentPath, Shape, ShapeEntries, validate_entries},
    resolver::Arguments,
};

use super::{ValidateFn, ValidateProps, format::ValidationFailure};

/// Validates the whole argument set of a field.
#[derive(Debug)]
pub struct CompositeValidator {
    entries: ShapeEntries,
}

impl CompositeValidator {
    pub fn new(shape: Shape) -> Self {
        Self {
            entries: shape.into_entries(),
        }
    }

    /// Whether the validator has no effective entries (and thus accepts any arguments)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate `raw`, returning it with the declared keys replaced by their validated values.
    pub fn validate(&self, raw: &Arguments) -> Result<Arguments, ValidationFailure> {
        let validated =
            validate_entries(&self.entries, raw, &ArgumentPath::root()).map_err(ValidationFailure::new)?;

        let mut merged = raw.clone();
        merged.extend(validated);

        Ok(merged)
    }
}

/// Outcome of normalizing a rule for one invocation.
#[derive(Debug, Clone)]
pub enum Validation {
    Skip,
    Run(Arc<CompositeValidator>),
}

/// A field's rule, prepared when its resolver is created.
pub(crate) enum ValidationRule<C>
where
    C: Send + Sync,
{
    Shape(Arc<CompositeValidator>),
    Function(Arc<dyn ValidateFn<C>>),
}

/// Turns validation rules into validators for one field, reporting misconfigurations.
pub struct ValidationNormalizer {
    field: FieldCoordinate,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl ValidationNormalizer {
    pub fn new(field: FieldCoordinate, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self { field, diagnostics }
    }

    pub fn field(&self) -> &FieldCoordinate {
        &self.field
    }

    pub(crate) fn prepare<C>(&self, props: &ValidateProps<C>) -> ValidationRule<C>
    where
        C: Send + Sync,
    {
        match props {
            ValidateProps::Shape(shape) => ValidationRule::Shape(Arc::new(self.build(shape.clone()))),
            ValidateProps::Function(validate) => ValidationRule::Function(validate.clone()),
        }
    }

    /// The validator to run for this invocation.
    ///
    /// Errors come from the validate function and are not validation failures.
    #[instrument(name = "ValidationNormalizer::normalize", skip_all, fields(field = %self.field))]
    pub(crate) async fn normalize<C>(
        &self,
        rule: &ValidationRule<C>,
        args: &Arguments,
        ctx: &C,
    ) -> Result<Validation, FieldError>
    where
        C: Send + Sync,
    {
        match rule {
            ValidationRule::Shape(validator) => Ok(Validation::Run(validator.clone())),
            ValidationRule::Function(validate) => match validate.shape(args, ctx).await? {
                Some(shape) => Ok(Validation::Run(Arc::new(self.build(shape)))),
                None => {
                    trace!("Validate function returned no shape, skipping validation");
                    Ok(Validation::Skip)
                }
            },
        }
    }

    fn build(&self, shape: Shape) -> CompositeValidator {
        let validator = CompositeValidator::new(shape);

        if validator.is_empty() {
            self.diagnostics.emit(Diagnostic::empty_shape(&self.field));
        }

        validator
    }
}

#[cfg(test)]
mod tests {
    use async_graphql_value::{ConstValue, Name};

    use super::*;
    use crate::{
        diagnostic::{DiagnosticKind, RecordedDiagnostics},
        expression::{ExpressionExt, ValidationIssue, int, string},
    };

    fn args<const N: usize>(entries: [(&str, ConstValue); N]) -> Arguments {
        entries
            .into_iter()
            .map(|(name, value)| (Name::new(name), value))
            .collect()
    }

    fn normalizer() -> (ValidationNormalizer, Arc<RecordedDiagnostics>) {
        let diagnostics = Arc::new(RecordedDiagnostics::new());
        (
            ValidationNormalizer::new(FieldCoordinate::new("Mutation", "validate"), diagnostics.clone()),
            diagnostics,
        )
    }

    #[test]
    fn merges_coerced_values_over_raw_arguments() {
        let validator = CompositeValidator::new(
            Shape::new()
                .field("id", int())
                .field("email", string().trim()),
        );
        let raw = args([
            ("email", ConstValue::String(" a@b.co ".into())),
            ("id", ConstValue::String("7".into())),
            ("note", ConstValue::String(" untouched ".into())),
        ]);

        assert_eq!(
            validator.validate(&raw),
            Ok(args([
                ("email", ConstValue::String("a@b.co".into())),
                ("id", ConstValue::Number(7.into())),
                ("note", ConstValue::String(" untouched ".into())),
            ]))
        );
    }

    #[test]
    fn missing_optional_arguments_stay_missing() {
        let validator = CompositeValidator::new(Shape::new().field("age", int().optional()));

        assert_eq!(validator.validate(&Arguments::new()), Ok(Arguments::new()));
    }

    #[test]
    fn collects_issues_of_all_arguments() {
        let validator = CompositeValidator::new(
            Shape::new()
                .field("email", string().email())
                .field("id", int()),
        );

        let failure = validator
            .validate(&args([("email", ConstValue::String("bad@email".into()))]))
            .unwrap_err();

        assert_eq!(
            failure.issues(),
            &[
                ValidationIssue::new(&ArgumentPath::root().key("email"), "Invalid email"),
                ValidationIssue::new(&ArgumentPath::root().key("id"), "Required"),
            ]
        );
    }

    #[test]
    fn empty_shape_is_reported_once_when_prepared() {
        let (normalizer, diagnostics) = normalizer();

        let rule = normalizer.prepare::<()>(&ValidateProps::shape(
            Shape::new().maybe_field("email", None),
        ));

        assert!(matches!(rule, ValidationRule::Shape(ref validator) if validator.is_empty()));
        assert_eq!(
            diagnostics
                .take()
                .into_iter()
                .map(|d| d.kind)
                .collect::<Vec<_>>(),
            vec![DiagnosticKind::EmptyShape]
        );
    }

    #[tokio::test]
    async fn shape_rules_reuse_their_validator() {
        let (normalizer, _) = normalizer();
        let rule = normalizer.prepare::<()>(&ValidateProps::shape(
            Shape::new().field("email", string()),
        ));

        let first = normalizer.normalize(&rule, &Arguments::new(), &()).await.unwrap();
        let second = normalizer.normalize(&rule, &Arguments::new(), &()).await.unwrap();

        match (first, second) {
            (Validation::Run(first), Validation::Run(second)) => {
                assert!(Arc::ptr_eq(&first, &second))
            }
            other => panic!("Expected validators, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn function_rules_can_skip() {
        let (normalizer, diagnostics) = normalizer();
        let rule = normalizer.prepare(&ValidateProps::<()>::function(|_, _| Ok(None)));

        let validation = normalizer
            .normalize(&rule, &Arguments::new(), &())
            .await
            .unwrap();

        assert!(matches!(validation, Validation::Skip));
        assert!(diagnostics.diagnostics().is_empty());
    }

    #[tokio::test]
    async fn function_rules_report_empty_shapes_per_invocation() {
        let (normalizer, diagnostics) = normalizer();
        let rule = normalizer.prepare(&ValidateProps::<()>::function(|_, _| Ok(Some(Shape::new()))));

        for _ in 0..2 {
            let validation = normalizer
                .normalize(&rule, &Arguments::new(), &())
                .await
                .unwrap();
            assert!(matches!(validation, Validation::Run(ref validator) if validator.is_empty()));
        }

        assert_eq!(diagnostics.take().len(), 2);
    }
}
