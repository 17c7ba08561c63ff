// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_value::ConstValue;
use async_trait::async_trait;
use tracing::debug;

use crate::{
    error::FieldError,
    resolver::{Arguments, FieldMiddleware, FieldResolver, ResolveInfo},
};

use super::{
    Validation,
    format::{FormatErrorFn, FormatErrorParams, ValidateError},
    normalizer::{ValidationNormalizer, ValidationRule},
};

/// Validates the arguments of a field before handing them to its resolver.
///
/// The resolver only runs once validation has completed successfully, and then only sees the
/// validated values for the keys the rule covers.
pub struct ValidateMiddleware<C>
where
    C: Send + Sync,
{
    rule: ValidationRule<C>,
    normalizer: ValidationNormalizer,
    format_error: FormatErrorFn<C>,
}

impl<C> ValidateMiddleware<C>
where
    C: Send + Sync,
{
    pub(crate) fn new(
        rule: ValidationRule<C>,
        normalizer: ValidationNormalizer,
        format_error: FormatErrorFn<C>,
    ) -> Self {
        Self {
            rule,
            normalizer,
            format_error,
        }
    }

    /// The arguments to resolve with. The raw arguments stay with the caller so they can be handed
    /// to the error normalizer later on.
    async fn validated_args(&self, args: &Arguments, ctx: &C) -> Result<Arguments, FieldError> {
        let validation = match self.normalizer.normalize(&self.rule, args, ctx).await {
            Ok(validation) => validation,
            Err(error) => return Err(self.format_error(ValidateError::Resolver(error), args, ctx)),
        };

        match validation {
            Validation::Skip => Ok(args.clone()),
            Validation::Run(validator) => validator.validate(args).map_err(|failure| {
                debug!(field = %self.normalizer.field(), %failure, "Argument validation failed");
                self.format_error(ValidateError::Validation(failure), args, ctx)
            }),
        }
    }

    fn format_error(&self, error: ValidateError, args: &Arguments, ctx: &C) -> FieldError {
        (self.format_error)(FormatErrorParams { error, args, ctx })
    }
}

#[async_trait]
impl<C> FieldMiddleware<C> for ValidateMiddleware<C>
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
    ) -> Result<ConstValue, FieldError> {
        let validated = self.validated_args(&args, ctx).await?;

        next.resolve(root, validated, ctx, info)
            .await
            .map_err(|error| self.format_error(ValidateError::Resolver(error), &args, ctx))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use async_graphql_value::Name;

    use super::*;
    use crate::{
        diagnostic::{FieldCoordinate, TracingDiagnostics},
        error::UserInputError,
        expression::{Shape, string},
        validate::{
            ValidateProps,
            format::{ErrorFormat, FormatErrorParams, default_format_error},
        },
    };

    /// Echoes its arguments back as an object and counts its invocations
    #[derive(Default)]
    struct Spy {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl FieldResolver<()> for Spy {
        async fn resolve(
            &self,
            _root: &ConstValue,
            args: Arguments,
            _ctx: &(),
            _info: &ResolveInfo,
        ) -> Result<ConstValue, FieldError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ConstValue::Object(args))
        }
    }

    fn middleware(props: ValidateProps<()>) -> ValidateMiddleware<()> {
        let normalizer = ValidationNormalizer::new(
            FieldCoordinate::new("Mutation", "validate"),
            Arc::new(TracingDiagnostics),
        );
        let rule = normalizer.prepare(&props);

        ValidateMiddleware::new(
            rule,
            normalizer,
            Arc::new(|params| default_format_error(ErrorFormat::Map, params)),
        )
    }

    fn info() -> ResolveInfo {
        ResolveInfo {
            parent_type: "Mutation".to_string(),
            field_name: "validate".to_string(),
            return_type: "User".to_string(),
        }
    }

    fn email_args(email: &str) -> Arguments {
        [
            (Name::new("email"), ConstValue::String(email.into())),
            (Name::new("id"), ConstValue::Number(1.into())),
        ]
        .into_iter()
        .collect()
    }

    #[test_log::test(tokio::test)]
    async fn resolver_does_not_run_on_failure() {
        let spy = Spy::default();
        let middleware = middleware(ValidateProps::shape(
            Shape::new().field("email", string().email()),
        ));

        let error = middleware
            .around(&ConstValue::Null, email_args("bad@email"), &(), &info(), &spy)
            .await
            .unwrap_err();

        assert_eq!(spy.calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            error.user_input(),
            Some(&UserInputError::validation_errors([("email", "Invalid email")]))
        );
    }

    #[tokio::test]
    async fn resolver_receives_all_arguments_on_success() {
        let spy = Spy::default();
        let middleware = middleware(ValidateProps::shape(
            Shape::new().field("email", string().trim().email()),
        ));

        let value = middleware
            .around(&ConstValue::Null, email_args(" god@email.com "), &(), &info(), &spy)
            .await
            .unwrap();

        assert_eq!(spy.calls.load(Ordering::SeqCst), 1);
        assert_eq!(value, ConstValue::Object(email_args("god@email.com")));
    }

    #[tokio::test]
    async fn resolver_errors_are_formatted() {
        let formatted = Arc::new(AtomicUsize::new(0));
        let normalizer = ValidationNormalizer::new(
            FieldCoordinate::new("Mutation", "validate"),
            Arc::new(TracingDiagnostics),
        );
        let rule = normalizer.prepare(&ValidateProps::shape(
            Shape::new().field("email", string().email()),
        ));
        let middleware = ValidateMiddleware::new(rule, normalizer, {
            let formatted = formatted.clone();
            Arc::new(move |params: FormatErrorParams<'_, ()>| {
                formatted.fetch_add(1, Ordering::SeqCst);
                match params.error {
                    ValidateError::Resolver(error) => {
                        FieldError::Generic(format!("{error} ({} arguments)", params.args.len()))
                    }
                    ValidateError::Validation(failure) => FieldError::Generic(failure.to_string()),
                }
            })
        });
        let failing = crate::resolver::resolver_fn::<(), _>(|_root, _args, _ctx, _info| {
            Err(FieldError::Generic("db down".to_string()))
        });

        let error = middleware
            .around(
                &ConstValue::Null,
                email_args("god@email.com"),
                &(),
                &info(),
                failing.as_ref(),
            )
            .await
            .unwrap_err();

        assert_eq!(formatted.load(Ordering::SeqCst), 1);
        assert_eq!(error.to_string(), "db down (2 arguments)");
    }

    #[tokio::test]
    async fn validate_function_errors_pass_through() {
        let spy = Spy::default();
        let middleware = middleware(ValidateProps::function(|_, _| {
            Err(FieldError::Generic("lookup failed".to_string()))
        }));

        let error = middleware
            .around(&ConstValue::Null, email_args("god@email.com"), &(), &info(), &spy)
            .await
            .unwrap_err();

        assert_eq!(spy.calls.load(Ordering::SeqCst), 0);
        assert_eq!(error.to_string(), "lookup failed");
        assert_eq!(error.user_input(), None);
    }
}
