// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use async_graphql_value::{ConstValue, from_value, to_value};
use async_trait::async_trait;
use futures::FutureExt;
use graphql_validate::{
    Arguments, FieldDefinition, FieldError, FieldResolver, ResolveInfo, Schema, UserInputError,
    ValidatePlugin, ValidatePluginConfig, ValidateProps,
    expression::{ExpressionExt, Shape, StringExpression, int, string},
};
use serde::Serialize;

use crate::store::{UserStore, UserUpdate};

pub struct Context {
    pub store: Arc<UserStore>,
    /// The id of the user making the request
    pub current_user: Option<i64>,
}

#[derive(Debug, Clone, Copy)]
enum UserResolver {
    Users,
    User,
    Friends,
    CreateUser,
    UpdateUser,
}

#[async_trait]
impl FieldResolver<Context> for UserResolver {
    async fn resolve(
        &self,
        _root: &ConstValue,
        args: Arguments,
        ctx: &Context,
        _info: &ResolveInfo,
    ) -> Result<ConstValue, FieldError> {
        match self {
            UserResolver::Users | UserResolver::Friends => to_graphql(&ctx.store.list().await),
            UserResolver::User => {
                let user = match args.get("email") {
                    Some(ConstValue::String(email)) => ctx.store.find_by_email(email).await,
                    _ => None,
                };
                to_graphql(&user)
            }
            UserResolver::CreateUser => {
                let new_user = from_value(ConstValue::Object(args)).map_err(FieldError::delegate)?;
                let user = ctx
                    .store
                    .create(new_user)
                    .await
                    .map_err(FieldError::delegate)?;
                to_graphql(&user)
            }
            UserResolver::UpdateUser => {
                let update: UserUpdate =
                    from_value(ConstValue::Object(args)).map_err(FieldError::delegate)?;
                let user = ctx.store.update(update).await.map_err(FieldError::delegate)?;
                to_graphql(&user)
            }
        }
    }
}

fn to_graphql(value: &impl Serialize) -> Result<ConstValue, FieldError> {
    to_value(value).map_err(FieldError::delegate)
}

fn email() -> StringExpression {
    string().trim().to_lowercase().email()
}

/// Only the current user may update their record, and only with valid values.
fn update_user_rule() -> ValidateProps<Context> {
    ValidateProps::function_async(|args, ctx: &Context| {
        async move {
            let id = match args.get("id") {
                Some(ConstValue::Number(id)) => id.as_i64(),
                _ => None,
            };

            let Some(id) = id.filter(|id| ctx.current_user == Some(*id)) else {
                return Err(FieldError::from(UserInputError::validation_errors([(
                    "id",
                    "invalid id",
                )])));
            };

            if ctx.store.find(id).await.is_none() {
                return Err(FieldError::from(UserInputError::validation_errors([(
                    "id",
                    "User not found",
                )])));
            }

            Ok(Some(
                Shape::new()
                    .field("name", string().trim().min(1).optional())
                    .field("email", email().optional()),
            ))
        }
        .boxed()
    })
}

pub fn build(config: ValidatePluginConfig<Context>) -> Schema<Context> {
    Schema::<Context>::builder()
        .field(FieldDefinition::new(
            "Query",
            "users",
            "[User!]!",
            Arc::new(UserResolver::Users),
        ))
        .field(
            FieldDefinition::new("Query", "user", "User", Arc::new(UserResolver::User))
                .argument("email", "String")
                .validate(ValidateProps::function(|_, _: &Context| {
                    Ok(Some(Shape::new().field("email", email())))
                })),
        )
        .field(
            FieldDefinition::new("User", "friends", "[User!]", Arc::new(UserResolver::Friends))
                .argument("email", "String")
                .validate(ValidateProps::shape(Shape::new().field("email", email()))),
        )
        .field(
            FieldDefinition::new(
                "Mutation",
                "createUser",
                "User",
                Arc::new(UserResolver::CreateUser),
            )
            .argument("name", "String")
            .argument("email", "String")
            .argument("age", "Int")
            .argument("website", "String")
            .argument("secret", "String")
            .validate(ValidateProps::shape(
                Shape::new()
                    .field("name", string())
                    .field("email", email())
                    .field("age", int().min(18))
                    .field("website", string().url())
                    .field("secret", string()),
            )),
        )
        .field(
            FieldDefinition::new(
                "Mutation",
                "updateUser",
                "User",
                Arc::new(UserResolver::UpdateUser),
            )
            .argument("id", "Int!")
            .argument("name", "String")
            .argument("email", "String")
            .validate(update_user_rule()),
        )
        .plugin(ValidatePlugin::new(config))
        .build()
}
