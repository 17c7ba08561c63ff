// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! A small user directory whose mutations validate their arguments.
//!
//! Runs a fixed list of operations against the schema and prints each response. Set
//! `GRAPHQL_VALIDATE_ERROR_FORMAT` to `first`, `list` or `map` to change how validation failures
//! are reported.

use std::sync::Arc;

use async_graphql_value::ConstValue;
use graphql_validate::{
    Schema, ValidatePluginConfig,
    env::{EnvError, SystemEnvironment},
};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::info;

use crate::{schema::Context, store::UserStore};

mod logging;
mod schema;
mod store;

#[derive(Error)]
enum ExampleError {
    #[error("{0}")]
    Env(#[from] EnvError),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("Arguments of {0} must be an object")]
    InvalidArguments(String),
}

// Delegate to `Display` so that exiting with an error prints a readable message
impl std::fmt::Debug for ExampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

struct Operation {
    parent_type: &'static str,
    field_name: &'static str,
    args: Value,
}

fn operations() -> Vec<Operation> {
    vec![
        Operation {
            parent_type: "Query",
            field_name: "users",
            args: json!({}),
        },
        Operation {
            parent_type: "Mutation",
            field_name: "createUser",
            args: json!({
                "name": "Alex",
                "email": "bad@email",
                "age": 12,
                "website": "alex.dev",
                "secret": "hunter2"
            }),
        },
        Operation {
            parent_type: "Mutation",
            field_name: "createUser",
            args: json!({
                "name": "Alex",
                "email": " Alex@Example.com ",
                "age": "21",
                "website": "https://alex.dev",
                "secret": "hunter2"
            }),
        },
        Operation {
            parent_type: "Mutation",
            field_name: "updateUser",
            args: json!({ "id": 2, "name": "Mallory" }),
        },
        Operation {
            parent_type: "Mutation",
            field_name: "updateUser",
            args: json!({ "id": 1, "name": "Tester" }),
        },
        Operation {
            parent_type: "Query",
            field_name: "user",
            args: json!({ "email": "test@test.com" }),
        },
    ]
}

async fn execute(
    schema: &Schema<Context>,
    operation: &Operation,
    ctx: &Context,
) -> Result<Value, ExampleError> {
    let ConstValue::Object(args) = ConstValue::from_json(operation.args.clone())? else {
        return Err(ExampleError::InvalidArguments(operation.field_name.to_string()));
    };

    let response = match schema
        .resolve(
            operation.parent_type,
            operation.field_name,
            &ConstValue::Null,
            args,
            ctx,
        )
        .await
    {
        Ok(value) => json!({ "data": { operation.field_name: value.into_json()? } }),
        Err(error) => json!({
            "data": { operation.field_name: null },
            "errors": [error.to_graphql_error()],
        }),
    };

    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), ExampleError> {
    logging::init();

    let config = ValidatePluginConfig::from_env(&SystemEnvironment)?;
    let schema = schema::build(config);

    let ctx = Context {
        store: Arc::new(UserStore::seeded()),
        current_user: Some(1),
    };

    for operation in operations() {
        info!(
            parent_type = operation.parent_type,
            field_name = operation.field_name,
            "Executing operation"
        );

        let response = execute(&schema, &operation, &ctx).await?;
        println!(
            "{}.{}\n{}\n",
            operation.parent_type,
            operation.field_name,
            serde_json::to_string_pretty(&response)?
        );
    }

    Ok(())
}
