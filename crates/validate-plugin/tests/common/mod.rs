// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_graphql_value::ConstValue;
use graphql_validate::{
    Arguments, FieldDefinition, FieldResolver, Schema, ValidatePlugin, ValidatePluginConfig,
    diagnostic::RecordedDiagnostics, resolver_fn,
};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
}

#[derive(Debug, Clone)]
pub struct TestContext {
    pub user: User,
}

impl TestContext {
    pub fn for_user(id: i64) -> Self {
        Self { user: User { id } }
    }
}

/// A resolver returning the arguments it was called with, counting its invocations
pub struct Echo {
    calls: Arc<AtomicUsize>,
}

impl Echo {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn resolver(&self) -> Arc<dyn FieldResolver<TestContext>> {
        let calls = self.calls.clone();

        resolver_fn(move |_root, args, _ctx: &TestContext, _info| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(ConstValue::Object(args))
        })
    }
}

pub fn args(value: Value) -> Arguments {
    match ConstValue::from_json(value).unwrap() {
        ConstValue::Object(args) => args,
        other => panic!("Expected an object, got {other}"),
    }
}

pub fn to_json(value: ConstValue) -> Value {
    value.into_json().unwrap()
}

pub fn build_schema(
    field: FieldDefinition<TestContext>,
    config: ValidatePluginConfig<TestContext>,
) -> (Schema<TestContext>, Arc<RecordedDiagnostics>) {
    let diagnostics = Arc::new(RecordedDiagnostics::new());

    let schema = Schema::builder()
        .field(field)
        .plugin(ValidatePlugin::new(
            config.with_diagnostics(diagnostics.clone()),
        ))
        .build();

    (schema, diagnostics)
}
