// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_value::ConstValue;

use super::{ArgumentPath, Expression, ValidationIssue, invalid_type};

/// Accepts booleans and the strings `"true"` and `"false"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanExpression;

pub fn boolean() -> BooleanExpression {
    BooleanExpression
}

impl Expression for BooleanExpression {
    fn validate(
        &self,
        value: &ConstValue,
        path: &ArgumentPath,
    ) -> Result<ConstValue, Vec<ValidationIssue>> {
        match value {
            ConstValue::Boolean(_) => Ok(value.clone()),
            ConstValue::String(string) if string == "true" => Ok(ConstValue::Boolean(true)),
            ConstValue::String(string) if string == "false" => Ok(ConstValue::Boolean(false)),
            _ => Err(invalid_type("boolean", value, path)),
        }
    }
}

/// Accepts one of a fixed set of values, given either as GraphQL enum values or as strings.
#[derive(Debug, Clone)]
pub struct EnumExpression {
    variants: Vec<String>,
}

pub fn enumeration<I, S>(variants: I) -> EnumExpression
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    EnumExpression {
        variants: variants.into_iter().map(Into::into).collect(),
    }
}

impl EnumExpression {
    fn expected(&self) -> String {
        self.variants
            .iter()
            .map(|variant| format!("'{variant}'"))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl Expression for EnumExpression {
    fn validate(
        &self,
        value: &ConstValue,
        path: &ArgumentPath,
    ) -> Result<ConstValue, Vec<ValidationIssue>> {
        let received = match value {
            ConstValue::String(string) => string.as_str(),
            ConstValue::Enum(name) => name.as_str(),
            _ => return Err(invalid_type(&self.expected(), value, path)),
        };

        if self.variants.iter().any(|variant| variant == received) {
            Ok(value.clone())
        } else {
            Err(vec![ValidationIssue::new(
                path,
                format!(
                    "Invalid enum value. Expected {}, received '{received}'",
                    self.expected()
                ),
            )])
        }
    }
}
