// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_value::{ConstValue, Name, indexmap::IndexMap};

use super::{
    ArgumentPath, BoxedExpression, Expression, ExpressionExt, ValidationIssue, invalid_type,
};

pub(crate) type ShapeEntries = IndexMap<String, BoxedExpression>;

/// A mapping from key (argument name or input-object field) to the expression validating it.
///
/// An entry may be declared without an expression (`None`); such entries are stripped before
/// validation, so the key behaves exactly like any other undeclared key and passes through
/// unchanged.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    entries: IndexMap<String, Option<BoxedExpression>>,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, expression: impl ExpressionExt) -> Self {
        self.insert(name, Some(expression.boxed()));
        self
    }

    pub fn maybe_field(
        mut self,
        name: impl Into<String>,
        expression: Option<BoxedExpression>,
    ) -> Self {
        self.insert(name, expression);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, expression: Option<BoxedExpression>) {
        self.entries.insert(name.into(), expression);
    }

    /// Number of declared entries (including those without an expression)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> ShapeEntries {
        self.entries
            .into_iter()
            .filter_map(|(name, expression)| expression.map(|expression| (name, expression)))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, Option<BoxedExpression>)> for Shape {
    fn from_iter<T: IntoIterator<Item = (S, Option<BoxedExpression>)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, expression)| (name.into(), expression))
                .collect(),
        }
    }
}

/// Validate the declared entries of `values`.
///
/// Returns only the validated keys (so callers decide what happens to the undeclared ones).
/// Issues are collected for every entry in declaration order.
pub(crate) fn validate_entries(
    entries: &ShapeEntries,
    values: &IndexMap<Name, ConstValue>,
    path: &ArgumentPath,
) -> Result<IndexMap<Name, ConstValue>, Vec<ValidationIssue>> {
    let mut validated = IndexMap::new();
    let mut issues = vec![];

    for (name, expression) in entries {
        let entry_path = path.key(name.as_str());

        match values.get(name.as_str()) {
            Some(value) => match expression.validate(value, &entry_path) {
                Ok(value) => {
                    validated.insert(Name::new(name), value);
                }
                Err(entry_issues) => issues.extend(entry_issues),
            },
            None if expression.accepts_missing() => {}
            None => issues.push(ValidationIssue::new(&entry_path, "Required")),
        }
    }

    if issues.is_empty() {
        Ok(validated)
    } else {
        Err(issues)
    }
}

/// Validates an input object against a nested [`Shape`]. Undeclared keys are kept as-is.
#[derive(Debug, Clone)]
pub struct ObjectExpression {
    entries: ShapeEntries,
}

pub fn object(shape: Shape) -> ObjectExpression {
    ObjectExpression {
        entries: shape.into_entries(),
    }
}

impl Expression for ObjectExpression {
    fn validate(
        &self,
        value: &ConstValue,
        path: &ArgumentPath,
    ) -> Result<ConstValue, Vec<ValidationIssue>> {
        let ConstValue::Object(fields) = value else {
            return Err(invalid_type("object", value, path));
        };

        let validated = validate_entries(&self.entries, fields, path)?;

        let mut merged = fields.clone();
        merged.extend(validated);

        Ok(ConstValue::Object(merged))
    }
}
