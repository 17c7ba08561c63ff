// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_value::{ConstValue, Number};

use super::{ArgumentPath, Expression, ValidationIssue, invalid_type};

#[derive(Debug, Clone, Copy)]
enum Bound<T> {
    Gte(T),
    Gt(T),
    Lte(T),
}

impl<T: PartialOrd + std::fmt::Display + Copy> Bound<T> {
    fn check(&self, value: T) -> Option<String> {
        match *self {
            Bound::Gte(min) if value < min => {
                Some(format!("Number must be greater than or equal to {min}"))
            }
            Bound::Gt(min) if value <= min => Some(format!("Number must be greater than {min}")),
            Bound::Lte(max) if value > max => {
                Some(format!("Number must be less than or equal to {max}"))
            }
            _ => None,
        }
    }
}

fn check_bounds<T: PartialOrd + std::fmt::Display + Copy>(
    bounds: &[Bound<T>],
    value: T,
    path: &ArgumentPath,
) -> Result<(), Vec<ValidationIssue>> {
    let issues: Vec<_> = bounds
        .iter()
        .filter_map(|bound| bound.check(value))
        .map(|message| ValidationIssue::new(path, message))
        .collect();

    if issues.is_empty() { Ok(()) } else { Err(issues) }
}

/// Accepts integers, coercing numeric strings (GraphQL `ID`s and such are often sent as strings).
#[derive(Debug, Clone, Default)]
pub struct IntExpression {
    bounds: Vec<Bound<i64>>,
}

pub fn int() -> IntExpression {
    IntExpression::default()
}

impl IntExpression {
    pub fn min(mut self, min: i64) -> Self {
        self.bounds.push(Bound::Gte(min));
        self
    }

    pub fn max(mut self, max: i64) -> Self {
        self.bounds.push(Bound::Lte(max));
        self
    }

    pub fn positive(mut self) -> Self {
        self.bounds.push(Bound::Gt(0));
        self
    }
}

impl Expression for IntExpression {
    fn validate(
        &self,
        value: &ConstValue,
        path: &ArgumentPath,
    ) -> Result<ConstValue, Vec<ValidationIssue>> {
        let parsed = match value {
            ConstValue::Number(number) if number.is_u64() && number.as_i64().is_none() => {
                return Err(vec![ValidationIssue::new(
                    path,
                    format!("Number must be less than or equal to {}", i64::MAX),
                )]);
            }
            ConstValue::Number(number) => number.as_i64().ok_or_else(|| {
                vec![ValidationIssue::new(
                    path,
                    "Expected integer, received float",
                )]
            })?,
            ConstValue::String(string) => string.trim().parse::<i64>().map_err(|_| {
                vec![ValidationIssue::new(
                    path,
                    format!("Expected integer, received string '{string}'"),
                )]
            })?,
            _ => return Err(invalid_type("integer", value, path)),
        };

        check_bounds(&self.bounds, parsed, path)?;

        Ok(ConstValue::Number(Number::from(parsed)))
    }
}

/// Accepts any finite number, coercing numeric strings.
#[derive(Debug, Clone, Default)]
pub struct FloatExpression {
    bounds: Vec<Bound<f64>>,
}

pub fn float() -> FloatExpression {
    FloatExpression::default()
}

impl FloatExpression {
    pub fn min(mut self, min: f64) -> Self {
        self.bounds.push(Bound::Gte(min));
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.bounds.push(Bound::Lte(max));
        self
    }
}

impl Expression for FloatExpression {
    fn validate(
        &self,
        value: &ConstValue,
        path: &ArgumentPath,
    ) -> Result<ConstValue, Vec<ValidationIssue>> {
        let parsed = match value {
            ConstValue::Number(number) => number.as_f64(),
            ConstValue::String(string) => string.trim().parse::<f64>().ok(),
            _ => return Err(invalid_type("number", value, path)),
        };

        let number = parsed.and_then(|parsed| Number::from_f64(parsed).map(|n| (parsed, n)));

        match number {
            Some((parsed, number)) => {
                check_bounds(&self.bounds, parsed, path)?;
                Ok(ConstValue::Number(number))
            }
            None => Err(vec![ValidationIssue::new(
                path,
                format!("Expected number, received {}", super::received_type(value)),
            )]),
        }
    }
}
