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

/// Validates every element of a list with the same expression.
#[derive(Debug, Clone)]
pub struct ListExpression<E> {
    element: E,
    min_len: Option<usize>,
    max_len: Option<usize>,
}

pub fn list<E: Expression>(element: E) -> ListExpression<E> {
    ListExpression {
        element,
        min_len: None,
        max_len: None,
    }
}

impl<E> ListExpression<E> {
    pub fn min_len(mut self, min_len: usize) -> Self {
        self.min_len = Some(min_len);
        self
    }

    pub fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }
}

impl<E: Expression> Expression for ListExpression<E> {
    fn validate(
        &self,
        value: &ConstValue,
        path: &ArgumentPath,
    ) -> Result<ConstValue, Vec<ValidationIssue>> {
        let ConstValue::List(elements) = value else {
            return Err(invalid_type("array", value, path));
        };

        let mut issues = vec![];

        if let Some(min_len) = self.min_len
            && elements.len() < min_len
        {
            issues.push(ValidationIssue::new(
                path,
                format!("Array must contain at least {min_len} element(s)"),
            ));
        }
        if let Some(max_len) = self.max_len
            && elements.len() > max_len
        {
            issues.push(ValidationIssue::new(
                path,
                format!("Array must contain at most {max_len} element(s)"),
            ));
        }

        let mut validated = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            match self.element.validate(element, &path.index(index)) {
                Ok(element) => validated.push(element),
                Err(element_issues) => issues.extend(element_issues),
            }
        }

        if issues.is_empty() {
            Ok(ConstValue::List(validated))
        } else {
            Err(issues)
        }
    }
}
