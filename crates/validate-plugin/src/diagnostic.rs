// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Developer-facing diagnostics about misconfigured validation.
//!
//! These are never part of a GraphQL response. They are reported once (at schema build time) or
//! per invocation (for shapes produced by validate functions), and never stop the field from
//! resolving.

use std::{
    fmt::{self, Display},
    sync::Mutex,
};

use tracing::warn;

/// Identifies a field as `ParentType.field`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldCoordinate {
    pub parent_type: String,
    pub field_name: String,
}

impl FieldCoordinate {
    pub fn new(parent_type: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            parent_type: parent_type.into(),
            field_name: field_name.into(),
        }
    }
}

impl Display for FieldCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.parent_type, self.field_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Severity {
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// The field declares a validation rule but takes no arguments
    MissingArguments,
    /// The validation shape has no (non-empty) entries
    EmptyShape,
    /// The `validate` extension holds something other than a validation rule
    UnsupportedValidateAttribute { found: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub field: FieldCoordinate,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn missing_arguments(field: &FieldCoordinate) -> Self {
        Self {
            severity: Severity::Warning,
            message: format!(
                "[{field}] does not have any arguments, but a validate rule was passed"
            ),
            field: field.clone(),
            kind: DiagnosticKind::MissingArguments,
        }
    }

    pub fn empty_shape(field: &FieldCoordinate) -> Self {
        Self {
            severity: Severity::Warning,
            message: format!("[{field}] does not have any keys in its validation shape"),
            field: field.clone(),
            kind: DiagnosticKind::EmptyShape,
        }
    }

    pub fn unsupported_validate_attribute(
        field: &FieldCoordinate,
        field_type: &str,
        found: &str,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            message: format!(
                "The validate property provided to [{}] with type [{field_type}] should be a function or a shape, saw [{found}]",
                field.field_name
            ),
            field: field.clone(),
            kind: DiagnosticKind::UnsupportedValidateAttribute {
                found: found.to_string(),
            },
        }
    }
}

/// Receives diagnostics emitted by the validate plugin.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Reports diagnostics as `tracing` events (the default).
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn emit(&self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => warn!(
                field = %diagnostic.field,
                kind = ?diagnostic.kind,
                "{}",
                diagnostic.message
            ),
        }
    }
}

/// Keeps diagnostics in memory (useful to surface them in tooling or to assert on them).
#[derive(Debug, Default)]
pub struct RecordedDiagnostics {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl RecordedDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(
            &mut *self
                .diagnostics
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }
}

impl DiagnosticSink for RecordedDiagnostics {
    fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(diagnostic);
    }
}
