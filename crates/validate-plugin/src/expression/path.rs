// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::{self, Display};

/// A single step into a nested argument value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{key}"),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Location of a value within the argument set of a field.
///
/// The first segment is always the argument name (when the path is not empty); the following
/// segments address nested object keys and list indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ArgumentPath(Vec<PathSegment>);

impl ArgumentPath {
    pub fn root() -> Self {
        Self(vec![])
    }

    pub fn key(&self, key: impl Into<String>) -> Self {
        self.child(PathSegment::Key(key.into()))
    }

    pub fn index(&self, index: usize) -> Self {
        self.child(PathSegment::Index(index))
    }

    fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// The top-level argument this path belongs to
    pub fn argument(&self) -> Option<&PathSegment> {
        self.0.first()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for ArgumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl<const N: usize> From<[PathSegment; N]> for ArgumentPath {
    fn from(segments: [PathSegment; N]) -> Self {
        Self(segments.to_vec())
    }
}

/// A value that did not satisfy its expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub path: ArgumentPath,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: &ArgumentPath, message: impl Into<String>) -> Self {
        Self {
            path: path.clone(),
            message: message.into(),
        }
    }
}

impl Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_path_display() {
        let path = ArgumentPath::root().key("input").key("tags").index(2);

        assert_eq!(path.to_string(), "input.tags.2");
        assert_eq!(path.argument(), Some(&PathSegment::Key("input".into())));
    }

    #[test]
    fn issue_display_without_path() {
        let issue = ValidationIssue::new(&ArgumentPath::root(), "Required");

        assert_eq!(issue.to_string(), "Required");
    }
}
