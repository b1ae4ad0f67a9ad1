// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of gcp-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// An opaque identifier naming a cloud entity (project, zone, diagram node).
///
/// Only non-emptiness and the absence of `/` are enforced: identifiers are
/// spliced into REST paths like `projects/<id>/zones/<zone>` and resource URIs
/// like `gcp://<project>/instances`, so a slash would change the addressed
/// resource. Everything else is left to the cloud provider to reject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        validate_id_segment(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// Identifier from a compile-time constant known to be valid.
    pub(crate) fn from_static(value: &'static str) -> Self {
        debug_assert!(validate_id_segment(value).is_ok(), "invalid static id: {value:?}");
        Self {
            value: value.to_owned(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T> Borrow<str> for Id<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim().to_owned())
    }
}

impl<T> TryFrom<String> for Id<T> {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    Empty,
    ContainsSlash,
    ContainsWhitespace,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("id must not be empty"),
            Self::ContainsSlash => f.write_str("id must not contain '/'"),
            Self::ContainsWhitespace => f.write_str("id must not contain whitespace"),
        }
    }
}

impl std::error::Error for IdError {}

fn validate_id_segment(value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty);
    }
    if value.contains('/') {
        return Err(IdError::ContainsSlash);
    }
    if value.chars().any(char::is_whitespace) {
        return Err(IdError::ContainsWhitespace);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProjectIdTag {}
pub type ProjectId = Id<ProjectIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ZoneTag {}
pub type Zone = Id<ZoneTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeIdTag {}
pub type NodeId = Id<NodeIdTag>;

#[cfg(test)]
mod tests {
    use super::{IdError, ProjectId, Zone};

    #[test]
    fn accepts_plain_segments() {
        let project = ProjectId::new("my-project-123").expect("project id");
        assert_eq!(project.as_str(), "my-project-123");
        assert_eq!(project.to_string(), "my-project-123");
    }

    #[test]
    fn rejects_empty_and_path_like_values() {
        assert_eq!(ProjectId::new("").unwrap_err(), IdError::Empty);
        assert_eq!(Zone::new("us-central1-a/extra").unwrap_err(), IdError::ContainsSlash);
        assert_eq!(ProjectId::new("a b").unwrap_err(), IdError::ContainsWhitespace);
    }

    #[test]
    fn from_str_trims_surrounding_whitespace() {
        let zone: Zone = "  europe-west1-b \n".parse().expect("zone");
        assert_eq!(zone.as_str(), "europe-west1-b");
    }
}
