//! Hierarchical participant names.
//!
//! An `ActorRef` identifies one participant as a path of name segments below
//! a distinguished root (e.g. `region-12/household-3/person-7`). The engine
//! only relies on identity equality and on reaching the aggregation root;
//! encoding is owned by the identity collaborator.

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::ValidationError;

/// Path separator used by the string encoding.
const SEPARATOR: char = '/';

/// Hierarchical participant name: a value plus an optional parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActorRef {
    value: String,
    parent: Option<Arc<ActorRef>>,
}

impl ActorRef {
    /// Creates a root name (no parent).
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the value is empty
    /// - `InvalidFormat` if the value contains the path separator
    pub fn root(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = Self::validate_segment(value.into())?;
        Ok(Self {
            value,
            parent: None,
        })
    }

    /// Creates a child name below this one.
    pub fn child(&self, value: impl Into<String>) -> Result<ActorRef, ValidationError> {
        let value = Self::validate_segment(value.into())?;
        Ok(ActorRef {
            value,
            parent: Some(Arc::new(self.clone())),
        })
    }

    /// Parses a name from its path encoding (`root/child/grandchild`).
    pub fn parse(path: &str) -> Result<Self, ValidationError> {
        let mut segments = path.split(SEPARATOR);
        let first = segments
            .next()
            .ok_or_else(|| ValidationError::empty_field("actor_ref"))?;
        let mut current = Self::root(first)?;
        for segment in segments {
            current = current.child(segment)?;
        }
        Ok(current)
    }

    /// Returns this name's own segment.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the parent name, if any.
    pub fn parent(&self) -> Option<&ActorRef> {
        self.parent.as_deref()
    }

    /// Returns true if this name has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Walks up to the distinguished root of this name.
    pub fn root_ref(&self) -> &ActorRef {
        let mut current = self;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Returns the full path encoding of this name.
    pub fn path(&self) -> String {
        match self.parent() {
            Some(parent) => format!("{}{}{}", parent.path(), SEPARATOR, self.value),
            None => self.value.clone(),
        }
    }

    fn validate_segment(value: String) -> Result<String, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::empty_field("actor_ref"));
        }
        if value.contains(SEPARATOR) {
            return Err(ValidationError::invalid_format(
                "actor_ref",
                format!("segment may not contain '{}'", SEPARATOR),
            ));
        }
        Ok(value)
    }
}

impl fmt::Display for ActorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

impl Serialize for ActorRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path())
    }
}

impl<'de> Deserialize<'de> for ActorRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PathVisitor;

        impl Visitor<'_> for PathVisitor {
            type Value = ActorRef;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a '/'-separated actor name path")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                ActorRef::parse(v).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(PathVisitor)
    }
}
