//! Sort directives: a field reference plus a direction
//!
//! Directive strings are parsed once, at the boundary, into a
//! [`SortDirective`]. Two spellings are accepted:
//!
//! - prefix form: `id` (ascending), `-id` (descending)
//! - suffix form: `id:asc`, `id:desc`
//!
//! ```rust,ignore
//! let newest_first: SortDirective = "-id".parse()?;
//! assert_eq!(newest_first, SortDirective::descending(FieldRef::id()));
//! ```

use crate::core::entity::Model;
use crate::core::error::CollectionError;
use regex::Regex;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// A validated reference to a record field, optionally dotted for nesting
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    name: String,
}

impl FieldRef {
    /// Validate and wrap a field name
    pub fn new(name: impl Into<String>) -> Result<Self, CollectionError> {
        let name = name.into();
        if Self::is_valid_name(&name) {
            Ok(Self { name })
        } else {
            Err(CollectionError::InvalidComparatorField { spec: name })
        }
    }

    /// The `id` field
    pub fn id() -> Self {
        Self {
            name: "id".to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve this field against an attribute map, walking dotted segments
    pub fn lookup<'a>(&self, attributes: &'a Map<String, Value>) -> Option<&'a Value> {
        let mut segments = self.name.split('.');
        let mut current = attributes.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    fn is_valid_name(name: &str) -> bool {
        static FIELD_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = FIELD_REGEX
            .get_or_init(|| Regex::new(r"^[A-Za-z0-9_]+(\.[A-Za-z0-9_]+)*$").unwrap());
        regex.is_match(name)
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// A field plus a direction, defining a total order over models
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortDirective {
    pub field: FieldRef,
    pub direction: Direction,
}

impl SortDirective {
    pub fn ascending(field: FieldRef) -> Self {
        Self {
            field,
            direction: Direction::Ascending,
        }
    }

    pub fn descending(field: FieldRef) -> Self {
        Self {
            field,
            direction: Direction::Descending,
        }
    }

    /// Compare two models under this directive
    pub fn compare<M: Model>(&self, a: &M, b: &M) -> Ordering {
        let ordering = a
            .field_value(&self.field)
            .compare(&b.field_value(&self.field));
        match self.direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }
}

impl Default for SortDirective {
    fn default() -> Self {
        Self::ascending(FieldRef::id())
    }
}

impl FromStr for SortDirective {
    type Err = CollectionError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let invalid = || CollectionError::InvalidComparatorField {
            spec: spec.to_string(),
        };

        let (name, direction) = if let Some((name, dir)) = spec.split_once(':') {
            let direction = match dir {
                "asc" => Direction::Ascending,
                "desc" => Direction::Descending,
                _ => return Err(invalid()),
            };
            (name, direction)
        } else if let Some(name) = spec.strip_prefix('-') {
            (name, Direction::Descending)
        } else {
            (spec, Direction::Ascending)
        };

        let field = FieldRef::new(name).map_err(|_| invalid())?;
        Ok(Self { field, direction })
    }
}

impl fmt::Display for SortDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Ascending => write!(f, "{}", self.field),
            Direction::Descending => write!(f, "-{}", self.field),
        }
    }
}
