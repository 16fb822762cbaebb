//! Named, colored labels that can be attached to many notes.

use super::TagId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Color given to tags created without an explicit one.
pub const DEFAULT_TAG_COLOR: &str = "#6200EE";

/// A label that is managed independently of notes.
///
/// Names are intended to be unique but the store does not enforce it;
/// deleting a tag only detaches it from its notes.
///
/// # Examples
///
/// ```
/// use notebox::domain::{Tag, DEFAULT_TAG_COLOR};
///
/// let tag = Tag::new("Home");
/// assert_eq!(tag.color(), DEFAULT_TAG_COLOR);
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    id: Option<TagId>,
    name: String,
    color: String,
}

impl Tag {
    /// Creates an unsaved tag with the default color.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_color(name, DEFAULT_TAG_COLOR)
    }

    /// Creates an unsaved tag with a specific color.
    pub fn with_color(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            color: color.into(),
        }
    }

    /// Returns the tag id, if the tag has been saved.
    pub fn id(&self) -> Option<TagId> {
        self.id
    }

    /// Returns the tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the color specifier.
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Returns a copy of this tag carrying the given id.
    pub fn with_id(mut self, id: TagId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "Tag({}, \"{}\")", id, self.name),
            None => write!(f, "Tag(\"{}\")", self.name),
        }
    }
}
