//! Facilities for working with paths within schemas or validated instances.
use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use serde::{Serialize, Serializer};

/// A location segment.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LocationSegment<'a> {
    /// Property name within a JSON object or a JSON Schema keyword.
    Property(&'a str),
    /// Index within a JSON array.
    Index(usize),
}

impl fmt::Display for LocationSegment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationSegment::Property(property) => f.write_str(property),
            LocationSegment::Index(idx) => f.write_str(itoa::Buffer::new().format(*idx)),
        }
    }
}

impl LocationSegment<'_> {
    // `allOf/0` in a schema fragment and `/0` in an instance are the same segment
    fn same_as(&self, other: &LocationSegment<'_>) -> bool {
        match (self, other) {
            (LocationSegment::Property(left), LocationSegment::Property(right)) => left == right,
            (LocationSegment::Index(left), LocationSegment::Index(right)) => left == right,
            (LocationSegment::Property(property), LocationSegment::Index(idx))
            | (LocationSegment::Index(idx), LocationSegment::Property(property)) => {
                *property == itoa::Buffer::new().format(*idx)
            }
        }
    }
}

impl<'a> From<&'a str> for LocationSegment<'a> {
    #[inline]
    fn from(value: &'a str) -> LocationSegment<'a> {
        LocationSegment::Property(value)
    }
}

impl<'a> From<&'a String> for LocationSegment<'a> {
    #[inline]
    fn from(value: &'a String) -> LocationSegment<'a> {
        LocationSegment::Property(value)
    }
}

impl<'a> From<&'a Arc<str>> for LocationSegment<'a> {
    #[inline]
    fn from(value: &'a Arc<str>) -> LocationSegment<'a> {
        LocationSegment::Property(value)
    }
}

impl From<usize> for LocationSegment<'_> {
    #[inline]
    fn from(value: usize) -> Self {
        LocationSegment::Index(value)
    }
}

#[derive(Debug)]
enum Segment {
    Property(Arc<str>),
    Index(usize),
}

impl Segment {
    fn as_ref(&self) -> LocationSegment<'_> {
        match self {
            Segment::Property(property) => LocationSegment::Property(property),
            Segment::Index(idx) => LocationSegment::Index(*idx),
        }
    }
}

#[derive(Debug)]
struct Node {
    segment: Segment,
    parent: Location,
    depth: usize,
}

/// An immutable, structurally shared JSON pointer.
///
/// Appending a segment never touches the parent: the new location points to it, so locations
/// built during one evaluation share their common prefix. Used for evaluation paths, instance
/// locations and schema location fragments.
#[derive(Clone, Default)]
pub struct Location(Option<Arc<Node>>);

impl Location {
    /// Create a new, empty `Location`.
    #[must_use]
    pub const fn new() -> Self {
        Self(None)
    }
    /// Parse a JSON pointer, e.g. `/properties/a~1b`.
    ///
    /// Tokens are kept as property names, the leading `/` is optional.
    #[must_use]
    pub fn from_pointer(pointer: &str) -> Self {
        let mut location = Location::new();
        if pointer.is_empty() {
            return location;
        }
        let pointer = pointer.strip_prefix('/').unwrap_or(pointer);
        for token in pointer.split('/') {
            let token = token.replace("~1", "/").replace("~0", "~");
            location = location.push(Segment::Property(token.into()));
        }
        location
    }
    fn push(&self, segment: Segment) -> Self {
        Self(Some(Arc::new(Node {
            segment,
            parent: self.clone(),
            depth: self.len() + 1,
        })))
    }
    /// A new location with `segment` appended.
    #[must_use]
    pub fn join<'a>(&self, segment: impl Into<LocationSegment<'a>>) -> Self {
        match segment.into() {
            LocationSegment::Property(property) => self.push(Segment::Property(property.into())),
            LocationSegment::Index(idx) => self.push(Segment::Index(idx)),
        }
    }
    /// Same as [`Location::join`] without copying an already shared name.
    #[must_use]
    pub(crate) fn join_shared(&self, name: &Arc<str>) -> Self {
        self.push(Segment::Property(Arc::clone(name)))
    }
    /// Append every segment of `other`.
    #[must_use]
    pub fn extend(&self, other: &Location) -> Self {
        let mut location = self.clone();
        for segment in other.segments() {
            location = location.join(segment);
        }
        location
    }
    /// The location without its last segment.
    #[must_use]
    pub fn parent(&self) -> Option<Location> {
        self.0.as_ref().map(|node| node.parent.clone())
    }
    #[must_use]
    pub fn last(&self) -> Option<LocationSegment<'_>> {
        self.0.as_ref().map(|node| node.segment.as_ref())
    }
    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.as_ref().map_or(0, |node| node.depth)
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
    /// Segments from the root to the last one.
    #[must_use]
    pub fn segments(&self) -> Vec<LocationSegment<'_>> {
        let mut segments = Vec::with_capacity(self.len());
        let mut head = self;
        while let Some(node) = &head.0 {
            segments.push(node.segment.as_ref());
            head = &node.parent;
        }
        segments.reverse();
        segments
    }
    fn ancestor(&self, depth: usize) -> &Location {
        let mut head = self;
        while head.len() > depth {
            match &head.0 {
                Some(node) => head = &node.parent,
                None => break,
            }
        }
        head
    }
    /// Whether `prefix` is equal to this location or to one of its ancestors.
    #[must_use]
    pub fn starts_with(&self, prefix: &Location) -> bool {
        if prefix.len() > self.len() {
            return false;
        }
        self.ancestor(prefix.len()) == prefix
    }
    /// JSON pointer representation.
    #[must_use]
    pub fn as_pointer(&self) -> String {
        self.to_string()
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Location) -> bool {
        let (mut left, mut right) = (self, other);
        if left.len() != right.len() {
            return false;
        }
        loop {
            match (&left.0, &right.0) {
                (None, None) => return true,
                (Some(l), Some(r)) => {
                    if Arc::ptr_eq(l, r) {
                        return true;
                    }
                    if !l.segment.as_ref().same_as(&r.segment.as_ref()) {
                        return false;
                    }
                    left = &l.parent;
                    right = &r.parent;
                }
                _ => return false,
            }
        }
    }
}

impl Eq for Location {}

impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut head = self;
        let mut buffer = itoa::Buffer::new();
        while let Some(node) = &head.0 {
            match &node.segment {
                Segment::Property(property) => property.hash(state),
                Segment::Index(idx) => buffer.format(*idx).hash(state),
            }
            head = &node.parent;
        }
        self.len().hash(state);
    }
}

pub(crate) fn write_escaped_str(buffer: &mut String, value: &str) {
    match value.find(['~', '/']) {
        Some(mut escape_idx) => {
            let mut remaining = value;
            loop {
                let (before, after) = remaining.split_at(escape_idx);
                buffer.push_str(before);
                match after.as_bytes()[0] {
                    b'~' => buffer.push_str("~0"),
                    b'/' => buffer.push_str("~1"),
                    _ => unreachable!(),
                }
                remaining = &after[1..];
                if let Some(next_escape_idx) = remaining.find(['~', '/']) {
                    escape_idx = next_escape_idx;
                } else {
                    buffer.push_str(remaining);
                    break;
                }
            }
        }
        None => buffer.push_str(value),
    };
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buffer = String::new();
        for segment in self.segments() {
            buffer.push('/');
            match segment {
                LocationSegment::Property(property) => write_escaped_str(&mut buffer, property),
                LocationSegment::Index(idx) => {
                    buffer.push_str(itoa::Buffer::new().format(idx));
                }
            }
        }
        f.write_str(&buffer)
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Location").field(&self.to_string()).finish()
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'a> FromIterator<LocationSegment<'a>> for Location {
    fn from_iter<T: IntoIterator<Item = LocationSegment<'a>>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Location::new(), |location, segment| location.join(segment))
    }
}

/// Where a schema construct is textually defined: the absolute IRI of its schema resource and
/// a JSON pointer from the resource root.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SchemaLocation {
    absolute_iri: Arc<str>,
    fragment: Location,
}

impl SchemaLocation {
    #[must_use]
    pub fn new(absolute_iri: Arc<str>, fragment: Location) -> Self {
        Self {
            absolute_iri,
            fragment,
        }
    }
    /// IRI of the schema resource, without a fragment.
    #[must_use]
    pub fn absolute_iri(&self) -> &str {
        &self.absolute_iri
    }
    #[must_use]
    pub fn fragment(&self) -> &Location {
        &self.fragment
    }
    #[must_use]
    pub fn join<'a>(&self, segment: impl Into<LocationSegment<'a>>) -> Self {
        Self {
            absolute_iri: Arc::clone(&self.absolute_iri),
            fragment: self.fragment.join(segment),
        }
    }
    /// The location of the enclosing schema construct.
    #[must_use]
    pub fn parent(&self) -> Self {
        Self {
            absolute_iri: Arc::clone(&self.absolute_iri),
            fragment: self.fragment.parent().unwrap_or_default(),
        }
    }
}

impl fmt::Display for SchemaLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.absolute_iri, self.fragment)
    }
}

impl fmt::Debug for SchemaLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SchemaLocation")
            .field(&self.to_string())
            .finish()
    }
}

impl Serialize for SchemaLocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
