use std::fmt;

/// One step in a coding path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// Entered a record (by name).
    Record(String),
    /// Entered a field of the current record.
    Field(String),
    /// Entered a sequence element.
    Index(usize),
}

/// Where in the object graph the encoder or decoder currently is.
///
/// Only used for diagnostics: every error message carries the path at which
/// it was raised, e.g. `school-1.students[2]/person-7.name`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodingPath(Vec<PathSegment>);

impl CodingPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.0.pop()
    }

    /// A copy of this path extended by one segment.
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut path = self.clone();
        path.push(segment);
        path
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render with one extra trailing field, without allocating a new path.
    pub fn with_field(&self, field: &str) -> String {
        if self.0.is_empty() {
            field.to_string()
        } else {
            format!("{self}.{field}")
        }
    }
}

impl fmt::Display for CodingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Record(name) if i == 0 => write!(f, "{name}")?,
                PathSegment::Record(name) => write!(f, "/{name}")?,
                PathSegment::Field(name) if i == 0 => write!(f, "{name}")?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}
