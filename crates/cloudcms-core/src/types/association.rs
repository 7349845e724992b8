//! Association direction types.

use std::fmt;

/// Which side of an association to follow, relative to the node asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Incoming,
    Outgoing,
    Any,
}

impl Direction {
    /// Wire value for the `direction` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Incoming => "INCOMING",
            Direction::Outgoing => "OUTGOING",
            Direction::Any => "ANY",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a new association is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directionality {
    Directed,
    Undirected,
}

impl Directionality {
    /// Wire value for the `directionality` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Directionality::Directed => "DIRECTED",
            Directionality::Undirected => "UNDIRECTED",
        }
    }
}

impl fmt::Display for Directionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
