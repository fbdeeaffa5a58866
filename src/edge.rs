use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::{VertexId, util::sort_pair};

/// An undirected weighted edge.
///
/// Two edges are equal when they join the same unordered pair of vertices
/// with the same weight; the display name takes no part in identity.  The
/// stored orientation `(a, b)` is kept so that a negative-weight edge can be
/// treated as one-way by the algorithms that accept negative weights.
#[derive(Clone, Debug)]
pub struct Edge {
    a: VertexId,
    b: VertexId,
    weight: f64,
    name: Option<String>,
}

impl Edge {
    pub fn new(a: VertexId, b: VertexId, weight: f64) -> Self {
        Self {
            a,
            b,
            weight,
            name: None,
        }
    }

    pub fn named(a: VertexId, b: VertexId, weight: f64, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(a, b, weight)
        }
    }

    /// First endpoint in stored orientation.
    pub fn a(&self) -> VertexId {
        self.a
    }

    /// Second endpoint in stored orientation.
    pub fn b(&self) -> VertexId {
        self.b
    }

    /// Both endpoints in stored orientation.
    pub fn ends(&self) -> (VertexId, VertexId) {
        (self.a, self.b)
    }

    /// Both endpoints, smaller id first.
    pub fn sorted_ends(&self) -> (VertexId, VertexId) {
        sort_pair(self.a, self.b)
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn is_self_loop(&self) -> bool {
        self.a == self.b
    }

    /// Returns true if `v` is one of the endpoints.
    pub fn touches(&self, v: VertexId) -> bool {
        self.a == v || self.b == v
    }

    /// Returns true if the edge joins `u` and `v`, in either orientation.
    pub fn joins(&self, u: VertexId, v: VertexId) -> bool {
        self.a == u && self.b == v || self.a == v && self.b == u
    }

    /// Given one endpoint, returns the other.  For a self-loop this is the
    /// vertex itself.  Panics if `v` is not an endpoint.
    pub fn other_end(&self, v: VertexId) -> VertexId {
        if self.a == v {
            self.b
        } else if self.b == v {
            self.a
        } else {
            panic!("vertex {v} is not an endpoint of {self}");
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.joins(other.a, other.b) && self.weight == other.weight
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sorted_ends().hash(state);
        // -0.0 == 0.0 must hash alike.
        let weight = if self.weight == 0.0 { 0.0 } else { self.weight };
        weight.to_bits().hash(state);
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{name} ")?;
        }
        write!(f, "{}-({})-{}", self.a, self.weight, self.b)
    }
}
