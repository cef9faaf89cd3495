use crate::domain::utils::id::{LinkIndex, NodeIndex};

/// A physical network link with a fixed capacity and a mutable traffic load.
#[derive(Debug, Clone)]
pub struct Link {
    pub index: LinkIndex,
    pub name: String,
    pub source: NodeIndex,
    pub target: NodeIndex,

    /// Static bandwidth of the link. Always positive and finite.
    capacity: f64,

    /// Instantaneous load, kept within `[0, capacity]`.
    traffic: f64,
}

impl Link {
    pub fn new(index: LinkIndex, name: impl Into<String>, source: NodeIndex, target: NodeIndex, capacity: f64) -> Self {
        Self { index, name: name.into(), source, target, capacity, traffic: 0.0 }
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn traffic(&self) -> f64 {
        self.traffic
    }

    /// Sets the traffic load, clamped into `[0, capacity]`.
    pub fn set_traffic(&mut self, traffic: f64) {
        self.traffic = traffic.clamp(0.0, self.capacity);
    }

    /// Share of the capacity currently in use, in `[0, 1]`.
    pub fn utilization(&self) -> f64 {
        self.traffic / self.capacity
    }

    /// Returns the endpoint opposite to `node`, if `node` is one of the endpoints.
    pub fn other_end(&self, node: NodeIndex) -> Option<NodeIndex> {
        if node == self.source {
            Some(self.target)
        } else if node == self.target {
            Some(self.source)
        } else {
            None
        }
    }

    pub fn connects(&self, from: NodeIndex, to: NodeIndex, bidirectional: bool) -> bool {
        (self.source == from && self.target == to) || (bidirectional && self.source == to && self.target == from)
    }
}
