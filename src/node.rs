//! This module provides the `Node` structure which composes the `Network` structure.

use log::debug;
use rand::Rng;

use super::error::NetError;

/// Represents a threshold-firing node.
///
/// The outbound connections are handles into the node pool owned by the network, i.e., the
/// position of the target node in that pool. A node never owns another node.
#[derive(Debug, PartialEq, Clone)]
pub struct Node {
    // The node ID, i.e., its position in the pool.
    id: usize,
    // The number of activations required to fire.
    threshold: usize,
    // The accumulated number of activations since the last fire.
    level: usize,
    // Whether the node fired at least once.
    fired: bool,
    // The targets of the outbound connections, in insertion order (duplicates allowed).
    outbound: Vec<usize>,
}

impl Node {
    /// Create a new quiescent node with zero level and no connections.
    pub fn new(id: usize, threshold: usize) -> Self {
        Node::with_level(id, threshold, 0)
    }

    /// Create a new quiescent node with the given initial level and no connections.
    pub fn with_level(id: usize, threshold: usize, level: usize) -> Self {
        Node {
            id,
            threshold,
            level,
            fired: false,
            outbound: vec![],
        }
    }

    /// Returns the node ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the node firing threshold.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Returns the current activation level of the node.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Returns true if the node fired at least once.
    pub fn fired(&self) -> bool {
        self.fired
    }

    /// Returns a slice of the targets of the outbound connections.
    pub fn outbound(&self) -> &[usize] {
        &self.outbound[..]
    }

    /// Returns the number of outbound connections.
    pub fn num_outbound(&self) -> usize {
        self.outbound.len()
    }

    /// Returns true if one of the outbound connections points back to the node itself.
    pub fn has_self_loop(&self) -> bool {
        self.outbound.contains(&self.id)
    }

    /// Accumulate one activation.
    /// Returns true if the level reached the threshold, in which case the node is firing and
    /// must be settled once all its outbound activations have been delivered.
    pub fn integrate(&mut self) -> bool {
        self.level += 1;
        self.level >= self.threshold
    }

    /// Complete a fire: reset the level and raise the (monotone) fired flag.
    pub fn settle(&mut self) {
        self.level = 0;
        self.fired = true;
    }

    /// Append an outbound connection to the given target.
    /// The function cannot check if the target is valid; this check must be done at the network
    /// level.
    pub fn connect(&mut self, target_id: usize) {
        self.outbound.push(target_id);
    }

    /// Append an outbound connection to a target drawn uniformly from a pool of `num_nodes` nodes.
    /// The node itself and its current targets are valid draws.
    /// Returns the ID of the selected target.
    pub fn add_connection<R: Rng>(
        &mut self,
        num_nodes: usize,
        rng: &mut R,
    ) -> Result<usize, NetError> {
        if num_nodes == 0 {
            return Err(NetError::EmptyPool);
        }
        let target_id = rng.gen_range(0..num_nodes);
        if target_id == self.id {
            debug!("Node {} is now connected to itself", self.id);
        }
        self.outbound.push(target_id);
        Ok(target_id)
    }

    /// Remove one outbound connection chosen uniformly at random.
    /// Returns the ID of the target of the removed connection.
    pub fn remove_connection<R: Rng>(&mut self, rng: &mut R) -> Result<usize, NetError> {
        if self.outbound.is_empty() {
            return Err(NetError::NoConnection { node_id: self.id });
        }
        let pos = rng.gen_range(0..self.outbound.len());
        Ok(self.outbound.remove(pos))
    }
}
