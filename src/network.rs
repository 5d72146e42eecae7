//! Network (with nodes and their connections) structure and the propagation driver.
use log::{debug, info, warn};
use rand::Rng;
use rand_distr::{Distribution, Uniform};

use super::config::PropagationConfig;
use super::error::NetError;
use super::node::Node;

/// A network of threshold-firing nodes.
#[derive(Debug, PartialEq, Clone)]
pub struct Network {
    // The network owns the nodes; connections refer to them by position.
    nodes: Vec<Node>,
    config: PropagationConfig,
}

impl Network {
    /// Create a network of `num_nodes` unconnected nodes.
    /// Each threshold is drawn uniformly in `[0, max_threshold)`; every node starts at level
    /// `floor(level_fraction * max_threshold)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    /// use rusty_fire::network::Network;
    ///
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let network = Network::build(10, 5, 0.4, &mut rng).unwrap();
    /// assert_eq!(network.num_nodes(), 10);
    /// assert_eq!(network.num_connections(), 0);
    /// assert!(network.nodes_iter().all(|node| node.level() == 2 && node.threshold() < 5));
    /// ```
    pub fn build<R: Rng>(
        num_nodes: usize,
        max_threshold: usize,
        level_fraction: f64,
        rng: &mut R,
    ) -> Result<Self, NetError> {
        if num_nodes == 0 {
            return Err(NetError::InvalidParameter(
                "The number of nodes must be positive".to_string(),
            ));
        }
        if max_threshold == 0 {
            return Err(NetError::InvalidParameter(
                "The maximum threshold must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&level_fraction) {
            return Err(NetError::InvalidParameter(format!(
                "The initial level fraction must be in [0, 1], got {}",
                level_fraction
            )));
        }

        let level = (level_fraction * max_threshold as f64).floor() as usize;
        let threshold_dist = Uniform::new(0, max_threshold);

        let nodes: Vec<Node> = (0..num_nodes)
            .map(|id| Node::with_level(id, threshold_dist.sample(rng), level))
            .collect();

        info!(
            "Network built with {} nodes (thresholds in [0, {}), initial level {})",
            num_nodes, max_threshold, level
        );
        Ok(Network {
            nodes,
            config: PropagationConfig::default(),
        })
    }

    /// Create a network from explicitly defined nodes.
    /// The node at position `i` must have ID `i` and every connection must target a node of the
    /// network.
    pub fn from_nodes(nodes: Vec<Node>) -> Result<Self, NetError> {
        if nodes.is_empty() {
            return Err(NetError::InvalidParameter(
                "The number of nodes must be positive".to_string(),
            ));
        }
        for (pos, node) in nodes.iter().enumerate() {
            if node.id() != pos {
                return Err(NetError::InvalidParameter(format!(
                    "Node at position {} has ID {}",
                    pos,
                    node.id()
                )));
            }
            if let Some(&target_id) = node.outbound().iter().find(|&&id| id >= nodes.len()) {
                return Err(NetError::OutOfBounds(format!(
                    "Node {} is connected to node {} in a network of {} nodes",
                    pos,
                    target_id,
                    nodes.len()
                )));
            }
        }
        Ok(Network {
            nodes,
            config: PropagationConfig::default(),
        })
    }

    /// Replace the propagation budgets of the network.
    pub fn with_config(mut self, config: PropagationConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the propagation budgets of the network.
    pub fn config(&self) -> &PropagationConfig {
        &self.config
    }

    /// A reference to a specific node in the network.
    /// Returns `None` if the node is not found.
    pub fn node_ref(&self, node_id: usize) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    /// An iterator over the nodes in the network.
    pub fn nodes_iter(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes[..]
    }

    /// The number of nodes in the network.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// The number of connections in the network.
    pub fn num_connections(&self) -> usize {
        self.nodes.iter().map(|node| node.num_outbound()).sum()
    }

    /// The number of nodes which fired at least once.
    pub fn fired_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.fired()).count()
    }

    pub(crate) fn check_id(&self, node_id: usize) -> Result<(), NetError> {
        if node_id >= self.nodes.len() {
            return Err(NetError::OutOfBounds(format!(
                "Node {} not found in a network of {} nodes",
                node_id,
                self.nodes.len()
            )));
        }
        Ok(())
    }

    /// Add a connection from the source node to the target node.
    pub fn connect(&mut self, source_id: usize, target_id: usize) -> Result<(), NetError> {
        self.check_id(source_id)?;
        self.check_id(target_id)?;
        if source_id == target_id {
            debug!("Node {} is now connected to itself", source_id);
        }
        self.nodes[source_id].connect(target_id);
        Ok(())
    }

    /// Add a connection from the given node to a node drawn uniformly from the network.
    /// Returns the ID of the selected target.
    pub fn add_connection<R: Rng>(
        &mut self,
        node_id: usize,
        rng: &mut R,
    ) -> Result<usize, NetError> {
        self.check_id(node_id)?;
        let num_nodes = self.nodes.len();
        self.nodes[node_id].add_connection(num_nodes, rng)
    }

    /// Remove a randomly chosen outbound connection of the given node.
    /// Returns the ID of the target of the removed connection.
    pub fn remove_connection<R: Rng>(
        &mut self,
        node_id: usize,
        rng: &mut R,
    ) -> Result<usize, NetError> {
        self.check_id(node_id)?;
        self.nodes[node_id].remove_connection(rng)
    }

    /// Activate a node and deliver the resulting cascade of activations.
    ///
    /// A firing node activates each of its outbound targets in order, each activation being fully
    /// resolved (including the fires it triggers) before the next one is delivered. The firing node
    /// is only reset, and flagged as fired, once all its outbound activations have been delivered.
    /// Consequently, a firing node activated again before being reset fires again: a cascade which
    /// comes back to one of its firing nodes (e.g., through a self-loop) never ends.
    ///
    /// At most `max_cascade` activations are delivered per call; beyond, the function returns
    /// [`NetError::CascadeOverflow`] after resetting all the nodes left firing.
    ///
    /// Returns the number of fires triggered by the activation.
    pub fn activate(&mut self, node_id: usize) -> Result<usize, NetError> {
        self.check_id(node_id)?;
        let max_cascade = self.config.max_cascade();

        let mut num_activations = 1;
        let mut num_fires = 0;

        // Firing nodes, each with the position of its next outbound connection to deliver.
        let mut stack: Vec<(usize, usize)> = Vec::new();
        if self.nodes[node_id].integrate() {
            stack.push((node_id, 0));
        }

        while let Some((firing_id, next)) = stack.pop() {
            match self.nodes[firing_id].outbound().get(next).copied() {
                Some(target_id) => {
                    stack.push((firing_id, next + 1));
                    if num_activations >= max_cascade {
                        warn!(
                            "Activation of node {} exceeded the cascade budget \
                             ({} nodes still firing)",
                            node_id,
                            stack.len()
                        );
                        for (id, _) in stack.drain(..) {
                            self.nodes[id].settle();
                        }
                        return Err(NetError::CascadeOverflow {
                            node_id,
                            max_cascade,
                        });
                    }
                    num_activations += 1;
                    if self.nodes[target_id].integrate() {
                        stack.push((target_id, 0));
                    }
                }
                None => {
                    self.nodes[firing_id].settle();
                    num_fires += 1;
                }
            }
        }

        Ok(num_fires)
    }

    /// Repeatedly activate the source node until the destination node has fired.
    /// Returns the number of activations of the source, i.e., the propagation time.
    ///
    /// Since the fired flags are never cleared, a second measurement towards the same destination
    /// returns zero. If the destination cannot be reached from the source, the function returns
    /// [`NetError::StepBudgetExceeded`] after `max_steps` activations.
    ///
    /// A cascade overflow ends the measurement with an error, unless the destination fired during
    /// the overflowing cascade, in which case that activation is the last step.
    pub fn measure_propagation(
        &mut self,
        source_id: usize,
        dest_id: usize,
    ) -> Result<usize, NetError> {
        self.check_id(source_id)?;
        self.check_id(dest_id)?;
        let max_steps = self.config.max_steps();

        if !self.nodes[dest_id].fired() && !self.is_reachable(source_id, dest_id)? {
            warn!(
                "Node {} is not reachable from node {}: \
                 propagation will exhaust the budget of {} steps",
                dest_id, source_id, max_steps
            );
        }

        let mut steps = 0;
        while !self.nodes[dest_id].fired() {
            if steps >= max_steps {
                return Err(NetError::StepBudgetExceeded {
                    source_id,
                    dest_id,
                    max_steps,
                });
            }
            let activation = self.activate(source_id);
            steps += 1;
            match activation {
                Ok(num_fires) => debug!(
                    "Step {}: activation of node {} caused {} fires",
                    steps, source_id, num_fires
                ),
                Err(NetError::CascadeOverflow { .. }) if self.nodes[dest_id].fired() => {
                    warn!(
                        "Step {}: node {} fired before the cascade budget was exceeded",
                        steps, dest_id
                    );
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Propagation from node {} to node {} took {} steps",
            source_id, dest_id, steps
        );
        Ok(steps)
    }
}
