//! Random wiring of networks and diagnostics on their connectivity.
use std::collections::VecDeque;

use itertools::Itertools;
use log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::NetError;
use super::network::Network;

/// The distribution of network structures.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Topology {
    /// Random topology, i.e., each connection has a uniform source and a uniform target.
    Random,
    /// Fixed in-degree topology, i.e., each node receives the same number of connections.
    Fin,
    /// Fixed out-degree topology, i.e., each node sends the same number of connections.
    Fout,
}

/// Summary of the connectivity features which affect the termination of cascades.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct TopologyReport {
    pub num_nodes: usize,
    pub num_connections: usize,
    /// Nodes connected to themselves.
    pub self_loops: Vec<usize>,
    /// Pairs (source, target) connected more than once.
    pub duplicate_edges: Vec<(usize, usize)>,
    /// A directed cycle, if any, listed from its first visited node.
    pub cycle: Option<Vec<usize>>,
}

#[derive(Debug, PartialEq, Clone, Copy)]
enum Visit {
    New,
    Active,
    Done,
}

impl Network {
    /// Add `num_connections` random connections to the network, following the given topology.
    /// Self-loops and duplicate connections are kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    /// use rusty_fire::network::Network;
    /// use rusty_fire::topology::Topology;
    ///
    /// let mut rng = ChaCha8Rng::seed_from_u64(42);
    /// let mut network = Network::build(10, 3, 0.0, &mut rng).unwrap();
    /// network.wire(30, Topology::Fout, &mut rng).unwrap();
    /// assert!(network.nodes_iter().all(|node| node.num_outbound() == 3));
    /// ```
    pub fn wire<R: Rng>(
        &mut self,
        num_connections: usize,
        topology: Topology,
        rng: &mut R,
    ) -> Result<(), NetError> {
        let num_nodes = self.num_nodes();
        if !matches!(topology, Topology::Random) && num_connections % num_nodes != 0 {
            return Err(NetError::IncompatibleTopology(format!(
                "{} connections cannot be evenly spread over {} nodes",
                num_connections, num_nodes
            )));
        }

        let nodes = self.nodes_mut();
        for k in 0..num_connections {
            match topology {
                Topology::Random => {
                    let source_id = rng.gen_range(0..num_nodes);
                    nodes[source_id].add_connection(num_nodes, rng)?;
                }
                Topology::Fin => {
                    let source_id = rng.gen_range(0..num_nodes);
                    nodes[source_id].connect(k % num_nodes);
                }
                Topology::Fout => {
                    nodes[k % num_nodes].add_connection(num_nodes, rng)?;
                }
            }
        }

        info!(
            "Network wired with {} connections ({:?} topology)",
            num_connections, topology
        );
        Ok(())
    }

    /// Returns the IDs of the nodes connected to themselves.
    pub fn self_loops(&self) -> Vec<usize> {
        self.nodes_iter()
            .filter(|node| node.has_self_loop())
            .map(|node| node.id())
            .collect()
    }

    /// Returns the (source, target) pairs connected more than once, each listed once.
    pub fn duplicate_edges(&self) -> Vec<(usize, usize)> {
        self.nodes_iter()
            .flat_map(|node| {
                node.outbound()
                    .iter()
                    .duplicates()
                    .map(move |&target_id| (node.id(), target_id))
            })
            .collect()
    }

    /// Returns true if the destination can be reached from the source along outbound connections.
    /// A node is always reachable from itself.
    ///
    /// Since every connection delivers one activation per fire, repeatedly activating the source
    /// makes every reachable node fire eventually.
    pub fn is_reachable(&self, source_id: usize, dest_id: usize) -> Result<bool, NetError> {
        self.check_id(source_id)?;
        self.check_id(dest_id)?;

        let mut visited = vec![false; self.num_nodes()];
        let mut queue = VecDeque::from([source_id]);
        visited[source_id] = true;

        while let Some(node_id) = queue.pop_front() {
            if node_id == dest_id {
                return Ok(true);
            }
            if let Some(node) = self.node_ref(node_id) {
                for &target_id in node.outbound() {
                    if !visited[target_id] {
                        visited[target_id] = true;
                        queue.push_back(target_id);
                    }
                }
            }
        }
        Ok(false)
    }

    /// Returns a directed cycle of the network if there is any.
    /// A self-loop is reported as a cycle of length one.
    pub fn find_cycle(&self) -> Option<Vec<usize>> {
        let mut visits = vec![Visit::New; self.num_nodes()];

        for root_id in 0..self.num_nodes() {
            if visits[root_id] != Visit::New {
                continue;
            }
            // The active nodes are exactly the ones on the stack.
            let mut stack: Vec<(usize, usize)> = vec![(root_id, 0)];
            visits[root_id] = Visit::Active;

            while let Some((node_id, next)) = stack.pop() {
                let target_id = self
                    .node_ref(node_id)
                    .and_then(|node| node.outbound().get(next).copied());
                match target_id {
                    Some(target_id) => {
                        stack.push((node_id, next + 1));
                        match visits[target_id] {
                            Visit::New => {
                                visits[target_id] = Visit::Active;
                                stack.push((target_id, 0));
                            }
                            Visit::Active => {
                                let cycle: Vec<usize> = stack
                                    .iter()
                                    .map(|&(id, _)| id)
                                    .skip_while(|&id| id != target_id)
                                    .collect();
                                return Some(cycle);
                            }
                            Visit::Done => {}
                        }
                    }
                    None => visits[node_id] = Visit::Done,
                }
            }
        }
        None
    }

    /// Collect the connectivity diagnostics of the network.
    pub fn diagnose(&self) -> TopologyReport {
        let report = TopologyReport {
            num_nodes: self.num_nodes(),
            num_connections: self.num_connections(),
            self_loops: self.self_loops(),
            duplicate_edges: self.duplicate_edges(),
            cycle: self.find_cycle(),
        };
        if !report.self_loops.is_empty() {
            warn!(
                "{} nodes are connected to themselves: firing them never ends the cascade",
                report.self_loops.len()
            );
        }
        if let Some(cycle) = &report.cycle {
            warn!("The network contains a cycle of length {}", cycle.len());
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::node::Node;

    const NUM_NODES: usize = 20;
    const NUM_CONNECTIONS: usize = 60;

    fn in_degrees(network: &Network) -> Vec<usize> {
        let mut degrees = vec![0; network.num_nodes()];
        for node in network.nodes_iter() {
            for &target_id in node.outbound() {
                degrees[target_id] += 1;
            }
        }
        degrees
    }

    fn network_from_edges(num_nodes: usize, edges: &[(usize, usize)]) -> Network {
        let nodes = (0..num_nodes).map(|id| Node::new(id, 1)).collect();
        let mut network = Network::from_nodes(nodes).unwrap();
        for &(source_id, target_id) in edges {
            network.connect(source_id, target_id).unwrap();
        }
        network
    }

    #[test]
    fn test_wire_connectivity() {
        let mut rng = StdRng::seed_from_u64(42);

        let mut network = Network::build(NUM_NODES, 3, 0.0, &mut rng).unwrap();
        network.wire(NUM_CONNECTIONS, Topology::Random, &mut rng).unwrap();
        assert_eq!(network.num_connections(), NUM_CONNECTIONS);

        let mut network = Network::build(NUM_NODES, 3, 0.0, &mut rng).unwrap();
        network.wire(NUM_CONNECTIONS, Topology::Fout, &mut rng).unwrap();
        assert!(network
            .nodes_iter()
            .all(|node| node.num_outbound() == NUM_CONNECTIONS / NUM_NODES));

        let mut network = Network::build(NUM_NODES, 3, 0.0, &mut rng).unwrap();
        network.wire(NUM_CONNECTIONS, Topology::Fin, &mut rng).unwrap();
        assert_eq!(network.num_connections(), NUM_CONNECTIONS);
        assert!(in_degrees(&network)
            .iter()
            .all(|&degree| degree == NUM_CONNECTIONS / NUM_NODES));
    }

    #[test]
    fn test_wire_incompatible_topology() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut network = Network::build(NUM_NODES, 3, 0.0, &mut rng).unwrap();
        assert!(matches!(
            network.wire(NUM_CONNECTIONS + 1, Topology::Fin, &mut rng),
            Err(NetError::IncompatibleTopology(_))
        ));
        assert!(matches!(
            network.wire(NUM_CONNECTIONS + 1, Topology::Fout, &mut rng),
            Err(NetError::IncompatibleTopology(_))
        ));
        assert_eq!(network.num_connections(), 0);
        assert_eq!(network.wire(NUM_CONNECTIONS + 1, Topology::Random, &mut rng), Ok(()));
    }

    #[test]
    fn test_self_loops_and_duplicates() {
        let network = network_from_edges(
            4,
            &[(0, 1), (1, 1), (2, 3), (2, 3), (2, 3), (3, 3), (3, 0)],
        );
        assert_eq!(network.self_loops(), vec![1, 3]);
        assert_eq!(network.duplicate_edges(), vec![(2, 3)]);
    }

    #[test]
    fn test_is_reachable() {
        let network = network_from_edges(5, &[(0, 1), (1, 2), (2, 0), (3, 4)]);
        assert_eq!(network.is_reachable(0, 2), Ok(true));
        assert_eq!(network.is_reachable(2, 1), Ok(true));
        assert_eq!(network.is_reachable(0, 3), Ok(false));
        assert_eq!(network.is_reachable(4, 3), Ok(false));
        assert_eq!(network.is_reachable(4, 4), Ok(true));
        assert!(matches!(network.is_reachable(0, 5), Err(NetError::OutOfBounds(_))));
    }

    #[test]
    fn test_find_cycle() {
        let network = network_from_edges(4, &[(0, 1), (1, 2), (0, 2), (2, 3)]);
        assert_eq!(network.find_cycle(), None);

        let network = network_from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 1)]);
        assert_eq!(network.find_cycle(), Some(vec![1, 2, 3]));

        let network = network_from_edges(3, &[(0, 1), (2, 2)]);
        assert_eq!(network.find_cycle(), Some(vec![2]));
    }

    #[test]
    fn test_diagnose() {
        let network = network_from_edges(3, &[(0, 1), (0, 1), (1, 1)]);
        assert_eq!(
            network.diagnose(),
            TopologyReport {
                num_nodes: 3,
                num_connections: 3,
                self_loops: vec![1],
                duplicate_edges: vec![(0, 1)],
                cycle: Some(vec![1]),
            }
        );
    }

    #[test]
    fn test_report_to_json() {
        let report = network_from_edges(2, &[(0, 1), (0, 1)]).diagnose();
        assert_eq!(
            serde_json::to_string(&report).unwrap(),
            concat!(
                r#"{"num_nodes":2,"num_connections":2,"self_loops":[],"#,
                r#""duplicate_edges":[[0,1]],"cycle":null}"#
            )
        );
    }
}
