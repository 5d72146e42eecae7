//! Configuration of propagation runs.
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::NetError;
use super::network::Network;
use super::topology::Topology;
use super::{DEFAULT_MAX_CASCADE, DEFAULT_MAX_STEPS};

/// Budgets bounding the propagation driver.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct PropagationConfig {
    /// Maximum number of source activations in a propagation measurement.
    max_steps: usize,
    /// Maximum number of activations delivered by a single cascade.
    max_cascade: usize,
}

impl PropagationConfig {
    /// Create a new configuration; both budgets must be positive.
    pub fn new(max_steps: usize, max_cascade: usize) -> Result<Self, NetError> {
        let config = PropagationConfig {
            max_steps,
            max_cascade,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn max_cascade(&self) -> usize {
        self.max_cascade
    }

    fn validate(&self) -> Result<(), NetError> {
        if self.max_steps == 0 {
            return Err(NetError::InvalidParameter(
                "The step budget must be positive".to_string(),
            ));
        }
        if self.max_cascade == 0 {
            return Err(NetError::InvalidParameter(
                "The cascade budget must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PropagationConfig {
    fn default() -> Self {
        PropagationConfig {
            max_steps: DEFAULT_MAX_STEPS,
            max_cascade: DEFAULT_MAX_CASCADE,
        }
    }
}

/// Full description of a propagation measurement: the network to build, its wiring, and the
/// pair of nodes to measure.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub num_nodes: usize,
    pub max_threshold: usize,
    pub level_fraction: f64,
    pub num_connections: usize,
    pub topology: Topology,
    pub source_id: usize,
    pub dest_id: usize,
    pub seed: u64,
    #[serde(default)]
    pub propagation: PropagationConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            num_nodes: 100,
            max_threshold: 4,
            level_fraction: 0.0,
            num_connections: 300,
            topology: Topology::Random,
            source_id: 0,
            dest_id: 1,
            seed: 42,
            propagation: PropagationConfig::default(),
        }
    }
}

impl RunConfig {
    /// Check the parameters which can be checked without building the network.
    pub fn validate(&self) -> Result<(), NetError> {
        if self.num_nodes == 0 {
            return Err(NetError::InvalidParameter(
                "The number of nodes must be positive".to_string(),
            ));
        }
        if self.source_id >= self.num_nodes || self.dest_id >= self.num_nodes {
            return Err(NetError::OutOfBounds(format!(
                "Source {} and destination {} must be less than the number of nodes {}",
                self.source_id, self.dest_id, self.num_nodes
            )));
        }
        self.propagation.validate()
    }

    /// Build and wire the described network.
    pub fn build_network<R: Rng>(&self, rng: &mut R) -> Result<Network, NetError> {
        self.validate()?;
        let mut network =
            Network::build(self.num_nodes, self.max_threshold, self.level_fraction, rng)?
                .with_config(self.propagation);
        network.wire(self.num_connections, self.topology, rng)?;
        Ok(network)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), NetError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, NetError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: RunConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_propagation_config() {
        let config = PropagationConfig::new(10, 20).unwrap();
        assert_eq!(config.max_steps(), 10);
        assert_eq!(config.max_cascade(), 20);
        assert!(matches!(
            PropagationConfig::new(0, 20),
            Err(NetError::InvalidParameter(_))
        ));
        assert!(matches!(
            PropagationConfig::new(10, 0),
            Err(NetError::InvalidParameter(_))
        ));
        assert_eq!(PropagationConfig::default().max_steps(), DEFAULT_MAX_STEPS);
    }

    #[test]
    fn test_run_config_validate() {
        assert_eq!(RunConfig::default().validate(), Ok(()));

        let config = RunConfig {
            dest_id: 100,
            ..RunConfig::default()
        };
        assert!(matches!(config.validate(), Err(NetError::OutOfBounds(_))));

        let config = RunConfig {
            num_nodes: 0,
            ..RunConfig::default()
        };
        assert!(matches!(config.validate(), Err(NetError::InvalidParameter(_))));
    }

    #[test]
    fn test_run_config_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.json");

        let config = RunConfig {
            topology: Topology::Fout,
            propagation: PropagationConfig::new(500, 1000).unwrap(),
            ..RunConfig::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(RunConfig::load_from(&path), Ok(config));
    }

    #[test]
    fn test_run_config_load_defaults_budgets() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(
            &path,
            r#"{"num_nodes": 5, "max_threshold": 3, "level_fraction": 0.5, "num_connections": 10,
                "topology": "Fin", "source_id": 0, "dest_id": 4, "seed": 1}"#,
        )
        .unwrap();
        let config = RunConfig::load_from(&path).unwrap();
        assert_eq!(config.topology, Topology::Fin);
        assert_eq!(config.propagation, PropagationConfig::default());
    }

    #[test]
    fn test_run_config_load_errors() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            RunConfig::load_from(dir.path().join("missing.json")),
            Err(NetError::IOError(_))
        ));

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(RunConfig::load_from(&path), Err(NetError::IOError(_))));
    }

    #[test]
    fn test_run_config_build_network() {
        let config = RunConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let network = config.build_network(&mut rng).unwrap();
        assert_eq!(network.num_nodes(), 100);
        assert_eq!(network.num_connections(), 300);
        assert_eq!(network.config(), &config.propagation);
    }
}
