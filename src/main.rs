use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use rusty_fire::config::{PropagationConfig, RunConfig};
use rusty_fire::error::NetError;
use rusty_fire::topology::Topology;

#[derive(Parser, Debug)]
struct Args {
    /// A JSON run configuration; when given, the network flags below are ignored
    #[arg(long)]
    config: Option<String>,
    /// The number of nodes
    #[arg(short = 'N', long, default_value = "100")]
    num_nodes: usize,
    /// The (exclusive) upper bound of the node thresholds
    #[arg(long, default_value = "4")]
    max_threshold: usize,
    /// The initial level of every node, as a fraction of the maximum threshold
    #[arg(long, default_value = "0.0")]
    level_fraction: f64,
    /// The number of connections
    #[arg(short = 'K', long, default_value = "300")]
    num_connections: usize,
    /// The topology, must be one of: random, fin, fout
    #[arg(long, default_value = "random")]
    topology: String,
    /// The node repeatedly activated
    #[arg(long, default_value = "0")]
    source: usize,
    /// The node whose first fire ends the measurement
    #[arg(long, default_value = "1")]
    dest: usize,
    /// The seed used for network sampling
    #[arg(long, default_value = "42")]
    seed: u64,
    /// The maximum number of source activations
    #[arg(long, default_value_t = rusty_fire::DEFAULT_MAX_STEPS)]
    max_steps: usize,
    /// The maximum number of activations in a single cascade
    #[arg(long, default_value_t = rusty_fire::DEFAULT_MAX_CASCADE)]
    max_cascade: usize,
    /// The log level, must be one of: error, warn, info, debug, trace
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_topology(s: &str) -> Result<Topology, NetError> {
    match s.to_lowercase().as_str() {
        "random" => Ok(Topology::Random),
        "fin" => Ok(Topology::Fin),
        "fout" => Ok(Topology::Fout),
        _ => Err(NetError::InvalidParameter(format!("Unknown topology: {}", s))),
    }
}

fn run_config(args: &Args) -> Result<RunConfig, NetError> {
    match &args.config {
        Some(path) => RunConfig::load_from(path),
        None => Ok(RunConfig {
            num_nodes: args.num_nodes,
            max_threshold: args.max_threshold,
            level_fraction: args.level_fraction,
            num_connections: args.num_connections,
            topology: parse_topology(&args.topology)?,
            source_id: args.source,
            dest_id: args.dest,
            seed: args.seed,
            propagation: PropagationConfig::new(args.max_steps, args.max_cascade)?,
        }),
    }
}

fn main() -> Result<(), NetError> {
    let args = Args::parse();
    let level: LevelFilter = args
        .log_level
        .parse()
        .map_err(|e: log::ParseLevelError| NetError::InvalidParameter(e.to_string()))?;

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{l} - {m}\n")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))
        .map_err(|e| NetError::IOError(e.to_string()))?;
    log4rs::init_config(config).map_err(|e| NetError::IOError(e.to_string()))?;

    log::info!("{:?}", args);

    let run = run_config(&args)?;
    let mut rng = ChaCha8Rng::seed_from_u64(run.seed);
    let mut network = run.build_network(&mut rng)?;

    let report = network.diagnose();
    log::info!("Topology: {}", serde_json::to_string(&report)?);

    match network.measure_propagation(run.source_id, run.dest_id) {
        Ok(steps) => {
            println!("{}", steps);
            Ok(())
        }
        Err(e) => {
            log::error!("{}", e);
            Err(e)
        }
    }
}
