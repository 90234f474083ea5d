use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use graphdb_cost::config::Config;
use graphdb_cost::query::graph::QueryGraph;
use graphdb_cost::query::optimizer::cost::{
    create_cost_model, CostAssigner, CostModel, CostModelKind, FunctionCatalog, QueryCostReport,
};
use graphdb_cost::query::optimizer::stats::{GraphSizeSummary, HistoricalStatistics, StatisticsLog};
use graphdb_cost::utils::logging;

/// Estimate evaluation costs for a query representation graph
#[derive(Parser)]
#[clap(version = "0.1.0", author = "GraphDB Contributors")]
struct Cli {
    /// Query graph document (JSON)
    #[clap(short, long)]
    graph: PathBuf,

    /// Configuration file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Number of vertices in the data graph
    #[clap(long, default_value_t = 0)]
    vertices: u64,

    /// Number of edges in the data graph
    #[clap(long, default_value_t = 0)]
    edges: u64,

    /// Number of known vertex types
    #[clap(long, default_value_t = 0)]
    vertex_types: u64,

    /// Number of known edge types
    #[clap(long, default_value_t = 0)]
    edge_types: u64,

    /// Cost model: structural or logged
    #[clap(short, long)]
    model: Option<CostModelKind>,

    /// Trust factor of the logged model, in [0, 1]
    #[clap(short, long)]
    trust: Option<f64>,

    /// Historical statistics log (JSON)
    #[clap(long)]
    stats_log: Option<PathBuf>,

    /// Print the report as JSON
    #[clap(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(model) = cli.model {
        config.estimator.model = model;
    }
    if let Some(trust) = cli.trust {
        config.estimator.trust_factor = trust;
    }
    if let Some(path) = &cli.stats_log {
        config.estimator.statistics_log = Some(path.clone());
    }

    logging::init(&config.log)?;
    let result = run(&cli, &config);
    if let Err(e) = &result {
        log::error!("代价估算失败: {}", e);
    }
    logging::shutdown();
    result
}

fn run(cli: &Cli, config: &Config) -> Result<(), Box<dyn Error>> {
    let graph = QueryGraph::from_json(&fs::read_to_string(&cli.graph)?)?;
    let summary = GraphSizeSummary::new(cli.vertices, cli.edges, cli.vertex_types, cli.edge_types);

    let history = match &config.estimator.statistics_log {
        Some(path) => {
            let log = StatisticsLog::load(path)?;
            log::info!("已加载历史统计: {} 条记录", log.len());
            Some(Arc::new(log) as Arc<dyn HistoricalStatistics>)
        }
        None => None,
    };

    let model: Arc<dyn CostModel> = Arc::from(create_cost_model(
        &config.estimator,
        Arc::new(FunctionCatalog::with_builtins()),
        history,
    )?);
    let report = CostAssigner::new(model, summary).estimate(&graph)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &QueryCostReport) {
    println!(
        "{:>6}  {:<34} {:>12} {:>14} {:>14} {:>12}",
        "node", "kind", "own", "iterated", "subtree", "cardinality"
    );
    for node in &report.nodes {
        println!(
            "{:>6}  {:<34} {:>12} {:>14} {:>14} {:>12}",
            node.id.to_string(),
            node.kind,
            node.costs.own_cost,
            node.costs.iterated_cost,
            node.costs.subtree_cost,
            node.cardinality
        );
    }
    println!("total: {}", report.root.subtree_cost);
}
