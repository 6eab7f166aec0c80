//! Graph-state class CLI
//!
//! Entry point for the `gsc` command-line tool. Explores local-operation
//! orbits of graph states and checks qubit graph states for local-Clifford
//! equivalence.

#[global_allocator]
/// Global allocator using jemalloc for better performance in parallel workloads.
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

mod args;

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use clap::Parser;
use gsc_canon::RefinementOracle;
use gsc_equiv::are_lc_equiv;
use gsc_orbit::{EdgeRecord, Exploration, NodeRecord, OrbitExplorer};
use serde::Serialize;
use tracing::info;

use args::{Args, Command, EquivArgs, ExploreArgs};

/// How often a running exploration reports its progress.
const PROGRESS_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Serialize)]
struct ClassGraphExport {
    complete: bool,
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_thread_ids(true)
        .init();

    match Args::parse().command {
        Command::Explore(args) => explore(&args),
        Command::Equiv(args) => equiv(&args),
    }
}

fn explore(args: &ExploreArgs) -> Result<(), Box<dyn std::error::Error>> {
    let seed = args.seed()?;
    let explorer = OrbitExplorer::new(&RefinementOracle, args.to_config());
    info!("Exploring orbit of {seed}");

    let done = AtomicBool::new(false);
    let exploration = thread::scope(|s| {
        s.spawn(|| report_progress(&explorer, &done));
        let result = explorer.explore(seed);
        done.store(true, Ordering::Relaxed);
        result
    })?;

    if args.json {
        let Exploration {
            class_graph,
            complete,
        } = exploration;
        let export = ClassGraphExport {
            complete,
            nodes: class_graph.node_records(),
            edges: class_graph.edge_records(),
        };
        println!("{}", serde_json::to_string_pretty(&export)?);
        return Ok(());
    }

    let graph = &exploration.class_graph;
    println!("\n=== Class Graph ===");
    println!(
        "{} classes, {} edges{}",
        graph.len(),
        graph.edge_count(),
        if exploration.complete { "" } else { " (incomplete)" }
    );
    println!("\n=== Fewest Edges ===");
    for node in graph.min_edge_representatives() {
        println!("{}: {}", node.label, node.state);
    }
    println!("\n=== Most Edges ===");
    for node in graph.max_edge_representatives() {
        println!("{}: {}", node.label, node.state);
    }
    Ok(())
}

/// Logs the explorer's counters until `done` is set.
fn report_progress(explorer: &OrbitExplorer<'_, RefinementOracle>, done: &AtomicBool) {
    let tick = Duration::from_millis(50);
    let mut waited = Duration::ZERO;
    while !done.load(Ordering::Relaxed) {
        thread::sleep(tick);
        waited += tick;
        if waited >= PROGRESS_INTERVAL {
            waited = Duration::ZERO;
            let snapshot = explorer.progress().snapshot();
            info!(
                discovered = snapshot.discovered,
                pending = snapshot.pending(),
                candidates = snapshot.candidates,
                "exploration progress"
            );
        }
    }
}

fn equiv(args: &EquivArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (first, second) = args.graphs()?;
    let result = are_lc_equiv(&first, &second, &args.to_config())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("equivalent: {}", result.equivalent);
    if let Some(witnesses) = &result.witnesses {
        let order: Vec<String> = result.vertices.iter().map(ToString::to_string).collect();
        println!("vertex order: [{}]", order.join(", "));
        for (i, witness) in witnesses.iter().enumerate() {
            let gates: Vec<String> = witness.iter().map(ToString::to_string).collect();
            println!("{i}: [{}]", gates.join(", "));
        }
    }
    Ok(())
}
