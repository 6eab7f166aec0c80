use std::str::FromStr;
use std::time::Duration;

use clap::{Parser, Subcommand};
use gsc_common::{GraphState, GraphStateError};
use gsc_equiv::EquivConfig;
use gsc_orbit::{ExploreConfig, SearchOrder};

/// Graph-state orbit explorer and LC-equivalence checker
#[derive(Parser, Debug)]
#[command(name = "gsc")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Explore the local-operation orbit of a seed graph state
    Explore(ExploreArgs),
    /// Test two qubit graph states for local-Clifford equivalence
    Equiv(EquivArgs),
}

#[derive(clap::Args, Debug)]
pub struct ExploreArgs {
    /// Seed edges, comma separated. `u-v` for weight 1, `u-v:w` otherwise.
    /// Prime-power vertices are written `family.member`, e.g. `0.1-2.0`.
    #[arg(short = 'e', long, value_delimiter = ',', required = true)]
    pub edges: Vec<EdgeArg>,

    /// Prime base of the local dimension
    #[arg(short = 'p', long, default_value_t = 2)]
    pub prime: u32,
    /// Power of the local dimension `p^m`
    #[arg(short = 'm', long, default_value_t = 1)]
    pub power: u32,

    /// Node expansion order
    #[arg(long, value_enum, default_value = "bfs")]
    pub order: OrderArg,
    /// Stop after this many classes
    #[arg(long)]
    pub max_nodes: Option<usize>,
    /// Stop after this many seconds
    #[arg(long)]
    pub time_budget: Option<u64>,
    /// Also act on degree-1 vertices
    #[arg(long, default_value_t = false)]
    pub keep_leaves: bool,
    /// Only record classes, not the operations connecting them
    #[arg(long, default_value_t = false)]
    pub no_edges: bool,
    /// Evaluate candidates on the rayon pool
    #[arg(long, default_value_t = false)]
    pub parallel: bool,

    /// Print node and edge records as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl ExploreArgs {
    /// Convert command-line arguments into internal configuration
    pub fn to_config(&self) -> ExploreConfig {
        ExploreConfig::new()
            .with_save_edges(!self.no_edges)
            .with_order(self.order.into())
            .with_max_nodes(self.max_nodes)
            .with_time_budget(self.time_budget.map(Duration::from_secs))
            .with_parallel(self.parallel)
            .with_keep_leaves(self.keep_leaves)
    }

    pub fn seed(&self) -> Result<GraphState, GraphStateError> {
        build(self.prime, self.power, &self.edges)
    }
}

#[derive(clap::Args, Debug)]
pub struct EquivArgs {
    /// Edges of the first graph, `u-v` comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    pub first: Vec<EdgeArg>,
    /// Edges of the second graph, `u-v` comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    pub second: Vec<EdgeArg>,

    /// Refuse solution spaces of a larger dimension
    #[arg(long)]
    pub max_basis_dim: Option<usize>,

    /// Print the result as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl EquivArgs {
    pub fn to_config(&self) -> EquivConfig {
        EquivConfig::new().with_max_basis_dim(self.max_basis_dim)
    }

    pub fn graphs(&self) -> Result<(GraphState, GraphState), GraphStateError> {
        Ok((build(2, 1, &self.first)?, build(2, 1, &self.second)?))
    }
}

fn build(prime: u32, power: u32, edges: &[EdgeArg]) -> Result<GraphState, GraphStateError> {
    GraphState::prime_power(prime, power, edges.iter().map(|e| (e.u, e.v, e.weight)))
}

/// Command-line argument wrapper for SearchOrder
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OrderArg {
    /// Breadth-first
    #[value(name = "bfs")]
    Bfs,
    /// Depth-first
    #[value(name = "dfs")]
    Dfs,
}

impl From<OrderArg> for SearchOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Bfs => Self::BreadthFirst,
            OrderArg::Dfs => Self::DepthFirst,
        }
    }
}

/// One edge as written on the command line: `u-v` or `u-v:w`, where a
/// vertex is `id` or `family.member`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeArg {
    pub u: (u32, u32),
    pub v: (u32, u32),
    pub weight: u32,
}

impl FromStr for EdgeArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ends, weight) = match s.trim().split_once(':') {
            Some((ends, weight)) => (ends, parse_number(weight)?),
            None => (s.trim(), 1),
        };
        let (u, v) = ends
            .split_once('-')
            .ok_or_else(|| format!("edge {s:?} must look like u-v or u-v:w"))?;
        Ok(Self {
            u: parse_vertex(u)?,
            v: parse_vertex(v)?,
            weight,
        })
    }
}

fn parse_vertex(s: &str) -> Result<(u32, u32), String> {
    match s.split_once('.') {
        Some((family, member)) => Ok((parse_number(family)?, parse_number(member)?)),
        None => Ok((parse_number(s)?, 0)),
    }
}

fn parse_number(s: &str) -> Result<u32, String> {
    s.trim()
        .parse()
        .map_err(|e| format!("invalid number {s:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0-1", (0, 0), (1, 0), 1)]
    #[case(" 3-4:2", (3, 0), (4, 0), 2)]
    #[case("0.1-2.0", (0, 1), (2, 0), 1)]
    #[case("1.0-0.1:4", (1, 0), (0, 1), 4)]
    fn parses_edges(
        #[case] input: &str,
        #[case] u: (u32, u32),
        #[case] v: (u32, u32),
        #[case] weight: u32,
    ) {
        assert_eq!(input.parse::<EdgeArg>(), Ok(EdgeArg { u, v, weight }));
    }

    #[rstest]
    #[case("0")]
    #[case("a-1")]
    #[case("0-1:x")]
    fn rejects_malformed_edges(#[case] input: &str) {
        assert!(input.parse::<EdgeArg>().is_err());
    }

    #[test]
    fn explore_arguments() {
        let args = Args::parse_from([
            "gsc", "explore", "-e", "0-1,1-2,2-3", "--order", "dfs", "--max-nodes", "5",
        ]);
        let Command::Explore(explore) = args.command else {
            panic!("expected the explore subcommand");
        };
        let config = explore.to_config();
        assert_eq!(config.order, SearchOrder::DepthFirst);
        assert_eq!(config.max_nodes, Some(5));
        assert!(config.save_edges);
        assert_eq!(explore.seed().unwrap().edge_count(), 3);
    }
}
