//! `gridstar`: run an A* search on a built-in scenario or a map file and
//! print the explored grid and the path found.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p gridstar-demos -- --scenario wall
//! cargo run -p gridstar-demos -- --map maze.txt --topology eight --seed 7 --jitter 0.001
//! RUST_LOG=trace cargo run -p gridstar-demos -- --scenario diagonal
//! ```
//!
//! Map files use `.` for free cells, `#` for blocked cells and exactly one
//! `S` and one `G`.

use std::ops::ControlFlow;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use log::info;

use gridstar_core::{Coord, Dims, Layout};
use gridstar_paths::{
    DEFAULT_BIAS, Grid, Heuristic, SearchConfig, SearchObserver, SearchStatus, Snapshot,
    Topology, search_observed,
};

#[derive(Parser)]
#[command(name = "gridstar")]
#[command(about = "A* search on a 2-D grid, with a trace of every expansion")]
struct Args {
    /// Built-in scenario to run
    #[arg(long, value_enum, default_value = "open", conflicts_with = "map")]
    scenario: Scenario,

    /// Map file to load instead of a scenario
    #[arg(long)]
    map: Option<PathBuf>,

    /// Movement model (defaults to the scenario's own)
    #[arg(long, value_enum)]
    topology: Option<TopologyArg>,

    /// Distance estimate (defaults to the one matching the topology)
    #[arg(long, value_enum)]
    heuristic: Option<HeuristicArg>,

    /// Tie-break multiplier applied to the heuristic
    #[arg(long, default_value_t = DEFAULT_BIAS)]
    bias: f64,

    /// Amplitude of the random bias perturbation (0 = off, at most 0.01)
    #[arg(long, default_value_t = 0.0)]
    jitter: f64,

    /// Seed for the bias perturbation
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Only print the final grid and path
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Scenario {
    /// 5x5 open grid, corner to corner
    Open,
    /// 5x5 grid with a wall on row 2 and a gap at its right end
    Wall,
    /// 7x7 open grid, diagonal moves allowed
    Diagonal,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum TopologyArg {
    Four,
    Eight,
}

impl From<TopologyArg> for Topology {
    fn from(t: TopologyArg) -> Self {
        match t {
            TopologyArg::Four => Topology::FourWay,
            TopologyArg::Eight => Topology::EightWay,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum HeuristicArg {
    Manhattan,
    Chebyshev,
    Octile,
    Zero,
}

impl From<HeuristicArg> for Heuristic {
    fn from(h: HeuristicArg) -> Self {
        match h {
            HeuristicArg::Manhattan => Heuristic::Manhattan,
            HeuristicArg::Chebyshev => Heuristic::Chebyshev,
            HeuristicArg::Octile => Heuristic::Octile,
            HeuristicArg::Zero => Heuristic::Zero,
        }
    }
}

/// A grid with its endpoints and preferred movement model.
struct Problem {
    grid: Grid,
    start: Coord,
    goal: Coord,
    topology: Topology,
}

impl Scenario {
    fn build(self) -> anyhow::Result<Problem> {
        let problem = match self {
            Scenario::Open => Problem {
                grid: Grid::new(5, 5)?,
                start: Coord::new(0, 0),
                goal: Coord::new(4, 4),
                topology: Topology::FourWay,
            },
            Scenario::Wall => {
                let mut grid = Grid::new(5, 5)?;
                for col in 0..4 {
                    grid.set_blocked(Coord::new(2, col), true)?;
                }
                Problem {
                    grid,
                    start: Coord::new(0, 0),
                    goal: Coord::new(4, 0),
                    topology: Topology::FourWay,
                }
            }
            Scenario::Diagonal => Problem {
                grid: Grid::new(7, 7)?,
                start: Coord::new(0, 0),
                goal: Coord::new(3, 3),
                topology: Topology::EightWay,
            },
        };
        Ok(problem)
    }
}

fn load_map(path: &PathBuf) -> anyhow::Result<Problem> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let layout = Layout::parse(&text).with_context(|| format!("parsing {}", path.display()))?;
    let (Some(start), Some(goal)) = (layout.start(), layout.goal()) else {
        bail!("{}: map needs one 'S' and one 'G' cell", path.display());
    };
    Ok(Problem {
        grid: Grid::from_layout(&layout),
        start,
        goal,
        topology: Topology::FourWay,
    })
}

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Logs every expansion with the open (LA) and closed (LC) lists, using
/// 1-based row-major cell numbers.
struct TraceObserver;

fn numbers(dims: Dims, cells: impl IntoIterator<Item = Coord>) -> String {
    let list: Vec<String> = cells
        .into_iter()
        .filter_map(|c| dims.number(c))
        .map(|n| n.to_string())
        .collect();
    format!("[{}]", list.join(", "))
}

impl SearchObserver for TraceObserver {
    fn on_expand(&mut self, s: &Snapshot<'_>) -> ControlFlow<()> {
        let dims = s.dims();
        info!(
            "step {}: explored {} (f={:.3} g={} h={})",
            s.step + 1,
            dims.number(s.current).unwrap_or_default(),
            s.f,
            s.g,
            s.h
        );
        info!("  LA: {}", numbers(dims, s.open_cells()));
        info!("  LC: {}", numbers(dims, s.closed_cells()));
        ControlFlow::Continue(())
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = if args.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let Problem {
        mut grid,
        start,
        goal,
        topology,
    } = match &args.map {
        Some(path) => load_map(path)?,
        None => args.scenario.build()?,
    };
    let topology = args.topology.map_or(topology, Topology::from);
    let heuristic = args
        .heuristic
        .map_or_else(|| Heuristic::for_topology(topology), Heuristic::from);
    let config = SearchConfig::four_way()
        .with_topology(topology)
        .with_heuristic(heuristic)
        .with_bias(args.bias)
        .with_jitter(args.jitter, args.seed);

    let dims = grid.dims();
    info!(
        "{} grid, {:?} with {:?}, start {} goal {}",
        dims,
        topology,
        heuristic,
        dims.number(start).unwrap_or_default(),
        dims.number(goal).unwrap_or_default(),
    );

    let result = search_observed(&mut grid, start, goal, &config, &mut TraceObserver)
        .context("search rejected")?;

    println!("{}", grid.render(&result));
    println!();
    match result.status {
        SearchStatus::Succeeded => {
            let steps: Vec<String> = result
                .path
                .iter()
                .filter_map(|&c| dims.number(c))
                .map(|n| n.to_string())
                .collect();
            println!("path: {} -> END", steps.join(" -> "));
            println!(
                "cost: {}, {} cells, {} expanded",
                result.cost.unwrap_or_default(),
                result.path.len(),
                result.closed_set.len()
            );
        }
        SearchStatus::Failed => {
            println!(
                "no path from {} to {} ({} cells explored)",
                start,
                goal,
                result.closed_set.len()
            );
        }
        SearchStatus::Aborted => println!("search aborted"),
    }
    Ok(())
}
