use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use arborlab::graph::{bfs_order, dfs_order, generate_graph, letter_id, GraphConfig};
use arborlab::maze::{generate_maze, shortest_path, MazeConfig};
use arborlab::traversal::{traverse_steps, TraversalKind};
use arborlab::tree::{layout, LayoutConfig};
use arborlab::util::{seed_from_phrase, seeded_rng};
use arborlab::{bst, shape};

#[derive(Parser, Debug)]
#[command(
    name = "arborlab",
    version,
    about = "Tree, graph and maze algorithms for interactive lessons"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a BST from values and print a traversal.
    Traverse {
        /// Values inserted in order (comma separated).
        #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
        values: Vec<i32>,
        /// inorder, preorder, postorder, bfs or dfs.
        #[arg(long, default_value = "inorder")]
        kind: TraversalKind,
        /// Print every step with its frontier.
        #[arg(long)]
        steps: bool,
        /// Print drawing coordinates for a 500×350 canvas.
        #[arg(long)]
        layout: bool,
    },
    /// Generate a solvable maze and print its shortest path.
    Maze {
        /// Side length of the grid.
        #[arg(long, default_value_t = 8)]
        size: usize,
        /// Chance of each inner cell being a wall.
        #[arg(long, default_value_t = 0.25)]
        walls: f64,
        #[command(flatten)]
        seed: SeedArgs,
    },
    /// Generate a DFS round graph and print its edges and visit orders.
    Graph {
        /// Round number (controls the node count).
        #[arg(long, default_value_t = 1)]
        round: u32,
        #[command(flatten)]
        seed: SeedArgs,
    },
    /// Build a BST from values and report its structural predicates.
    Shape {
        /// Values inserted in order (comma separated).
        #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
        values: Vec<i32>,
    },
}

#[derive(Args, Debug)]
struct SeedArgs {
    /// Numeric seed for reproducible output.
    #[arg(long, conflicts_with = "phrase")]
    seed: Option<u64>,
    /// Shareable phrase hashed into a seed.
    #[arg(long)]
    phrase: Option<String>,
}

impl SeedArgs {
    fn resolve(&self) -> u64 {
        match (&self.phrase, self.seed) {
            (Some(phrase), _) => seed_from_phrase(phrase),
            (None, Some(seed)) => seed,
            (None, None) => rand::random(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Traverse {
            values,
            kind,
            steps,
            layout,
        } => run_traverse(values, kind, steps, layout)?,
        Commands::Maze { size, walls, seed } => run_maze(size, walls, seed.resolve())?,
        Commands::Graph { round, seed } => run_graph(round, seed.resolve())?,
        Commands::Shape { values } => run_shape(values)?,
    }

    Ok(())
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_traverse(
    values: Vec<i32>,
    kind: TraversalKind,
    show_steps: bool,
    show_layout: bool,
) -> Result<()> {
    let tree = bst::build(values).context("at least one value is required")?;
    let steps = traverse_steps(Some(&tree), kind);

    let order: Vec<String> = steps.iter().map(|step| step.value.to_string()).collect();
    println!("{} ({}): {}", kind.name(), kind.hint(), order.join(" "));

    if show_steps {
        for (idx, step) in steps.iter().enumerate() {
            let before: Vec<String> =
                step.frontier_before.iter().map(|e| e.value.to_string()).collect();
            let after: Vec<String> =
                step.frontier_after.iter().map(|e| e.value.to_string()).collect();
            if kind.uses_frontier() {
                println!(
                    "{:>3}. visit {:<4} [{}] -> [{}]",
                    idx + 1,
                    step.value,
                    before.join(", "),
                    after.join(", ")
                );
            } else {
                println!("{:>3}. visit {}", idx + 1, step.value);
            }
        }
    }

    if show_layout {
        let config = LayoutConfig::default();
        if !config.fits_levels(shape::levels(Some(&tree))) {
            debug!("tree is deeper than the canvas, lower levels overflow");
        }
        for pos in layout(Some(&tree), &config) {
            println!(
                "{:<8} value={:<4} level={} x={:.1} y={:.1}",
                pos.node.id.as_str(),
                pos.node.value,
                pos.level,
                pos.x,
                pos.y
            );
        }
    }
    Ok(())
}

fn run_maze(size: usize, walls: f64, seed: u64) -> Result<()> {
    let config = MazeConfig::new(size, walls).context("invalid maze parameters")?;
    let mut rng = seeded_rng(seed);
    info!(seed, size, walls, "generating maze");

    let grid = generate_maze(&mut rng, &config).context("maze generation failed")?;
    let Some(path) = shortest_path(&grid) else {
        bail!("generated maze has no path");
    };

    println!("seed {seed}");
    print!("{}", grid.with_path_marked(&path));
    let cells: Vec<String> = path.iter().map(ToString::to_string).collect();
    println!("shortest path ({} cells): {}", path.len(), cells.join(" "));
    Ok(())
}

fn run_graph(round: u32, seed: u64) -> Result<()> {
    let config = GraphConfig::for_round(round);
    let mut rng = seeded_rng(seed);
    info!(seed, round, nodes = config.node_count, "generating graph");

    let graph = generate_graph(&mut rng, &config).context("graph generation failed")?;
    let start = letter_id(0);

    println!("seed {seed}");
    for (a, b) in graph.edges() {
        println!("{a} -- {b}");
    }
    let join = |ids: Vec<arborlab::NodeId>| {
        ids.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    };
    println!("dfs from {start}: {}", join(dfs_order(&graph, &start)));
    println!("bfs from {start}: {}", join(bfs_order(&graph, &start)));
    Ok(())
}

fn run_shape(values: Vec<i32>) -> Result<()> {
    let tree = bst::build(values).context("at least one value is required")?;
    let root = Some(&tree);

    println!("nodes:        {}", shape::node_count(root));
    println!("leaves:       {}", shape::leaf_count(root));
    println!("depth:        {}", shape::depth(root));
    println!("complete:     {}", shape::is_complete(root));
    println!("balanced:     {}", shape::is_balanced(root));
    println!("left-skewed:  {}", shape::is_left_skewed(root));
    println!("full:         {}", shape::is_full(root));
    println!("perfect:      {}", shape::is_perfect(root));
    println!("valid bst:    {}", bst::is_valid_bst(root));
    Ok(())
}
