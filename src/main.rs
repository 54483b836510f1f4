use clap::{Parser, Subcommand};
use concept_map::config::{self, ProjectConfig};
use concept_map::outline;
use concept_map::output;
use concept_map::pipeline;
use concept_map::render::{self, RenderEvent, RenderOptions};
use concept_map::rendering::{GraphvizBackend, OutputFormat};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;
use tracing_subscriber::EnvFilter;

/// Shared flags for commands that render diagrams.
#[derive(clap::Args, Clone)]
struct RenderArgs {
    /// Top-level entries per diagram (overrides [chunks] size)
    #[arg(long)]
    chunk_size: Option<NonZeroUsize>,

    /// Diagram format: png, svg, pdf, jpg or dot (overrides [graph] format)
    #[arg(long)]
    format: Option<OutputFormat>,
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "concept-map")]
#[command(about = "Turn an indented outline into concept map diagrams")]
#[command(long_about = "\
Turn an indented outline into concept map diagrams

Write one concept per line. Four spaces of indentation nest a concept under
the line above it; colons are ignored and blank lines are skipped.

  Cells:
      Structure
          Membrane
          Nucleus
      Division
  Genetics
      DNA

The outline is saved as structure.json, its top-level entries are split into
chunks, each chunk becomes one Graphviz diagram, and the diagrams are
collected into concept_map.html together with process_metadata.json.

Rendering images needs Graphviz ('dot') on the PATH. Use '--format dot' to
write DOT sources only.

Run 'concept-map gen-config' to generate a documented concept-map.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Outline file to read
    #[arg(long, default_value = "outline.txt", global = true)]
    input: PathBuf,

    /// Output directory for structure, diagrams, document and metadata
    #[arg(long, default_value = "concept-map-output", global = true)]
    output: PathBuf,

    /// Config file (default: concept-map.toml next to the input, if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse the outline into structure.json
    Parse,
    /// Render chunk diagrams from structure.json
    Render(RenderArgs),
    /// Run the full pipeline: parse → render → document
    Build(RenderArgs),
    /// Parse the outline and report its shape without writing anything
    Check,
    /// Print a stock concept-map.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match &cli.command {
        Command::Parse => {
            let tree = outline::read_outline(&cli.input)?;
            let structure_path = outline::write_structure(&tree, &cli.output)?;
            output::print_parse_output(&tree, &outline::stats(&tree), Some(&structure_path));
        }
        Command::Render(render_args) => {
            let config = load_project_config(&cli)?
                .with_overrides(render_args.chunk_size, render_args.format);
            init_thread_pool(&config.processing);
            let backend = GraphvizBackend::new(config.graphviz.command.clone());
            let structure_path = cli.output.join(outline::STRUCTURE_FILE);
            let (tx, printer) = spawn_printer();
            let result = render::render_from_structure(
                &backend,
                &structure_path,
                &RenderOptions::from_config(&config),
                &cli.output,
                Some(tx),
            );
            printer.join().ok();
            result?;
        }
        Command::Build(render_args) => {
            let config = load_project_config(&cli)?
                .with_overrides(render_args.chunk_size, render_args.format);
            init_thread_pool(&config.processing);
            let backend = GraphvizBackend::new(config.graphviz.command.clone());

            println!("==> Building {} → {}", cli.input.display(), cli.output.display());
            let (tx, printer) = spawn_printer();
            let result = pipeline::build(&backend, &cli.input, &cli.output, &config, Some(tx));
            printer.join().ok();
            let metadata = result?;
            output::print_build_output(&metadata, &cli.output);
        }
        Command::Check => {
            load_project_config(&cli)?;
            println!("==> Checking {}", cli.input.display());
            let tree = outline::read_outline(&cli.input)?;
            output::print_parse_output(&tree, &outline::stats(&tree), None);
            println!("==> Outline is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load `--config` if given, else the optional `concept-map.toml` next to the input.
fn load_project_config(cli: &Cli) -> Result<ProjectConfig, config::ConfigError> {
    match &cli.config {
        Some(path) => config::load_config_file(path),
        None => config::load_config(input_dir(&cli.input)),
    }
}

fn input_dir(input: &Path) -> &Path {
    match input.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Print render progress from a background thread as chunks finish.
fn spawn_printer() -> (Sender<RenderEvent>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_render_event(&event) {
                println!("{}", line);
            }
        }
    });
    (tx, printer)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores. Users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
