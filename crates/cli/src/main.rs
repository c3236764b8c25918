use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tailmap::commands::{
    expand_ignore_command, full_graph_command, gen_annotations_command, list_functions_command,
    raw_cg_command, RawCgOptions,
};
use tracing_subscriber::EnvFilter;

/// Tail-call aware call-graph reconstruction for eBPF datapath IR.
///
/// This CLI is a thin wrapper around `tailmap-core` (exposed in code as
/// `tailmap_core`). All substantive logic lives in the library.
#[derive(Parser, Debug)]
#[command(
    name = "tailmap",
    version,
    about = "Reconstruct call graphs, including static tail calls, from LLVM IR",
    long_about = None
)]
struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the call graph reachable from a start function as DOT.
    ///
    /// Tail calls through the program array are followed like ordinary
    /// calls and drawn in orange.
    RawCg {
        /// Textual LLVM IR (`.ll`) to analyse.
        #[arg(long)]
        input: PathBuf,

        /// Function the walk starts from.
        #[arg(long)]
        start: String,

        /// Function name or `@alias` to leave out. Repeatable; defaults to
        /// the config's list, then `@default`.
        #[arg(long)]
        ignore: Vec<String>,

        /// Annotation file to overlay. Repeatable.
        #[arg(long = "an")]
        annotations: Vec<PathBuf>,

        /// YAML tool config with extra aliases.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write DOT here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Render every function and every call between them as DOT.
    FullGraph {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List the functions defined in an IR file.
    ListFunctions {
        #[arg(long)]
        input: PathBuf,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Print the flat set of names an ignore list expands to.
    ExpandIgnore {
        #[arg(long)]
        ignore: Vec<String>,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate annotation records from a C source file.
    GenAnnotations {
        source: PathBuf,

        /// Prefix to strip from the recorded file name.
        #[arg(long)]
        strip: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "tailmap=debug,tailmap_core=debug" } else { "tailmap=warn,tailmap_core=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::RawCg { input, start, ignore, annotations, config, output } => {
            raw_cg_command(&RawCgOptions { input, start, ignore, annotations, config, output })?
        }
        Command::FullGraph { input, output } => full_graph_command(&input, output.as_deref())?,
        Command::ListFunctions { input, json } => list_functions_command(&input, json)?,
        Command::ExpandIgnore { ignore, config } => {
            expand_ignore_command(&ignore, config.as_deref())?
        }
        Command::GenAnnotations { source, strip } => {
            gen_annotations_command(&source, strip.as_deref())?
        }
    }

    Ok(())
}
