mod dataset;
mod error;
mod input;
mod logging;
mod model;
mod pipeline;
mod report;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::dataset::{
    Cohort, DatasetKey, Region, Resolution, Subset, refilter_subset, resolve, subset_options,
};
use crate::error::ViewerError;
use crate::pipeline::selection::InteractionEvent;
use crate::pipeline::serve::serve;
use crate::pipeline::session::{Controls, Session, ViewerConfig};
use crate::report::{render_frame_summary, write_frame_json};

#[derive(Parser, Debug)]
#[command(
    name = "clones2cells",
    version,
    about = "Link clone2vec clone embeddings to gene-expression embeddings"
)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the cell subsets offered for a body region
    Options {
        #[arg(long, value_enum)]
        region: Region,
        /// Subset chosen before the region change; reports what stays selected
        #[arg(long, value_enum)]
        previous: Option<Subset>,
    },
    /// Print the clone and cell tables for a dataset selection
    Resolve {
        #[arg(long, value_enum)]
        cohort: Cohort,
        #[arg(long, value_enum)]
        region: Region,
        #[arg(long, value_enum, default_value = "all")]
        subset: Subset,
    },
    /// Render both linked plots as JSON
    Render(RenderArgs),
    /// Answer newline-delimited JSON requests from stdin, one frame per line
    Serve {
        /// Directory holding the clone2vec_*.csv and GEX_*.csv tables
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Directory holding the clone2vec_*.csv and GEX_*.csv tables
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
    #[arg(long, value_enum)]
    cohort: Cohort,
    #[arg(long, value_enum)]
    region: Region,
    #[arg(long, value_enum, default_value = "0.5")]
    resolution: Resolution,
    #[arg(long, value_enum, default_value = "all")]
    subset: Subset,
    /// Clone plot point numbers, comma-separated
    #[arg(long, value_delimiter = ',', conflicts_with = "event")]
    select: Vec<usize>,
    /// JSON file with the clone plot's selection event
    #[arg(long)]
    event: Option<PathBuf>,
    /// Output path for the frame JSON (stdout if omitted)
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);
    if let Err(err) = run(cli.command) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), ViewerError> {
    match command {
        Command::Options { region, previous } => {
            let current = previous.map(|p| refilter_subset(region, p));
            for &subset in subset_options(region) {
                let marker = if Some(subset) == current { "*" } else { " " };
                println!("{marker} {}", subset.label());
            }
            Ok(())
        }
        Command::Resolve {
            cohort,
            region,
            subset,
        } => {
            let refs = resolve(cohort, region, subset)?;
            println!("{}\n{}", refs.clones, refs.cells);
            Ok(())
        }
        Command::Render(args) => run_render(args),
        Command::Serve { data_dir } => {
            let mut session = Session::new(ViewerConfig::new(data_dir));
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            let stats = serve(&mut session, stdin.lock(), stdout.lock())?;
            tracing::info!(
                requests = stats.requests,
                frames = stats.frames,
                errors = stats.errors,
                "session closed"
            );
            Ok(())
        }
    }
}

/// Point numbers given on the command line refer to the dataset being rendered.
fn read_event(
    args: &RenderArgs,
    key: DatasetKey,
) -> Result<Option<InteractionEvent>, ViewerError> {
    if let Some(path) = &args.event {
        let text = std::fs::read_to_string(path)?;
        let event = InteractionEvent::from_json(&text).map_err(ViewerError::Event)?;
        return Ok(Some(event));
    }
    if args.select.is_empty() {
        Ok(None)
    } else {
        Ok(Some(
            InteractionEvent::from_points(args.select.clone()).for_dataset(key),
        ))
    }
}

fn run_render(args: RenderArgs) -> Result<(), ViewerError> {
    let controls = Controls {
        cohort: args.cohort,
        region: args.region,
        resolution: args.resolution,
        subset: args.subset,
    };
    let event = read_event(&args, controls.key()?)?;

    let mut session = Session::new(ViewerConfig::new(&args.data_dir));
    let frame = session.frame(&controls, event.as_ref())?;
    for line in render_frame_summary(frame).lines() {
        tracing::info!("{line}");
    }
    write_frame_json(frame, args.out.as_deref())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
