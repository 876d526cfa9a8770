use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::info;

use shapview::config::{ContributionOrder, ViewConfig};
use shapview::input::{ReportError, load_report};
use shapview::report::{OutputError, write_reports};
use shapview::selection::{SelectionCoordinator, SelectionError};
use shapview::views::{ViewCache, render_selection};

#[derive(Debug, Parser)]
#[command(
    name = "shapview",
    version,
    about = "Turn SHAP / feature-importance reports into chart-ready view data"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render the views implied by a feature/observation selection
    Render(RenderArgs),
}

#[derive(Debug, Clone, Args)]
struct RenderArgs {
    /// Report payload (.json or .json.gz)
    #[arg(long)]
    input: PathBuf,

    /// Output directory
    #[arg(long)]
    out: PathBuf,

    /// Feature to select
    #[arg(long)]
    feature: Option<String>,

    /// Observation to drill down into (zero-based)
    #[arg(long)]
    observation: Option<usize>,

    /// Keep only the K most important features in the importance view
    #[arg(long = "top", value_name = "K")]
    top_k: Option<usize>,

    #[arg(long, value_enum, default_value_t = OrderArg::Magnitude)]
    order: OrderArg,

    #[arg(long, default_value_t = 100.0)]
    domain_max: f64,

    /// Report importance values as given instead of shares of the total
    #[arg(long)]
    raw_importance: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OrderArg {
    Magnitude,
    Payload,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("invalid --domain-max {0} (must be a positive number)")]
    DomainMax(f64),
}

fn main() {
    let cli = Cli::parse();
    shapview::logging::init(cli.verbose);
    if let Err(err) = run(cli.command) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Render(args) => render(&args).map(|_| ()),
    }
}

fn view_config(args: &RenderArgs) -> Result<ViewConfig, CliError> {
    if !args.domain_max.is_finite() || args.domain_max <= 0.0 {
        return Err(CliError::DomainMax(args.domain_max));
    }
    let mut config = ViewConfig::default_v1();
    config.domain_max = args.domain_max;
    config.top_k = args.top_k;
    config.normalize_importance = !args.raw_importance;
    config.waterfall_order = match args.order {
        OrderArg::Magnitude => ContributionOrder::Magnitude,
        OrderArg::Payload => ContributionOrder::Payload,
    };
    Ok(config)
}

fn render(args: &RenderArgs) -> Result<Vec<PathBuf>, CliError> {
    let config = view_config(args)?;
    let report = load_report(&args.input)?;

    let cache = Rc::new(RefCell::new(ViewCache::new()));
    let mut coordinator = SelectionCoordinator::new();
    let observer = Rc::clone(&cache);
    coordinator.subscribe(move |state| observer.borrow_mut().observe(state));

    coordinator.load_report(report);
    if let Some(feature) = &args.feature {
        coordinator.select_feature(feature)?;
    }
    if let Some(observation) = args.observation {
        coordinator.select_observation(observation)?;
    }

    let report = coordinator
        .active_report()
        .ok_or(SelectionError::NoReportLoaded)?;
    let views = render_selection(
        &report,
        coordinator.state(),
        &config,
        &mut cache.borrow_mut(),
    )?;
    let written = write_reports(&report, &views, &args.out)?;
    info!(
        report_id = %report.id,
        files = written.len(),
        "render complete"
    );
    Ok(written)
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
