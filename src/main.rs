//! Thank You Stars - CLI entry point

use clap::Parser;
use console::style;
use std::process::ExitCode;
use thank_you_stars::cli::{commands, Cli};
use thank_you_stars::config::{Config, ConfigManager};
use thank_you_stars::error::StarsResult;
use thank_you_stars::ui::{self, UiContext};
use thank_you_stars::walk::DependencyWalker;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: Cli) -> StarsResult<()> {
    // Reject a bad depth before touching pip or the network
    let walker = DependencyWalker::new(cli.depth)?;

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let mut config = config_manager.load()?;

    init_logging(&cli, &config);
    ui::init_theme();

    let ctx = UiContext::detect().with_quiet(cli.quiet || cli.machine_output());

    if cli.setup {
        commands::setup(&ctx, &config_manager, &mut config)?;
    }

    commands::run(&cli, &config, &ctx, walker)
}

/// Install the global subscriber: info by default, --debug for debug, --quiet for nothing
fn init_logging(cli: &Cli, config: &Config) {
    let filter = if cli.quiet {
        EnvFilter::new("off")
    } else if cli.debug {
        EnvFilter::new("thank_you_stars=debug")
    } else {
        EnvFilter::new("thank_you_stars=info")
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.general.log_format.eq_ignore_ascii_case("json") {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
