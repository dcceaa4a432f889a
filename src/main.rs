use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use vitals::config::{Config, load_config, load_config_from_path};
use vitals::render;
use vitals::snapshot;
use vitals::source::HostFs;

#[derive(Parser)]
#[command(
    name = "vitals",
    about = "Point-in-time host vitals from the kernel pseudo-files"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read kernel pseudo-files under this prefix instead of /
    #[arg(long)]
    root: Option<PathBuf>,

    /// Output format: table or json
    #[arg(long)]
    format: Option<String>,

    /// Skip the per-core utilization rows in table output
    #[arg(long, default_value_t = false)]
    no_per_core: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);

    let source = match &config.general.root {
        Some(root) => HostFs::rooted(root),
        None => HostFs::new(),
    };

    // One snapshot per invocation. The sampling interval inside gather is
    // the only long suspension, so losing the race to Ctrl-C abandons the
    // sample right there.
    let snapshot = tokio::select! {
        result = snapshot::gather(&source) => result?,
        _ = tokio::signal::ctrl_c() => return Ok(()),
    };

    match config.output.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        _ => {
            for line in render::table(&snapshot, config.output.per_core) {
                println!("{line}");
            }
        }
    }

    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(ref root) = cli.root {
        config.general.root = Some(root.clone());
    }
    if let Some(ref format) = cli.format {
        config.output.format = format.clone();
    }
    if cli.no_per_core {
        config.output.per_core = false;
    }

    config
}
