/*
Copyright 2024 San Francisco Compute Company

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use clap::Parser;
use colored::Colorize;
use env_logger::Env;
use log::{debug, warn};
use rigcheck::{
    ContainerConfigBuilder, GameQuery, OutputFormat, OutputFormatter, ProviderKind,
    ServiceContainer,
};
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "rigcheck",
    about = "Check whether this PC meets a game's minimum system requirements"
)]
struct Opt {
    /// Game title to look up
    #[arg(long, required_unless_present_any = ["app_id", "load"])]
    game: Option<String>,

    /// Steam AppID to look up instead of a title
    #[arg(long, conflicts_with = "game")]
    app_id: Option<String>,

    /// Read system specs from an existing dxdiag XML report
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Diagnostics provider (auto, dxdiag or sysinfo)
    #[arg(long, default_value = "auto")]
    provider: ProviderKind,

    /// Load CPU and GPU rank tables from a TOML file
    #[arg(long, value_name = "FILE")]
    tables: Option<PathBuf>,

    /// Save the outcome to a file (TOML when the extension is .toml, JSON otherwise)
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,

    /// Show a previously saved outcome instead of running a check
    #[arg(long, value_name = "FILE", conflicts_with_all = ["game", "app_id", "save"])]
    load: Option<PathBuf>,

    /// Output format (text, json or toml)
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// RAWG API key used for title searches
    #[arg(long, env = "RAWG_API_KEY", hide_env_values = true)]
    rawg_key: Option<String>,

    /// Seconds to wait for the diagnostics tool
    #[arg(long, default_value_t = 120)]
    timeout: u64,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let opt = Opt::parse();

    let default_level = if opt.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    let config = ContainerConfigBuilder::new()
        .command_timeout(Duration::from_secs(opt.timeout))
        .verbose(opt.verbose)
        .provider(opt.provider)
        .report_path(opt.report.clone())
        .tables_path(opt.tables.clone())
        .rawg_api_key(opt.rawg_key.clone())
        .output_format(opt.format)
        .build();
    let container = ServiceContainer::new(config);
    debug!("Running on {}", container.get_platform_name());

    let formatter = OutputFormatter::new(
        container
            .create_configuration_provider()
            .get_output_format()
            .await?,
    );

    if let Some(path) = &opt.load {
        let outcome = container.create_report_repository().load(path).await?;
        println!("{}", formatter.render(&outcome)?);
        return Ok(());
    }

    let service = container.create_compatibility_service().await?;

    let missing = service.validate_dependencies().await?;
    if !missing.is_empty() {
        warn!("Missing dependencies: {}", missing.join(", "));
    }

    let query = match (&opt.app_id, &opt.game) {
        (Some(app_id), _) => GameQuery::by_app_id(app_id),
        (None, Some(name)) => GameQuery::by_name(name),
        (None, None) => return Err("either --game or --app-id is required".into()),
    };

    let outcome = service.check(&query).await?;
    println!("{}", formatter.render(&outcome)?);

    if let Some(path) = &opt.save {
        container
            .create_report_repository()
            .save(&outcome, path)
            .await?;
        eprintln!("{} {}", "Saved outcome to".green(), path.display());
    }

    if outcome.report.is_none() {
        std::process::exit(1);
    }
    Ok(())
}
