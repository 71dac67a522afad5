use std::{path::PathBuf, process};

use anyhow::Result;
use clap::ArgMatches;
use pepe::cli::{build_cli, exit_code, handlers};

#[tokio::main]
async fn main() {
    let matches = build_cli().get_matches();

    if let Err(err) = run(&matches).await {
        #[allow(clippy::print_stderr)]
        {
            eprintln!("Error: {err}");
        }

        #[allow(clippy::exit)]
        process::exit(exit_code(&err));
    }
}

async fn run(matches: &ArgMatches) -> Result<()> {
    let explicit = matches.get_one::<PathBuf>("config").map(PathBuf::as_path);
    let config = pepe_core::config::load_config(explicit)?;
    pepe::logging::init(&config.log.filter);

    let services = handlers::Services::open(&config).await?;
    let result = handlers::dispatch(matches, &services).await;
    services.close().await;
    result
}
