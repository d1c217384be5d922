use clap::Parser;
use playbridge_cli::{cli::Cli, commands, logging};
use tracing::error;

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	if let Err(err) = commands::dispatch(cli.command, cli.config.as_deref(), cli.format).await {
		error!(target: "playbridge", error = %format!("{err:#}"), "command failed");
		std::process::exit(1);
	}
}
