mod diagnose;
mod ping;
mod send;
mod serve;

use std::path::Path;
use std::time::Duration;

use crate::cli::{Commands, ConnectArgs};
use crate::client::Client;
use crate::config::BridgeConfig;
use crate::output::OutputFormat;

pub async fn dispatch(command: Commands, config_path: Option<&Path>, format: OutputFormat) -> anyhow::Result<()> {
	let config = BridgeConfig::load(config_path)?;

	match command {
		Commands::Serve {
			host,
			port,
			output_root,
			frame_rate,
		} => {
			let config = config.with_host(host).with_port(port).with_output_root(output_root).with_frame_rate(frame_rate);
			serve::execute(config).await
		}
		Commands::Ping { connect } => ping::execute(client_for(&config, connect), format).await,
		Commands::Send { command, args, connect } => send::execute(client_for(&config, connect), &command, &args, format).await,
		Commands::Diagnose { connect, actors } => diagnose::execute(client_for(&config, connect), actors, format).await,
	}
}

fn client_for(config: &BridgeConfig, connect: ConnectArgs) -> Client {
	let config = config.clone().with_host(connect.host).with_port(connect.port);
	Client::new(config.addr()).timeout(Duration::from_millis(connect.timeout_ms))
}
