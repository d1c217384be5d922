use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "pbridge")]
#[command(about = "Drive a running application through the playbridge automation protocol")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug, -vvv trace)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Configuration file (defaults to <config dir>/playbridge/config.json)
	#[arg(long, global = true, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Output format
	#[arg(short, long, global = true, value_enum, default_value = "json")]
	pub format: OutputFormat,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ConnectArgs {
	/// Bridge host
	#[arg(long)]
	pub host: Option<String>,

	/// Bridge port
	#[arg(short, long)]
	pub port: Option<u16>,

	/// Per-request timeout in milliseconds
	#[arg(long, default_value = "5000")]
	pub timeout_ms: u64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Run the bridge over the built-in headless demo host
	Serve {
		/// Address to bind
		#[arg(long)]
		host: Option<String>,

		/// Port to bind
		#[arg(short, long)]
		port: Option<u16>,

		/// Screenshot output root
		#[arg(long, value_name = "DIR")]
		output_root: Option<PathBuf>,

		/// Simulation frame rate
		#[arg(long, value_name = "HZ")]
		frame_rate: Option<u32>,
	},

	/// Check that a bridge is answering
	Ping {
		#[command(flatten)]
		connect: ConnectArgs,
	},

	/// Send one protocol command
	Send {
		/// Command name (e.g. ClickById)
		command: String,

		/// Command arguments as a JSON object
		#[arg(short, long, default_value = "{}")]
		args: String,

		#[command(flatten)]
		connect: ConnectArgs,
	},

	/// Report connectivity and session details
	#[command(alias = "diag")]
	Diagnose {
		#[command(flatten)]
		connect: ConnectArgs,

		/// Actor names to check for a live instance (repeatable)
		#[arg(long = "actor", value_name = "NAME")]
		actors: Vec<String>,
	},
}
