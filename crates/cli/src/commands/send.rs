use anyhow::Context;
use playbridge_protocol::{CommandName, Request};
use serde_json::Value;
use tracing::warn;

use crate::client::Client;
use crate::error::CliError;
use crate::output::{OutputFormat, from_response, print_result};

pub async fn execute(mut client: Client, command: &str, args: &str, format: OutputFormat) -> anyhow::Result<()> {
	let args: Value = serde_json::from_str(args).map_err(|e| CliError::InvalidArgs(format!("--args is not JSON: {e}")))?;
	if !args.is_object() {
		return Err(CliError::InvalidArgs("--args must be a JSON object".into()).into());
	}
	if CommandName::lookup(command).is_none() {
		warn!(target: "playbridge", %command, "not a known command; sending anyway");
	}

	let response = client
		.send(&Request::new(command, args))
		.await
		.with_context(|| format!("send {command} to {}", client.addr()))?;

	let ok = response.ok;
	print_result(&from_response(command, response), format);
	if !ok {
		anyhow::bail!("{command} failed");
	}
	Ok(())
}
