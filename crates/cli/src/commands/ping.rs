use anyhow::Context;

use crate::client::Client;
use crate::output::{OutputFormat, ResultBuilder, print_result};

pub async fn execute(mut client: Client, format: OutputFormat) -> anyhow::Result<()> {
	let info = client.ping().await.with_context(|| format!("ping {}", client.addr()))?;
	let result = ResultBuilder::new("ping").data(info).build();
	print_result(&result, format);
	Ok(())
}
