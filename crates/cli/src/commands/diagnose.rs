use crate::client::Client;
use crate::output::{OutputFormat, ResultBuilder, print_result};

pub async fn execute(mut client: Client, actors: Vec<String>, format: OutputFormat) -> anyhow::Result<()> {
	let report = client.diagnose(&actors).await;
	let builder = ResultBuilder::new("diagnose");
	let builder = match &report.connection.error {
		Some(error) => builder.error("UNREACHABLE", error.clone()),
		None => builder,
	};
	print_result(&builder.data(report).build(), format);
	Ok(())
}
