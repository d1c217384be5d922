use anyhow::Context;
use playbridge::{Dispatcher, EvidenceCapture, Session};
use playbridge_runtime::SimulationLoop;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use crate::config::BridgeConfig;
use crate::demo::DemoApp;
use crate::output::{OutputFormat, ResultBuilder, print_result};
use crate::transport;

pub async fn execute(config: BridgeConfig) -> anyhow::Result<()> {
	let session = Session::new(config.protocol_version.clone());
	let evidence = EvidenceCapture::new(&config.output_root)?;
	let listener = TcpListener::bind(config.addr()).await.with_context(|| format!("bind {}", config.addr()))?;
	let addr = listener.local_addr()?;

	let started = ResultBuilder::new("serve")
		.data(json!({
			"addr": addr.to_string(),
			"session": session.id(),
			"version": session.version(),
			"outputRoot": evidence.root(),
		}))
		.build();
	print_result(&started, OutputFormat::Ndjson);

	let sim = SimulationLoop::new(DemoApp::new(), Dispatcher::new(session, evidence)).frame_rate(config.frame_rate_hz);
	let handle = sim.handle();

	let (stop_tx, stop_rx) = watch::channel(());
	let mut loop_stop = stop_rx.clone();
	let mut transport_stop = stop_rx;

	let signal = async move {
		let _ = tokio::signal::ctrl_c().await;
		info!(target: "playbridge", "shutdown requested");
		let _ = stop_tx.send(());
	};
	let frames = sim.run(async move {
		let _ = loop_stop.changed().await;
	});
	let accept = transport::serve(listener, handle, async move {
		let _ = transport_stop.changed().await;
	});

	let (_, _, served) = tokio::join!(signal, frames, accept);
	served?;
	Ok(())
}
