//! Driver-side client for a running bridge.
//!
//! Holds one TCP connection, reopened on demand after a failure, so
//! requests from one client are executed in order.

use std::time::Duration;

use playbridge_protocol::{
	CallFunctionArgs, CommandName, FindActorArgs, IdArgs, PingInfo, PressKeyArgs, Request, Response, ScreenshotArgs, TypeTextArgs, WaitArgs,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::error::{CliError, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_SCREENSHOT_PATH: &str = "Screenshots/screenshot.png";
const POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug)]
pub struct Client {
	addr: String,
	timeout: Duration,
	stream: Option<BufReader<TcpStream>>,
}

/// Connectivity report produced by [`Client::diagnose`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
	pub connection: ConnectionReport,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub session: Option<PingInfo>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub actors: Vec<ActorReport>,
}

/// Whether a named actor resolves to a live instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorReport {
	pub name: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub path: Option<String>,
	pub is_live: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionReport {
	pub addr: String,
	pub reachable: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl Client {
	pub fn new(addr: impl Into<String>) -> Self {
		Self {
			addr: addr.into(),
			timeout: DEFAULT_TIMEOUT,
			stream: None,
		}
	}

	/// Per-request timeout. Waits get their own duration on top.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	pub fn addr(&self) -> &str {
		&self.addr
	}

	/// Sends a raw request and returns the bridge's response, whatever its
	/// `ok` value. Only transport failures are errors.
	pub async fn send(&mut self, request: &Request) -> Result<Response> {
		let budget = self.budget_for(request);
		trace!(target: "playbridge.transport", command = %request.command, "sending");
		match tokio::time::timeout(budget, self.roundtrip(request)).await {
			Ok(Ok(response)) => Ok(response),
			Ok(Err(err)) => {
				self.stream = None;
				Err(err)
			}
			Err(_) => {
				self.stream = None;
				Err(CliError::Timeout(budget))
			}
		}
	}

	pub async fn command(&mut self, name: CommandName, args: impl Serialize) -> Result<Response> {
		let args = serde_json::to_value(args)?;
		self.send(&Request::new(name.as_str(), args)).await
	}

	pub async fn ping(&mut self) -> Result<PingInfo> {
		let response = self.send(&Request::bare(CommandName::Ping.as_str())).await?;
		let result = successful(response)?;
		Ok(serde_json::from_value(result)?)
	}

	pub async fn click(&mut self, id: &str) -> Result<Response> {
		self.command(CommandName::ClickById, IdArgs { id: id.to_string() }).await
	}

	pub async fn type_text(&mut self, text: &str) -> Result<Response> {
		self.command(CommandName::TypeText, TypeTextArgs { text: text.to_string() }).await
	}

	pub async fn press_key(&mut self, key_chord: &str) -> Result<Response> {
		self.command(
			CommandName::PressKey,
			PressKeyArgs {
				key_chord: key_chord.to_string(),
			},
		)
		.await
	}

	pub async fn element_exists(&mut self, id: &str) -> Result<bool> {
		let response = self.command(CommandName::ElementExists, IdArgs { id: id.to_string() }).await?;
		bool_result(response)
	}

	pub async fn is_visible(&mut self, id: &str) -> Result<bool> {
		let response = self.command(CommandName::IsVisible, IdArgs { id: id.to_string() }).await?;
		bool_result(response)
	}

	/// Requests a screenshot, defaulting to [`DEFAULT_SCREENSHOT_PATH`].
	pub async fn screenshot(&mut self, path: Option<&str>) -> Result<Response> {
		let path = path.unwrap_or(DEFAULT_SCREENSHOT_PATH).to_string();
		self.command(CommandName::Screenshot, ScreenshotArgs { path }).await
	}

	/// Full object path of the named actor, or `None` if there is none.
	pub async fn find_actor_by_name(&mut self, name: &str) -> Result<Option<String>> {
		let response = self.command(CommandName::FindActorByName, FindActorArgs { name: name.to_string() }).await?;
		if !response.ok {
			return Ok(None);
		}
		Ok(response.result_str().filter(|path| !path.is_empty()).map(String::from))
	}

	pub async fn call_function(&mut self, object_path: &str, function_name: &str, params: &Value) -> Result<Response> {
		let params_json = match params {
			Value::Null => String::new(),
			other => serde_json::to_string(other)?,
		};
		self.command(
			CommandName::CallFunction,
			CallFunctionArgs {
				object_path: object_path.to_string(),
				function_name: function_name.to_string(),
				params_json,
			},
		)
		.await
	}

	pub async fn wait_for_seconds(&mut self, seconds: f64) -> Result<Response> {
		self.command(CommandName::WaitForSeconds, WaitArgs { seconds }).await
	}

	/// `true` when the bridge answers a ping.
	pub async fn is_alive(&mut self) -> bool {
		self.ping().await.is_ok()
	}

	/// Polls `check` every 200 ms until it returns `true` or `timeout`
	/// elapses. `check` always runs at least once.
	pub async fn wait_for<F>(&mut self, timeout: Duration, mut check: F) -> Result<bool>
	where
		F: AsyncFnMut(&mut Client) -> Result<bool>,
	{
		let deadline = Instant::now() + timeout;
		loop {
			if check(self).await? {
				return Ok(true);
			}
			if Instant::now() >= deadline {
				debug!(target: "playbridge.transport", ?timeout, "condition not met before timeout");
				return Ok(false);
			}
			tokio::time::sleep(POLL_INTERVAL).await;
		}
	}

	/// Polls until the element exists or `timeout` elapses.
	pub async fn wait_for_element(&mut self, id: &str, timeout: Duration) -> Result<bool> {
		self.wait_for(timeout, async |client: &mut Client| client.element_exists(id).await).await
	}

	/// Pings the bridge, then resolves each of `actors` by name. An actor
	/// is live when it resolves to a spawned instance rather than a class
	/// default object.
	pub async fn diagnose(&mut self, actors: &[String]) -> Diagnosis {
		let (session, error) = match self.ping().await {
			Ok(info) => (Some(info), None),
			Err(err) => (None, Some(err.to_string())),
		};

		let mut reports = Vec::new();
		if session.is_some() {
			for name in actors {
				let path = self.find_actor_by_name(name).await.ok().flatten();
				reports.push(ActorReport {
					name: name.clone(),
					is_live: path.as_deref().is_some_and(|path| !path.contains("Default__")),
					path,
				});
			}
		}

		Diagnosis {
			connection: ConnectionReport {
				addr: self.addr.clone(),
				reachable: session.is_some(),
				error,
			},
			session,
			actors: reports,
		}
	}

	fn budget_for(&self, request: &Request) -> Duration {
		let wait = if request.command == CommandName::WaitForSeconds.as_str() {
			request.args.get("seconds").and_then(Value::as_f64).filter(|s| s.is_finite() && *s > 0.0).unwrap_or(0.0)
		} else {
			0.0
		};
		self.timeout + Duration::from_secs_f64(wait.min(3600.0))
	}

	async fn roundtrip(&mut self, request: &Request) -> Result<Response> {
		if self.stream.is_none() {
			let stream = TcpStream::connect(&self.addr).await.map_err(|source| CliError::Connect {
				addr: self.addr.clone(),
				source,
			})?;
			self.stream = Some(BufReader::new(stream));
		}
		match self.stream.as_mut() {
			Some(stream) => exchange(stream, request).await,
			None => Err(CliError::Disconnected),
		}
	}
}

/// Writes one request line and reads one response line.
pub async fn exchange<S>(stream: &mut S, request: &Request) -> Result<Response>
where
	S: AsyncBufRead + AsyncWrite + Unpin,
{
	let mut payload = serde_json::to_string(request)?;
	payload.push('\n');
	stream.write_all(payload.as_bytes()).await?;
	stream.flush().await?;

	let mut line = String::new();
	if stream.read_line(&mut line).await? == 0 {
		return Err(CliError::Disconnected);
	}
	serde_json::from_str(&line).map_err(|e| CliError::Protocol(format!("unreadable response: {e}")))
}

fn successful(response: Response) -> Result<Value> {
	if response.ok {
		return Ok(response.result.unwrap_or(Value::Null));
	}
	Err(CliError::Protocol(format!(
		"{}: {}",
		response.error.map(|kind| kind.to_string()).unwrap_or_else(|| "ERROR".into()),
		response.message.unwrap_or_default()
	)))
}

fn bool_result(response: Response) -> Result<bool> {
	let ok = response.ok;
	response
		.result_bool()
		.filter(|_| ok)
		.ok_or_else(|| CliError::Protocol(response.message.unwrap_or_else(|| "expected a boolean result".into())))
}

#[cfg(test)]
mod tests {
	use playbridge_protocol::ErrorKind;
	use serde_json::json;
	use tokio::io::{AsyncReadExt, duplex};

	use super::*;

	#[tokio::test]
	async fn exchange_writes_one_line_and_reads_one() {
		let (client, mut server) = duplex(4096);
		let mut client = BufReader::new(client);

		let server_task = tokio::spawn(async move {
			let mut buf = vec![0u8; 1024];
			let n = server.read(&mut buf).await.unwrap();
			let line = String::from_utf8_lossy(&buf[..n]).to_string();
			server.write_all(b"{\"ok\":true,\"result\":true}\n").await.unwrap();
			line
		});

		let response = exchange(&mut client, &Request::new("ElementExists", json!({"id": "hud"}))).await.unwrap();
		assert!(response.ok);
		assert_eq!(response.result_bool(), Some(true));

		let sent = server_task.await.unwrap();
		assert!(sent.ends_with('\n'));
		let request: Request = serde_json::from_str(sent.trim()).unwrap();
		assert_eq!(request.command, "ElementExists");
	}

	#[tokio::test]
	async fn exchange_reports_closed_stream() {
		let (client, server) = duplex(64);
		drop(server);
		let mut client = BufReader::new(client);
		let err = exchange(&mut client, &Request::bare("Ping")).await.unwrap_err();
		assert!(matches!(err, CliError::Io(_) | CliError::Disconnected));
	}

	#[test]
	fn wait_budget_extends_timeout() {
		let client = Client::new("127.0.0.1:1").timeout(Duration::from_secs(1));
		assert_eq!(client.budget_for(&Request::bare("Ping")), Duration::from_secs(1));
		assert_eq!(
			client.budget_for(&Request::new("WaitForSeconds", json!({"seconds": 2.5}))),
			Duration::from_millis(3500)
		);
		assert_eq!(
			client.budget_for(&Request::new("WaitForSeconds", json!({"seconds": -4}))),
			Duration::from_secs(1)
		);
	}

	#[test]
	fn failed_response_is_protocol_error() {
		let err = successful(Response::failure(ErrorKind::NotFound, "gone")).unwrap_err();
		assert_eq!(err.to_string(), "protocol error: NOT_FOUND: gone");
		assert!(bool_result(Response::success("yes")).is_err());
	}

	#[tokio::test]
	async fn unreachable_bridge_is_not_alive() {
		let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
		let addr = listener.local_addr().unwrap();
		drop(listener);

		let mut client = Client::new(addr.to_string()).timeout(Duration::from_millis(500));
		assert!(!client.is_alive().await);
		let report = client.diagnose(&["GameMode".to_string()]).await;
		assert!(!report.connection.reachable);
		assert!(report.actors.is_empty());
		assert!(report.connection.error.is_some());
		assert!(report.session.is_none());
	}
}
