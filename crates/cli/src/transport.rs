//! Newline-delimited JSON over TCP.
//!
//! Each line is one [`Request`]; each reply is one [`Response`] line. A
//! socket maps to one bridge [`Connection`](playbridge_runtime::Connection),
//! so requests on it execute in order. Lines longer than
//! [`MAX_REQUEST_BYTES`] are discarded and answered with
//! `MALFORMED_REQUEST`.

use std::future::Future;

use playbridge_protocol::{ErrorKind, Request, Response};
use playbridge_runtime::{BridgeHandle, RuntimeError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::error::Result;

/// Longest request line accepted, excluding the newline.
pub const MAX_REQUEST_BYTES: usize = 1024 * 1024;

/// Accepts connections until `shutdown` resolves.
pub async fn serve(listener: TcpListener, handle: BridgeHandle, shutdown: impl Future<Output = ()>) -> Result<()> {
	tokio::pin!(shutdown);
	info!(target: "playbridge.transport", addr = %listener.local_addr()?, "listening");

	loop {
		tokio::select! {
			_ = &mut shutdown => break,
			accepted = listener.accept() => {
				let (stream, peer) = match accepted {
					Ok(accepted) => accepted,
					Err(err) => {
						warn!(target: "playbridge.transport", error = %err, "accept failed");
						continue;
					}
				};
				let handle = handle.clone();
				tokio::spawn(async move {
					debug!(target: "playbridge.transport", %peer, "driver connected");
					if let Err(err) = serve_stream(stream, handle).await {
						debug!(target: "playbridge.transport", %peer, error = %err, "driver connection ended with error");
					}
					debug!(target: "playbridge.transport", %peer, "driver disconnected");
				});
			}
		}
	}

	info!(target: "playbridge.transport", "transport stopped");
	Ok(())
}

/// Serves one driver stream until EOF or until the loop stops.
pub async fn serve_stream<S>(stream: S, handle: BridgeHandle) -> Result<()>
where
	S: AsyncRead + AsyncWrite + Unpin,
{
	let connection = handle.connect();
	let (read, mut write) = tokio::io::split(stream);
	let mut reader = BufReader::new(read);
	let mut buf = Vec::new();

	loop {
		buf.clear();
		let limit = MAX_REQUEST_BYTES as u64 + 1;
		if (&mut reader).take(limit).read_until(b'\n', &mut buf).await? == 0 {
			break;
		}
		if buf.last() == Some(&b'\n') {
			buf.pop();
		} else if buf.len() > MAX_REQUEST_BYTES {
			discard_line(&mut reader).await?;
			warn!(target: "playbridge.transport", limit = MAX_REQUEST_BYTES, "oversized request line discarded");
			let response = Response::failure(ErrorKind::MalformedRequest, format!("request line exceeds {MAX_REQUEST_BYTES} bytes"));
			write_response(&mut write, &response).await?;
			continue;
		}

		let response = match std::str::from_utf8(&buf) {
			Ok(line) if line.trim().is_empty() => continue,
			Ok(line) => match serde_json::from_str::<Request>(line) {
				Ok(request) => match connection.submit(request).await {
					Ok(response) => response,
					Err(RuntimeError::LoopClosed) => break,
					Err(err) => Response::failure(ErrorKind::IoFailure, err.to_string()),
				},
				Err(err) => Response::failure(ErrorKind::MalformedRequest, format!("invalid request line: {err}")),
			},
			Err(err) => Response::failure(ErrorKind::MalformedRequest, format!("request line is not UTF-8: {err}")),
		};
		write_response(&mut write, &response).await?;
	}
	Ok(())
}

async fn write_response<W: AsyncWrite + Unpin>(write: &mut W, response: &Response) -> Result<()> {
	let mut payload = serde_json::to_string(response)?;
	payload.push('\n');
	write.write_all(payload.as_bytes()).await?;
	write.flush().await?;
	Ok(())
}

/// Consumes input up to and including the next newline without buffering it.
async fn discard_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> std::io::Result<()> {
	loop {
		let chunk = reader.fill_buf().await?;
		if chunk.is_empty() {
			return Ok(());
		}
		match chunk.iter().position(|byte| *byte == b'\n') {
			Some(end) => {
				reader.consume(end + 1);
				return Ok(());
			}
			None => {
				let len = chunk.len();
				reader.consume(len);
			}
		}
	}
}
