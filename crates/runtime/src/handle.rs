//! Thread-safe entry points into a running simulation loop.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use playbridge_protocol::{Request, Response};
use tokio::sync::{mpsc, oneshot};

use crate::error::{Result, RuntimeError};

/// Identifies one driver connection. Requests from the same connection are
/// executed in order; connections are served in ascending id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl fmt::Display for ConnectionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "conn-{}", self.0)
	}
}

#[derive(Debug)]
pub(crate) enum Inbound {
	Request {
		connection: ConnectionId,
		request: Request,
		reply: oneshot::Sender<Response>,
	},
	Close(ConnectionId),
}

/// Cloneable handle for opening connections to a [`SimulationLoop`](crate::SimulationLoop).
#[derive(Debug, Clone)]
pub struct BridgeHandle {
	tx: mpsc::UnboundedSender<Inbound>,
	next_id: Arc<AtomicU64>,
}

impl BridgeHandle {
	pub(crate) fn new(tx: mpsc::UnboundedSender<Inbound>) -> Self {
		Self {
			tx,
			next_id: Arc::new(AtomicU64::new(1)),
		}
	}

	pub fn connect(&self) -> Connection {
		let id = ConnectionId(self.next_id.fetch_add(1, Ordering::SeqCst));
		Connection { id, tx: self.tx.clone() }
	}

	/// Returns `true` while the loop is still accepting requests.
	pub fn is_open(&self) -> bool {
		!self.tx.is_closed()
	}
}

/// One driver's ordered request stream. Dropping it discards any requests
/// still queued for it.
#[derive(Debug)]
pub struct Connection {
	id: ConnectionId,
	tx: mpsc::UnboundedSender<Inbound>,
}

impl Connection {
	pub fn id(&self) -> ConnectionId {
		self.id
	}

	/// Queues `request` and returns a receiver for its response.
	pub fn send(&self, request: Request) -> Result<oneshot::Receiver<Response>> {
		let (reply, rx) = oneshot::channel();
		self.tx
			.send(Inbound::Request {
				connection: self.id,
				request,
				reply,
			})
			.map_err(|_| RuntimeError::LoopClosed)?;
		Ok(rx)
	}

	/// Queues `request` and waits for its response.
	pub async fn submit(&self, request: Request) -> Result<Response> {
		let rx = self.send(request)?;
		rx.await.map_err(|_| RuntimeError::ReplyDropped)
	}
}

impl Drop for Connection {
	fn drop(&mut self) {
		let _ = self.tx.send(Inbound::Close(self.id));
	}
}
