//! The frame loop that owns the application.

use std::collections::{BTreeMap, VecDeque};
use std::future::Future;
use std::time::Duration;

use playbridge::{Dispatcher, Outcome};
use playbridge_protocol::{Request, Response};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, trace};

use crate::app::Application;
use crate::handle::{BridgeHandle, ConnectionId, Inbound};
use crate::timer::TimerQueue;

const DEFAULT_FRAME: Duration = Duration::from_micros(16_667);
const DEFAULT_PRUNE_INTERVAL: u64 = 60;

struct Queued {
	request: Request,
	reply: oneshot::Sender<Response>,
}

#[derive(Default)]
struct ConnectionState {
	queue: VecDeque<Queued>,
	parked: bool,
}

struct Pending {
	connection: ConnectionId,
	response: Response,
	reply: oneshot::Sender<Response>,
}

/// Owns the application and runs every automation command on its context.
///
/// Each frame:
/// 1. drains newly arrived requests into per-connection queues,
/// 2. fires due wait timers and resumes their connections,
/// 3. ticks the application,
/// 4. executes queued requests, connection by connection.
///
/// Every [`prune_interval`](Self::prune_interval) frames the registry is
/// swept of entries whose widget has been destroyed.
///
/// A connection with a pending wait is parked; its later requests stay
/// queued until the wait completes. Other connections are unaffected.
pub struct SimulationLoop<A> {
	app: A,
	dispatcher: Dispatcher,
	handle: BridgeHandle,
	inbox: mpsc::UnboundedReceiver<Inbound>,
	connections: BTreeMap<ConnectionId, ConnectionState>,
	timers: TimerQueue<Pending>,
	frame: Duration,
	frames: u64,
	prune_interval: u64,
}

impl<A: Application> SimulationLoop<A> {
	pub fn new(app: A, dispatcher: Dispatcher) -> Self {
		let (tx, inbox) = mpsc::unbounded_channel();
		Self {
			app,
			dispatcher,
			handle: BridgeHandle::new(tx),
			inbox,
			connections: BTreeMap::new(),
			timers: TimerQueue::new(),
			frame: DEFAULT_FRAME,
			frames: 0,
			prune_interval: DEFAULT_PRUNE_INTERVAL,
		}
	}

	/// Sets the target frame rate used by [`run`](Self::run).
	pub fn frame_rate(mut self, hz: u32) -> Self {
		self.frame = Duration::from_secs_f64(1.0 / f64::from(hz.max(1)));
		self
	}

	/// Sets how many frames pass between registry sweeps. Zero is treated
	/// as one.
	pub fn prune_interval(mut self, frames: u64) -> Self {
		self.prune_interval = frames.max(1);
		self
	}

	pub fn handle(&self) -> BridgeHandle {
		self.handle.clone()
	}

	pub fn app(&self) -> &A {
		&self.app
	}

	pub fn app_mut(&mut self) -> &mut A {
		&mut self.app
	}

	pub fn dispatcher(&self) -> &Dispatcher {
		&self.dispatcher
	}

	/// Game time accumulated across all frames.
	pub fn elapsed(&self) -> Duration {
		self.timers.now()
	}

	pub fn frames(&self) -> u64 {
		self.frames
	}

	/// Connections with queued or suspended work.
	pub fn connection_count(&self) -> usize {
		self.connections.len()
	}

	/// Runs one frame of `dt` game time.
	pub fn step(&mut self, dt: Duration) {
		self.frames += 1;
		self.drain_inbox();

		for pending in self.timers.advance(dt) {
			trace!(target: "playbridge.runtime", connection = %pending.connection, "wait completed");
			deliver(pending.connection, pending.reply, pending.response);
			if let Some(state) = self.connections.get_mut(&pending.connection) {
				state.parked = false;
			}
		}

		self.app.tick(dt);
		if self.frames % self.prune_interval == 0 {
			self.prune_registry();
		}
		self.execute_queued();
	}

	/// Drives frames at the configured rate until `shutdown` resolves, then
	/// returns the application.
	pub async fn run(mut self, shutdown: impl Future<Output = ()>) -> A {
		let mut ticker = tokio::time::interval(self.frame);
		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
		tokio::pin!(shutdown);

		info!(target: "playbridge.runtime", frame_ms = self.frame.as_secs_f64() * 1000.0, "simulation loop started");
		let mut last = Instant::now();
		loop {
			tokio::select! {
				_ = &mut shutdown => break,
				_ = ticker.tick() => {
					let now = Instant::now();
					self.step(now - last);
					last = now;
				}
			}
		}
		info!(target: "playbridge.runtime", frames = self.frames, "simulation loop stopped");
		self.app
	}

	fn prune_registry(&mut self) {
		let (tree, registry) = self.app.identities();
		let pruned = registry.prune(tree);
		if pruned > 0 {
			debug!(target: "playbridge.runtime", pruned, remaining = registry.len(), "pruned stale automation ids");
		}
	}

	fn drain_inbox(&mut self) {
		while let Ok(message) = self.inbox.try_recv() {
			match message {
				Inbound::Request { connection, request, reply } => {
					self.connections.entry(connection).or_default().queue.push_back(Queued { request, reply });
				}
				Inbound::Close(connection) => {
					if let Some(state) = self.connections.remove(&connection) {
						debug!(
							target: "playbridge.runtime",
							%connection,
							discarded = state.queue.len(),
							"connection closed"
						);
					}
				}
			}
		}
	}

	fn execute_queued(&mut self) {
		let Self {
			app,
			dispatcher,
			connections,
			timers,
			..
		} = self;

		for (id, state) in connections.iter_mut() {
			while !state.parked {
				let Some(Queued { request, reply }) = state.queue.pop_front() else {
					break;
				};
				let mut host = app.host();
				match dispatcher.handle(&request, &mut host) {
					Outcome::Complete(response) => deliver(*id, reply, response),
					Outcome::Suspend { duration, response } => {
						trace!(target: "playbridge.runtime", connection = %id, ?duration, "connection parked on wait");
						timers.register(
							duration,
							Pending {
								connection: *id,
								response,
								reply,
							},
						);
						state.parked = true;
					}
				}
			}
		}

		connections.retain(|_, state| state.parked || !state.queue.is_empty());
	}
}

fn deliver(connection: ConnectionId, reply: oneshot::Sender<Response>, response: Response) {
	if reply.send(response).is_err() {
		debug!(target: "playbridge.runtime", %connection, "response dropped; requester went away");
	}
}
