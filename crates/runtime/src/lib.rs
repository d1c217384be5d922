//! Runtime glue between transports and the application's simulation context.
//!
//! Transports talk to a [`BridgeHandle`], which is `Send + Clone` and may be
//! used from any task. Requests are queued and executed by the
//! [`SimulationLoop`] between application ticks, so the registry, locator
//! and dispatcher only ever run on the thread that owns the application.
//! `WaitForSeconds` becomes a game-time timer; the loop keeps ticking and
//! other connections keep being served while it is pending.

mod app;
mod error;
mod handle;
mod simulation;
mod timer;

pub use app::Application;
pub use error::{Result, RuntimeError};
pub use handle::{BridgeHandle, Connection, ConnectionId};
pub use simulation::SimulationLoop;
pub use timer::TimerQueue;
