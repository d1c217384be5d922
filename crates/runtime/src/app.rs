use std::time::Duration;

use playbridge::{Host, IdentityRegistry, UiTree};

/// The application driven by a [`SimulationLoop`](crate::SimulationLoop).
pub trait Application {
	/// Advances application state by one frame.
	fn tick(&mut self, _dt: Duration) {}

	/// Borrows the host collaborators for the next command.
	fn host(&mut self) -> Host<'_>;

	/// Tree and registry the loop prunes of destroyed widgets.
	fn identities(&mut self) -> (&dyn UiTree, &mut IdentityRegistry);
}
