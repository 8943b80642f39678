//=========================================================================
// Core Systems
//
// Everything that runs on the session (logic) thread.
//
// Responsibilities:
// - Game state coordination and its deferred tick effects
// - Input service contract and device tracking
// - Synchronous notification streams
// - Capability lookup for startup wiring
// - UI reactions to state and device changes
//
// Notes:
// Core types are single-threaded by construction (`Rc`, `Cell`). The
// only thread boundary is the platform channel, which carries plain data.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod error;
pub mod events;
pub mod game;
pub mod input;
pub mod registry;
pub mod ui;

//=== Public API ==========================================================

pub use error::ServiceError;
pub use events::{EventChannel, SubscriptionId};
pub use game::{GameState, GameStateCoordinator, SimulationClock};
pub use input::{ControlDevice, InputReader, InputService};
pub use registry::ServiceRegistry;
pub use ui::{PausePanel, UiReactor};

//=== TickControl =========================================================
//
// Control flow for the session loop.
// Each tick signals either to continue or terminate the loop.
//
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}
