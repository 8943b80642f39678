//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use campsite::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Session
pub use crate::session::{Session, SessionBuilder};

// Game state
pub use crate::core::game::{
    Actor, GameState, GameStateCoordinator, SceneLoader, ScoreService, SimulationClock,
};

// Input system
pub use crate::core::input::{
    ControlDevice, DeviceConnectionChange, DeviceKind, InputAction, InputActivation, InputPhase,
    InputService, Vec2,
};

// Notifications and wiring
pub use crate::core::events::{EventChannel, SubscriptionId};
pub use crate::core::registry::ServiceRegistry;
pub use crate::core::ui::{PausePanel, UiReactor};

// Platform bridge
pub use crate::platform::{KeyboardMapper, PlatformEvent, PlatformHandle};
