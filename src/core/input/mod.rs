//=========================================================================
// Input System
//
// Input service contract and its default implementation.
//
// Responsibilities:
// - Define the `InputService` capability consumed by the game core and UI
// - Classify activations by originating device
// - Gate actions by Player / Ui context
//
// Notes:
// Gameplay collaborators subscribe to the move/sprint/interact streams.
// The game-state coordinator only consumes the pause stream and drives
// the context switches.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod context;
pub mod event;
mod reader;

//=== Public API ==========================================================

pub use context::InputContext;
pub use event::{
    ControlDevice, DeviceConnectionChange, DeviceKind, InputAction, InputActivation, InputPhase,
    Vec2,
};
pub use reader::InputReader;

//=== Internal Imports ====================================================

use crate::core::events::EventChannel;

//=== InputService ========================================================

/// Capability exposed by whatever produces input for the game.
///
/// All methods take `&self`; implementations use interior mutability so
/// a single shared instance can be handed to every collaborator.
pub trait InputService {
    /// The device class that produced the most recent qualifying press.
    fn current_device(&self) -> ControlDevice;

    /// Fires when the current device changes.
    fn on_device_change(&self) -> &EventChannel<ControlDevice>;

    /// Fires when the player asks to pause or resume.
    fn on_pause(&self) -> &EventChannel<()>;

    fn on_move(&self) -> &EventChannel<Vec2>;
    fn on_sprint_started(&self) -> &EventChannel<()>;
    fn on_sprint_canceled(&self) -> &EventChannel<()>;
    fn on_interact(&self) -> &EventChannel<()>;

    /// Enables the Player context and disables the Ui context.
    fn enable_player_input(&self);

    /// Disables the Player context and enables the Ui context.
    fn disable_player_input(&self);

    /// Switches only the Ui context.
    fn enable_ui_input(&self, enabled: bool);

    fn is_player_input_enabled(&self) -> bool;
    fn is_ui_input_enabled(&self) -> bool;
}
