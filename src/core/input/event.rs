//=========================================================================
// Input Event Types
//
// Engine-friendly representation of input activations.
//
// The platform layer (winit mapper, gamepad backends, scripted drivers)
// translates hardware input into `InputActivation`s. Each activation names
// the gameplay action, where it is in its press lifecycle, and which class
// of hardware produced it.
//
// Event Flow:
// ```text
// Platform Layer (winit / gamepad backend)
//         ↓
//    InputActivation (this module)
//         ↓
//    InputReader (context gating, device tracking)
//         ↓
//    EventChannels (move, sprint, interact, pause, device change)
// ```
//
// All types here are plain `Copy` data and `Send`, so they can cross the
// platform → session channel.
//
//=========================================================================

//=== Vec2 ================================================================

/// Two-component axis value (e.g. a movement stick or WASD vector).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the vector scaled to unit length, or zero if it has none.
    pub fn normalized(self) -> Self {
        let len = (self.x * self.x + self.y * self.y).sqrt();
        if len > f32::EPSILON {
            Self::new(self.x / len, self.y / len)
        } else {
            Self::ZERO
        }
    }
}

//=== DeviceKind ==========================================================

/// Hardware class of the control that produced an activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Keyboard,
    Mouse,
    Gamepad,

    /// Touch screens, pens, joysticks and anything else.
    Other,
}

//=== ControlDevice =======================================================

/// The classified input source currently driving the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ControlDevice {
    KeyboardMouse,
    Gamepad,
    #[default]
    Unknown,
}

impl From<DeviceKind> for ControlDevice {
    fn from(kind: DeviceKind) -> Self {
        match kind {
            DeviceKind::Gamepad => ControlDevice::Gamepad,
            DeviceKind::Keyboard | DeviceKind::Mouse => ControlDevice::KeyboardMouse,
            DeviceKind::Other => ControlDevice::Unknown,
        }
    }
}

//=== InputPhase ==========================================================

/// Lifecycle of a held control.
///
/// A button press yields `Started`; analog controls then report
/// `Performed` for every value change; release yields `Canceled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputPhase {
    Started,
    Performed,
    Canceled,
}

//=== InputAction =========================================================

/// Gameplay-level actions understood by the input reader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    /// Movement axis; the value is the current stick/key vector.
    Move(Vec2),
    Sprint,
    Interact,

    /// Pause/resume request.
    Pause,
}

//=== InputActivation =====================================================

/// One action activation as delivered by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputActivation {
    pub action: InputAction,
    pub phase: InputPhase,
    pub origin: DeviceKind,
}

impl InputActivation {
    pub fn new(action: InputAction, phase: InputPhase, origin: DeviceKind) -> Self {
        Self { action, phase, origin }
    }

    /// Shorthand for a `Started` activation (a button press).
    pub fn pressed(action: InputAction, origin: DeviceKind) -> Self {
        Self::new(action, InputPhase::Started, origin)
    }
}

//=== DeviceConnectionChange ==============================================

/// Hot-plug notifications reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceConnectionChange {
    Added,
    Removed,
    Disconnected,
    Reconnected,
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_kind_classification() {
        assert_eq!(ControlDevice::from(DeviceKind::Gamepad), ControlDevice::Gamepad);
        assert_eq!(ControlDevice::from(DeviceKind::Keyboard), ControlDevice::KeyboardMouse);
        assert_eq!(ControlDevice::from(DeviceKind::Mouse), ControlDevice::KeyboardMouse);
        assert_eq!(ControlDevice::from(DeviceKind::Other), ControlDevice::Unknown);
    }

    #[test]
    fn control_device_defaults_to_unknown() {
        assert_eq!(ControlDevice::default(), ControlDevice::Unknown);
    }

    #[test]
    fn normalized_diagonal_has_unit_length() {
        let v = Vec2::new(1.0, 1.0).normalized();
        assert!((v.x * v.x + v.y * v.y - 1.0).abs() < 1e-6);
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
    }
}
