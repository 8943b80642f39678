//=========================================================================
// Keyboard & Mouse Mapper
//
// Converts winit keyboard and mouse input into `InputActivation`s.
//
// Bindings:
// - W / A / S / D and arrow keys → Move (vector from all held keys)
// - Left / right shift           → Sprint
// - E, left mouse button         → Interact
// - Escape, P                    → Pause
//
// Responsibilities:
// - Suppress OS key repeat (a held key produces one `Started`)
// - Fold directional keys into one movement vector with
//   Started / Performed / Canceled phases
// - Ignore unbound keys and buttons
//
//=========================================================================

use std::collections::HashSet;

use winit::event::{ElementState, KeyEvent, MouseButton as WinitMouseButton, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

use crate::core::input::{DeviceKind, InputAction, InputActivation, InputPhase, Vec2};

//=== Key Bindings ========================================================

fn direction(key: WinitKeyCode) -> Option<Vec2> {
    use WinitKeyCode::*;
    match key {
        KeyW | ArrowUp => Some(Vec2::new(0.0, 1.0)),
        KeyS | ArrowDown => Some(Vec2::new(0.0, -1.0)),
        KeyA | ArrowLeft => Some(Vec2::new(-1.0, 0.0)),
        KeyD | ArrowRight => Some(Vec2::new(1.0, 0.0)),
        _ => None,
    }
}

fn button_action(key: WinitKeyCode) -> Option<InputAction> {
    use WinitKeyCode::*;
    match key {
        ShiftLeft | ShiftRight => Some(InputAction::Sprint),
        KeyE => Some(InputAction::Interact),
        Escape | KeyP => Some(InputAction::Pause),
        _ => None,
    }
}

fn phase_for(state: ElementState) -> InputPhase {
    match state {
        ElementState::Pressed => InputPhase::Started,
        ElementState::Released => InputPhase::Canceled,
    }
}

//=== KeyboardMapper ======================================================

/// Stateful winit → activation mapper for one window.
#[derive(Debug, Default)]
pub struct KeyboardMapper {
    held: HashSet<WinitKeyCode>,
    movement: Vec2,
}

impl KeyboardMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current movement vector from held directional keys.
    pub fn movement(&self) -> Vec2 {
        self.movement
    }

    //--- Keyboard ---------------------------------------------------------

    /// Maps one physical key transition.
    pub fn map_key(&mut self, key: WinitKeyCode, state: ElementState) -> Option<InputActivation> {
        let changed = match state {
            ElementState::Pressed => self.held.insert(key),
            ElementState::Released => self.held.remove(&key),
        };
        if !changed {
            return None; // OS repeat or release of a key we never saw pressed
        }

        if direction(key).is_some() {
            return self.update_movement();
        }

        button_action(key)
            .map(|action| InputActivation::new(action, phase_for(state), DeviceKind::Keyboard))
    }

    //--- Mouse ------------------------------------------------------------

    /// Maps one mouse button transition.
    pub fn map_mouse_button(
        &mut self,
        button: WinitMouseButton,
        state: ElementState,
    ) -> Option<InputActivation> {
        match button {
            WinitMouseButton::Left => Some(InputActivation::new(
                InputAction::Interact,
                phase_for(state),
                DeviceKind::Mouse,
            )),
            _ => None,
        }
    }

    //--- Full Event Conversion --------------------------------------------

    /// Maps a winit window event; anything other than key or mouse button
    /// input yields `None`.
    pub fn map_window_event(&mut self, event: &WindowEvent) -> Option<InputActivation> {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => self.map_key(*code, *state),

            WindowEvent::MouseInput { state, button, .. } => self.map_mouse_button(*button, *state),

            _ => None,
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn update_movement(&mut self) -> Option<InputActivation> {
        let summed = self
            .held
            .iter()
            .filter_map(|key| direction(*key))
            .fold(Vec2::ZERO, |acc, d| Vec2::new(acc.x + d.x, acc.y + d.y));
        let next = summed.normalized();

        let previous = std::mem::replace(&mut self.movement, next);
        if previous == next {
            return None;
        }

        let phase = match (previous == Vec2::ZERO, next == Vec2::ZERO) {
            (true, _) => InputPhase::Started,
            (false, true) => InputPhase::Canceled,
            (false, false) => InputPhase::Performed,
        };
        Some(InputActivation::new(InputAction::Move(next), phase, DeviceKind::Keyboard))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use winit::event::ElementState::{Pressed, Released};

    #[test]
    fn held_key_repeat_is_suppressed() {
        let mut mapper = KeyboardMapper::new();
        let first = mapper.map_key(WinitKeyCode::Escape, Pressed);
        let repeat = mapper.map_key(WinitKeyCode::Escape, Pressed);

        assert_eq!(
            first,
            Some(InputActivation::pressed(InputAction::Pause, DeviceKind::Keyboard))
        );
        assert_eq!(repeat, None);
    }

    #[test]
    fn sprint_press_and_release() {
        let mut mapper = KeyboardMapper::new();
        let down = mapper.map_key(WinitKeyCode::ShiftLeft, Pressed).unwrap();
        let up = mapper.map_key(WinitKeyCode::ShiftLeft, Released).unwrap();

        assert_eq!(down.phase, InputPhase::Started);
        assert_eq!(up.phase, InputPhase::Canceled);
        assert_eq!(up.action, InputAction::Sprint);
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut mapper = KeyboardMapper::new();
        assert_eq!(mapper.map_key(WinitKeyCode::KeyZ, Pressed), None);
        assert_eq!(mapper.map_key(WinitKeyCode::KeyZ, Released), None);
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut mapper = KeyboardMapper::new();
        assert_eq!(mapper.map_key(WinitKeyCode::KeyE, Released), None);
    }

    #[test]
    fn movement_vector_lifecycle() {
        let mut mapper = KeyboardMapper::new();

        let start = mapper.map_key(WinitKeyCode::KeyW, Pressed).unwrap();
        assert_eq!(start.phase, InputPhase::Started);
        assert_eq!(start.action, InputAction::Move(Vec2::new(0.0, 1.0)));

        let diagonal = mapper.map_key(WinitKeyCode::KeyD, Pressed).unwrap();
        assert_eq!(diagonal.phase, InputPhase::Performed);
        let InputAction::Move(v) = diagonal.action else {
            panic!("expected move, got {:?}", diagonal.action);
        };
        assert!((v.x - v.y).abs() < 1e-6 && v.x > 0.0);

        mapper.map_key(WinitKeyCode::KeyW, Released).unwrap();
        let stop = mapper.map_key(WinitKeyCode::KeyD, Released).unwrap();
        assert_eq!(stop.phase, InputPhase::Canceled);
        assert_eq!(stop.action, InputAction::Move(Vec2::ZERO));
        assert_eq!(mapper.movement(), Vec2::ZERO);
    }

    #[test]
    fn key_and_arrow_for_same_direction_emit_once() {
        let mut mapper = KeyboardMapper::new();
        assert!(mapper.map_key(WinitKeyCode::KeyW, Pressed).is_some());
        assert_eq!(mapper.map_key(WinitKeyCode::ArrowUp, Pressed), None);
    }

    #[test]
    fn left_click_interacts_from_mouse() {
        let mut mapper = KeyboardMapper::new();
        let click = mapper.map_mouse_button(WinitMouseButton::Left, Pressed).unwrap();

        assert_eq!(click.action, InputAction::Interact);
        assert_eq!(click.origin, DeviceKind::Mouse);
        assert_eq!(mapper.map_mouse_button(WinitMouseButton::Right, Pressed), None);
    }
}
