//=========================================================================
// Input Contexts
//=========================================================================
//
// Action routing by context.
//
// The reader keeps one enable switch per context. An activation is only
// delivered if at least one of its action's contexts is enabled.
//
//   Player: Move, Sprint, Interact, Pause
//   Ui:     Pause
//
// Pause lives in both so the game can be paused from gameplay and resumed
// from the pause menu while player input is switched off.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::event::InputAction;

//=== InputContext ========================================================

/// Identifies a group of actions that is switched on and off as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputContext {
    /// Gameplay controls.
    Player,

    /// Menu controls.
    Ui,
}

impl InputAction {
    /// Contexts in which this action is bound.
    pub fn contexts(&self) -> &'static [InputContext] {
        match self {
            InputAction::Move(_) | InputAction::Sprint | InputAction::Interact => {
                &[InputContext::Player]
            }
            InputAction::Pause => &[InputContext::Player, InputContext::Ui],
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::Vec2;

    #[test]
    fn gameplay_actions_are_player_only() {
        for action in [InputAction::Move(Vec2::ZERO), InputAction::Sprint, InputAction::Interact] {
            assert_eq!(action.contexts(), &[InputContext::Player]);
        }
    }

    #[test]
    fn pause_is_bound_in_both_contexts() {
        let contexts = InputAction::Pause.contexts();
        assert!(contexts.contains(&InputContext::Player));
        assert!(contexts.contains(&InputContext::Ui));
    }
}
