//=========================================================================
// UI Reactor
//=========================================================================
//
// Shows the pause surface while the game is paused and tracks the active
// control device for button prompts.
//
// Lifecycle:
//   attach() → pull current state + device → subscribe to both streams
//   detach() / drop → unsubscribe from both streams
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::error::ServiceError;
use crate::core::events::SubscriptionId;
use crate::core::game::{GameState, GameStateCoordinator};
use crate::core::input::{ControlDevice, InputService};

//=== PausePanel ==========================================================

/// The host's pause menu surface.
pub trait PausePanel {
    fn set_visible(&self, visible: bool);
}

//=== UiReactor ===========================================================

struct Attachment {
    coordinator: Rc<GameStateCoordinator>,
    state_subscription: SubscriptionId,
    input: Option<(Rc<dyn InputService>, SubscriptionId)>,
}

/// Reacts to game-state and control-device notifications.
pub struct UiReactor {
    panel: Option<Rc<dyn PausePanel>>,
    pause_open: Cell<bool>,
    device: Cell<ControlDevice>,
    attachment: RefCell<Option<Attachment>>,
}

impl UiReactor {
    /// Creates a detached reactor. A missing panel is tolerated: state
    /// changes are then logged and skipped.
    pub fn new(panel: Option<Rc<dyn PausePanel>>) -> Self {
        Self {
            panel,
            pause_open: Cell::new(false),
            device: Cell::new(ControlDevice::Unknown),
            attachment: RefCell::new(None),
        }
    }

    //--- Attachment -------------------------------------------------------

    /// Pulls the current state and device, then subscribes to their streams.
    ///
    /// Without an input service the reactor still follows game state.
    pub fn attach(
        self: &Rc<Self>,
        coordinator: &Rc<GameStateCoordinator>,
        input: Option<Rc<dyn InputService>>,
    ) {
        self.detach();

        self.handle_state_change(coordinator.current_state());
        match &input {
            Some(input) => self.handle_device_change(input.current_device()),
            None => warn!("{}; device prompts disabled", ServiceError::not_found::<dyn InputService>()),
        }

        let reactor: Weak<Self> = Rc::downgrade(self);
        let state_subscription = coordinator.on_state_change().subscribe(move |state| {
            if let Some(reactor) = reactor.upgrade() {
                reactor.handle_state_change(*state);
            }
        });

        let input = input.map(|input| {
            let reactor: Weak<Self> = Rc::downgrade(self);
            let id = input.on_device_change().subscribe(move |device| {
                if let Some(reactor) = reactor.upgrade() {
                    reactor.handle_device_change(*device);
                }
            });
            (input, id)
        });

        *self.attachment.borrow_mut() = Some(Attachment {
            coordinator: Rc::clone(coordinator),
            state_subscription,
            input,
        });
        debug!("UI reactor attached");
    }

    /// Unsubscribes from both streams. Safe to call when not attached.
    pub fn detach(&self) {
        let Some(attachment) = self.attachment.borrow_mut().take() else {
            return;
        };

        attachment
            .coordinator
            .on_state_change()
            .unsubscribe(attachment.state_subscription);
        if let Some((input, id)) = attachment.input {
            input.on_device_change().unsubscribe(id);
        }
        debug!("UI reactor detached");
    }

    pub fn is_attached(&self) -> bool {
        self.attachment.borrow().is_some()
    }

    //--- Queries ----------------------------------------------------------

    /// Whether the pause panel is currently shown.
    pub fn is_pause_open(&self) -> bool {
        self.pause_open.get()
    }

    /// The device prompts are currently drawn for.
    pub fn current_device(&self) -> ControlDevice {
        self.device.get()
    }

    //--- Handlers ---------------------------------------------------------

    fn handle_state_change(&self, state: GameState) {
        let Some(panel) = &self.panel else {
            warn!("{}; pause menu not updated", ServiceError::missing("pause panel"));
            return;
        };

        let open = state == GameState::OnPause;
        panel.set_visible(open);
        if self.pause_open.replace(open) != open {
            info!("Pause menu {}", if open { "opened" } else { "closed" });
        }
    }

    fn handle_device_change(&self, device: ControlDevice) {
        self.device.set(device);
        debug!("UI prompts set for {:?}", device);
    }
}

impl Drop for UiReactor {
    fn drop(&mut self) {
        self.detach();
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::game::{LoggedSceneLoader, SimulationClock};
    use crate::core::input::{DeviceKind, InputAction, InputActivation, InputReader};

    #[derive(Default)]
    struct RecordingPanel {
        calls: RefCell<Vec<bool>>,
    }

    impl PausePanel for RecordingPanel {
        fn set_visible(&self, visible: bool) {
            self.calls.borrow_mut().push(visible);
        }
    }

    fn setup() -> (Rc<GameStateCoordinator>, Rc<InputReader>, Rc<RecordingPanel>, Rc<UiReactor>) {
        let coordinator = Rc::new(GameStateCoordinator::new(
            Rc::new(SimulationClock::new()),
            Rc::new(LoggedSceneLoader::new("Camp")),
        ));
        let reader = Rc::new(InputReader::new());
        reader.start(0);
        coordinator.attach_input(Rc::clone(&reader) as Rc<dyn InputService>);

        let panel = Rc::new(RecordingPanel::default());
        let reactor = Rc::new(UiReactor::new(Some(Rc::clone(&panel) as Rc<dyn PausePanel>)));
        reactor.attach(&coordinator, Some(Rc::clone(&reader) as Rc<dyn InputService>));
        (coordinator, reader, panel, reactor)
    }

    #[test]
    fn attach_pulls_current_state_and_device() {
        let (_coordinator, _reader, panel, reactor) = setup();
        assert_eq!(*panel.calls.borrow(), vec![false]);
        assert_eq!(reactor.current_device(), ControlDevice::KeyboardMouse);
        assert!(reactor.is_attached());
    }

    #[test]
    fn pause_shows_panel_and_resume_hides_it() {
        let (coordinator, _reader, panel, reactor) = setup();

        coordinator.toggle_pause();
        assert!(reactor.is_pause_open());

        coordinator.toggle_pause();
        assert!(!reactor.is_pause_open());
        assert_eq!(*panel.calls.borrow(), vec![false, true, false]);
    }

    #[test]
    fn game_over_hides_panel() {
        let (coordinator, _reader, _panel, reactor) = setup();
        coordinator.set_state(GameState::OnPause);
        coordinator.set_state(GameState::GameOver);
        assert!(!reactor.is_pause_open());
    }

    #[test]
    fn device_changes_reach_the_reactor() {
        let (_coordinator, reader, _panel, reactor) = setup();
        reader.process(&InputActivation::pressed(InputAction::Interact, DeviceKind::Gamepad));
        assert_eq!(reactor.current_device(), ControlDevice::Gamepad);
    }

    #[test]
    fn dropping_reactor_unsubscribes() {
        let (coordinator, reader, _panel, reactor) = setup();
        let state_subs = coordinator.on_state_change().subscriber_count();
        let device_subs = reader.on_device_change().subscriber_count();

        drop(reactor);

        assert_eq!(coordinator.on_state_change().subscriber_count(), state_subs - 1);
        assert_eq!(reader.on_device_change().subscriber_count(), device_subs - 1);
        coordinator.toggle_pause();
    }

    #[test]
    fn missing_panel_is_tolerated() {
        let coordinator = Rc::new(GameStateCoordinator::new(
            Rc::new(SimulationClock::new()),
            Rc::new(LoggedSceneLoader::new("Camp")),
        ));
        let reactor = Rc::new(UiReactor::new(None));
        reactor.attach(&coordinator, None);

        coordinator.toggle_pause();
        assert!(!reactor.is_pause_open());
        assert_eq!(reactor.current_device(), ControlDevice::Unknown);
    }
}
