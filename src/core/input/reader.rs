//=========================================================================
// Input Reader
//
// Default `InputService` implementation.
//
// Responsibilities:
// - Gate activations by the Player / Ui context switches
// - Track which control device is driving the game
// - Fan activations out to the per-action notification streams
//
// Device tracking only looks at `Started` activations: a press is what
// tells us the player picked up a different device, while the trailing
// `Performed`/`Canceled` of an already-held control does not.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::fmt;

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::context::InputContext;
use super::event::{
    ControlDevice, DeviceConnectionChange, DeviceKind, InputAction, InputActivation, InputPhase,
    Vec2,
};
use super::InputService;
use crate::core::events::EventChannel;

//=== InputReader =========================================================

/// Routes input activations to notification streams.
///
/// Both contexts start enabled. The game-state coordinator switches them
/// as part of its deferred state effects.
pub struct InputReader {
    device: Cell<ControlDevice>,
    player_enabled: Cell<bool>,
    ui_enabled: Cell<bool>,

    device_changed: EventChannel<ControlDevice>,
    pause: EventChannel<()>,
    movement: EventChannel<Vec2>,
    sprint_started: EventChannel<()>,
    sprint_canceled: EventChannel<()>,
    interact: EventChannel<()>,
}

impl InputReader {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            device: Cell::new(ControlDevice::Unknown),
            player_enabled: Cell::new(true),
            ui_enabled: Cell::new(true),
            device_changed: EventChannel::new(),
            pause: EventChannel::new(),
            movement: EventChannel::new(),
            sprint_started: EventChannel::new(),
            sprint_canceled: EventChannel::new(),
            interact: EventChannel::new(),
        }
    }

    /// Picks the initial device from what is plugged in.
    ///
    /// Any connected gamepad wins; otherwise keyboard and mouse are assumed.
    /// No device-change notification is sent for this initial guess.
    pub fn start(&self, connected_gamepads: usize) {
        let initial = if connected_gamepads > 0 {
            ControlDevice::Gamepad
        } else {
            ControlDevice::KeyboardMouse
        };
        self.device.set(initial);
        info!("Initial control device: {:?}", initial);
    }

    //--- Activation Processing --------------------------------------------

    /// Handles one activation. Returns false if it was filtered out because
    /// every context it is bound in is disabled.
    pub fn process(&self, activation: &InputActivation) -> bool {
        if !self.accepts(&activation.action) {
            debug!("Dropped {:?}: no enabled context", activation.action);
            return false;
        }

        let started = activation.phase == InputPhase::Started;

        match activation.action {
            InputAction::Move(value) => {
                if started {
                    self.check_device(activation.origin);
                }
                self.movement.emit(&value);
            }

            InputAction::Sprint => match activation.phase {
                InputPhase::Started => {
                    self.check_device(activation.origin);
                    self.sprint_started.emit(&());
                }
                InputPhase::Canceled => {
                    self.sprint_canceled.emit(&());
                }
                InputPhase::Performed => {}
            },

            InputAction::Interact => {
                if started {
                    self.interact.emit(&());
                    self.check_device(activation.origin);
                }
            }

            InputAction::Pause => {
                if started {
                    self.check_device(activation.origin);
                    info!("Pause input received from {:?}", activation.origin);
                    self.pause.emit(&());
                }
            }
        }

        true
    }

    /// Logs hot-plug events. The next press decides the active device.
    pub fn on_device_connection(&self, name: &str, change: DeviceConnectionChange) {
        match change {
            DeviceConnectionChange::Added | DeviceConnectionChange::Disconnected => {
                info!(
                    "Device {} was {:?}; next input will determine the control device",
                    name, change
                );
            }
            _ => debug!("Device {} was {:?}", name, change),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn accepts(&self, action: &InputAction) -> bool {
        action.contexts().iter().any(|context| self.is_enabled(*context))
    }

    fn is_enabled(&self, context: InputContext) -> bool {
        match context {
            InputContext::Player => self.player_enabled.get(),
            InputContext::Ui => self.ui_enabled.get(),
        }
    }

    fn check_device(&self, origin: DeviceKind) {
        let detected = ControlDevice::from(origin);
        if self.device.get() != detected {
            self.device.set(detected);
            info!("Control device switched to {:?}", detected);
            self.device_changed.emit(&detected);
        }
    }
}

impl Default for InputReader {
    fn default() -> Self {
        Self::new()
    }
}

//=== InputService Contract ===============================================

impl InputService for InputReader {
    fn current_device(&self) -> ControlDevice {
        self.device.get()
    }

    fn on_device_change(&self) -> &EventChannel<ControlDevice> {
        &self.device_changed
    }

    fn on_pause(&self) -> &EventChannel<()> {
        &self.pause
    }

    fn on_move(&self) -> &EventChannel<Vec2> {
        &self.movement
    }

    fn on_sprint_started(&self) -> &EventChannel<()> {
        &self.sprint_started
    }

    fn on_sprint_canceled(&self) -> &EventChannel<()> {
        &self.sprint_canceled
    }

    fn on_interact(&self) -> &EventChannel<()> {
        &self.interact
    }

    fn enable_player_input(&self) {
        self.ui_enabled.set(false);
        self.player_enabled.set(true);
        info!("Player input enabled, UI input disabled");
    }

    fn disable_player_input(&self) {
        self.player_enabled.set(false);
        self.ui_enabled.set(true);
        info!("Player input disabled, UI input enabled");
    }

    fn enable_ui_input(&self, enabled: bool) {
        self.ui_enabled.set(enabled);
        info!("UI input set to {}", enabled);
    }

    fn is_player_input_enabled(&self) -> bool {
        self.player_enabled.get()
    }

    fn is_ui_input_enabled(&self) -> bool {
        self.ui_enabled.get()
    }
}

//=== Debug Trait =========================================================

impl fmt::Debug for InputReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputReader")
            .field("device", &self.device.get())
            .field("player_enabled", &self.player_enabled.get())
            .field("ui_enabled", &self.ui_enabled.get())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    //--- Test Helpers -----------------------------------------------------

    fn press(action: InputAction, origin: DeviceKind) -> InputActivation {
        InputActivation::pressed(action, origin)
    }

    fn release(action: InputAction, origin: DeviceKind) -> InputActivation {
        InputActivation::new(action, InputPhase::Canceled, origin)
    }

    fn record_devices(reader: &InputReader) -> Rc<RefCell<Vec<ControlDevice>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        reader
            .on_device_change()
            .subscribe(move |d| sink.borrow_mut().push(*d));
        seen
    }

    fn count(channel: &EventChannel<()>) -> Rc<Cell<u32>> {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        channel.subscribe(move |_| h.set(h.get() + 1));
        hits
    }

    //--- Device Tracking --------------------------------------------------

    #[test]
    fn start_prefers_connected_gamepad() {
        let reader = InputReader::new();
        assert_eq!(reader.current_device(), ControlDevice::Unknown);

        reader.start(1);
        assert_eq!(reader.current_device(), ControlDevice::Gamepad);

        reader.start(0);
        assert_eq!(reader.current_device(), ControlDevice::KeyboardMouse);
    }

    #[test]
    fn gamepad_press_switches_device_once() {
        let reader = InputReader::new();
        reader.start(0);
        let seen = record_devices(&reader);

        reader.process(&press(InputAction::Interact, DeviceKind::Gamepad));
        reader.process(&press(InputAction::Interact, DeviceKind::Gamepad));

        assert_eq!(*seen.borrow(), vec![ControlDevice::Gamepad]);
        assert_eq!(reader.current_device(), ControlDevice::Gamepad);
    }

    #[test]
    fn keyboard_and_mouse_share_a_device() {
        let reader = InputReader::new();
        reader.start(0);
        let seen = record_devices(&reader);

        reader.process(&press(InputAction::Sprint, DeviceKind::Keyboard));
        reader.process(&press(InputAction::Interact, DeviceKind::Mouse));

        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn unknown_hardware_reports_unknown() {
        let reader = InputReader::new();
        reader.start(0);
        let seen = record_devices(&reader);

        reader.process(&press(InputAction::Interact, DeviceKind::Other));
        assert_eq!(*seen.borrow(), vec![ControlDevice::Unknown]);
    }

    #[test]
    fn only_started_phase_updates_device() {
        let reader = InputReader::new();
        reader.start(0);
        let seen = record_devices(&reader);

        let stick = InputAction::Move(Vec2::new(0.0, 1.0));
        reader.process(&InputActivation::new(stick, InputPhase::Performed, DeviceKind::Gamepad));
        reader.process(&release(InputAction::Sprint, DeviceKind::Gamepad));

        assert!(seen.borrow().is_empty());
        assert_eq!(reader.current_device(), ControlDevice::KeyboardMouse);
    }

    //--- Action Routing ---------------------------------------------------

    #[test]
    fn move_emits_on_every_phase() {
        let reader = InputReader::new();
        let values = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&values);
        reader.on_move().subscribe(move |v| sink.borrow_mut().push(*v));

        let up = Vec2::new(0.0, 1.0);
        for phase in [InputPhase::Started, InputPhase::Performed, InputPhase::Canceled] {
            reader.process(&InputActivation::new(InputAction::Move(up), phase, DeviceKind::Keyboard));
        }
        reader.process(&InputActivation::new(
            InputAction::Move(Vec2::ZERO),
            InputPhase::Canceled,
            DeviceKind::Keyboard,
        ));

        assert_eq!(*values.borrow(), vec![up, up, up, Vec2::ZERO]);
    }

    #[test]
    fn sprint_reports_start_and_cancel() {
        let reader = InputReader::new();
        let started = count(reader.on_sprint_started());
        let canceled = count(reader.on_sprint_canceled());

        reader.process(&press(InputAction::Sprint, DeviceKind::Keyboard));
        reader.process(&InputActivation::new(InputAction::Sprint, InputPhase::Performed, DeviceKind::Keyboard));
        reader.process(&release(InputAction::Sprint, DeviceKind::Keyboard));

        assert_eq!(started.get(), 1);
        assert_eq!(canceled.get(), 1);
    }

    #[test]
    fn interact_and_pause_fire_on_press_only() {
        let reader = InputReader::new();
        let interacts = count(reader.on_interact());
        let pauses = count(reader.on_pause());

        reader.process(&press(InputAction::Interact, DeviceKind::Keyboard));
        reader.process(&release(InputAction::Interact, DeviceKind::Keyboard));
        reader.process(&press(InputAction::Pause, DeviceKind::Keyboard));
        reader.process(&release(InputAction::Pause, DeviceKind::Keyboard));

        assert_eq!(interacts.get(), 1);
        assert_eq!(pauses.get(), 1);
    }

    #[test]
    fn pause_reports_device_before_pause_signal() {
        let reader = Rc::new(InputReader::new());
        reader.start(0);
        let device_at_pause = Rc::new(Cell::new(ControlDevice::Unknown));

        let r = Rc::clone(&reader);
        let slot = Rc::clone(&device_at_pause);
        reader.on_pause().subscribe(move |_| slot.set(r.current_device()));

        reader.process(&press(InputAction::Pause, DeviceKind::Gamepad));
        assert_eq!(device_at_pause.get(), ControlDevice::Gamepad);
    }

    //--- Context Gating ---------------------------------------------------

    #[test]
    fn disabling_player_input_blocks_gameplay_but_not_pause() {
        let reader = InputReader::new();
        let interacts = count(reader.on_interact());
        let pauses = count(reader.on_pause());

        reader.disable_player_input();
        assert!(!reader.is_player_input_enabled());
        assert!(reader.is_ui_input_enabled());

        assert!(!reader.process(&press(InputAction::Interact, DeviceKind::Keyboard)));
        assert!(reader.process(&press(InputAction::Pause, DeviceKind::Keyboard)));

        assert_eq!(interacts.get(), 0);
        assert_eq!(pauses.get(), 1);
    }

    #[test]
    fn enable_player_input_switches_ui_off() {
        let reader = InputReader::new();
        reader.disable_player_input();
        reader.enable_player_input();

        assert!(reader.is_player_input_enabled());
        assert!(!reader.is_ui_input_enabled());
    }

    #[test]
    fn all_contexts_disabled_drops_everything() {
        let reader = InputReader::new();
        let pauses = count(reader.on_pause());

        reader.enable_player_input();
        reader.enable_ui_input(false);
        reader.disable_player_input();
        reader.enable_ui_input(false);

        assert!(!reader.process(&press(InputAction::Pause, DeviceKind::Keyboard)));
        assert_eq!(pauses.get(), 0);
    }
}
