//=========================================================================
// Campsite Demo
//
// Drives a session from a scripted "player" thread: walk, pause from the
// keyboard, try to interact while paused, then resume from a gamepad.
//
// Run with `RUST_LOG=debug` to see every routing decision.
//
//=========================================================================

use std::rc::Rc;
use std::thread;
use std::time::Duration;

use campsite::prelude::*;
use env_logger::{Builder, Env};
use log::info;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

//=== Console Collaborators ===============================================

struct ConsolePausePanel;

impl PausePanel for ConsolePausePanel {
    fn set_visible(&self, visible: bool) {
        info!("[panel] pause menu {}", if visible { "shown" } else { "hidden" });
    }
}

struct Camper;

impl Actor for Camper {
    fn set_idle(&self) {
        info!("[actor] camper is idle");
    }
}

//=== Scripted Player =====================================================

fn script(platform: PlatformHandle, tick: Duration) {
    let mut keys = KeyboardMapper::new();
    let mut press = |key: KeyCode, state: ElementState| {
        if let Some(activation) = keys.map_key(key, state) {
            platform.send_inputs(vec![activation]);
        }
        thread::sleep(tick * 3);
    };

    press(KeyCode::KeyW, ElementState::Pressed);
    press(KeyCode::KeyW, ElementState::Released);
    press(KeyCode::Escape, ElementState::Pressed);
    press(KeyCode::Escape, ElementState::Released);
    press(KeyCode::KeyE, ElementState::Pressed);
    press(KeyCode::KeyE, ElementState::Released);

    platform.device_connection("Wireless Controller", DeviceConnectionChange::Added);
    platform.send_inputs(vec![InputActivation::pressed(InputAction::Pause, DeviceKind::Gamepad)]);
    thread::sleep(tick * 3);

    platform.shutdown();
}

//=== Entry Point =========================================================

fn main() {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut session = SessionBuilder::new()
        .with_tps(30.0)
        .with_pause_panel(Rc::new(ConsolePausePanel))
        .with_actor(Rc::new(Camper))
        .build();

    let interactions = Rc::new(std::cell::Cell::new(0u32));
    let counter = Rc::clone(&interactions);
    session
        .input()
        .on_interact()
        .subscribe(move |_| counter.set(counter.get() + 1));

    let platform = session.platform_handle();
    let tick = session.frame_duration();
    let player = thread::spawn(move || script(platform, tick));

    session.run();

    if player.join().is_err() {
        log::error!("Scripted player thread panicked");
    }

    info!(
        "Finished in {:?} after {} ticks ({:.2}s simulated), {} interaction(s), device {:?}",
        session.coordinator().current_state(),
        session.clock().tick(),
        session.clock().scaled_elapsed(),
        interactions.get(),
        session.input().current_device(),
    );

    session.coordinator().reset_game();
}
