//=========================================================================
// Platform Bridge
//
// Carries input from producer threads to the session loop.
//
// Architecture:
// ```text
//  Producer Thread(s):                 Session Thread:
//  ┌──────────────────────────┐       ┌──────────────────────┐
//  │  winit / gamepad backend │       │  Session::run()      │
//  │   ↓                      │       │   ├─ deferred effects │
//  │  KeyboardMapper          │       │   ├─ InputReader      │
//  │   ↓                      │       │   └─ clock.advance()  │
//  │  PlatformHandle ─────────┼──────►│                      │
//  └──────────────────────────┘       └──────────────────────┘
//        crossbeam bounded channel (PlatformEvent)
// ```
//
// Only `Send` data crosses the channel. Everything on the session side is
// single-threaded (`Rc`/`Cell`).
//
// Graceful disconnect: if the session has gone away, the handle logs a
// warning and drops the event instead of failing the producer.
//
//=========================================================================

//=== Submodules ==========================================================

mod keyboard_mapper;

//=== External Crates =====================================================

use crossbeam_channel::Sender;
use log::warn;

//=== Internal Imports ====================================================

use crate::core::input::{DeviceConnectionChange, InputActivation};

//=== Public API ==========================================================

pub use keyboard_mapper::KeyboardMapper;

//=== PlatformEvent =======================================================

/// Messages sent from producers to the session loop.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// Activations gathered since the last send, in arrival order.
    Inputs(Vec<InputActivation>),

    /// A device was plugged in or removed.
    DeviceConnection {
        name: String,
        change: DeviceConnectionChange,
    },

    /// Stop the session loop after the current tick.
    Shutdown,
}

//=== PlatformHandle ======================================================

/// Cloneable sending side of the session channel.
#[derive(Debug, Clone)]
pub struct PlatformHandle {
    sender: Sender<PlatformEvent>,
}

impl PlatformHandle {
    pub(crate) fn new(sender: Sender<PlatformEvent>) -> Self {
        Self { sender }
    }

    /// Sends one event. Blocks while the channel is full.
    ///
    /// Returns false if the session is gone.
    pub fn send(&self, event: PlatformEvent) -> bool {
        match self.sender.send(event) {
            Ok(()) => true,
            Err(err) => {
                warn!("Session disconnected, dropping {:?}", err.into_inner());
                false
            }
        }
    }

    /// Sends a batch of activations. Empty batches are not sent.
    pub fn send_inputs(&self, batch: Vec<InputActivation>) -> bool {
        if batch.is_empty() {
            return true;
        }
        self.send(PlatformEvent::Inputs(batch))
    }

    /// Reports a hot-plug change.
    pub fn device_connection(&self, name: impl Into<String>, change: DeviceConnectionChange) -> bool {
        self.send(PlatformEvent::DeviceConnection {
            name: name.into(),
            change,
        })
    }

    /// Asks the session loop to stop.
    pub fn shutdown(&self) -> bool {
        self.send(PlatformEvent::Shutdown)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
