//=========================================================================
// Game State
//=========================================================================
//
// Authoritative run/pause/end mode and the collaborators it drives.
//
// Architecture:
//   GameStateCoordinator
//     ├─ state: GameState                 (single source of truth)
//     ├─ state_changed: EventChannel      (synchronous notification)
//     ├─ pending: DeferredQueue<GameState> (effects for next tick)
//     ├─ clock: SimulationClock           (time scale)
//     └─ input: Option<dyn InputService>  (context switching)
//
// Flow:
//   set_state() → commit → enqueue effect → notify
//   tick()      → apply queued effects (time scale, input contexts)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;

use log::info;

//=== Module Declarations =================================================

mod clock;
mod coordinator;
mod deferred;

//=== Public API ==========================================================

pub use clock::SimulationClock;
pub use coordinator::GameStateCoordinator;
pub use deferred::DeferredQueue;

//=== GameState ===========================================================

/// The coordinator's run/pause/end mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    #[default]
    InGame,
    OnPause,
    GameOver,
}

//=== Collaborator Traits =================================================

/// Reloads the active scene context. Invoked by `reset_game`.
pub trait SceneLoader {
    fn reload_current(&self);
}

/// The player/world actor that `reset_game` puts back to idle.
pub trait Actor {
    fn set_idle(&self);
}

/// Score keeping reset alongside the actor.
pub trait ScoreService {
    fn reset_score(&self);
}

//=== LoggedSceneLoader ===================================================

/// Scene loader for hosts without scene assets: logs and counts reloads.
#[derive(Debug, Default)]
pub struct LoggedSceneLoader {
    scene: String,
    reloads: Cell<u32>,
}

impl LoggedSceneLoader {
    pub fn new(scene: impl Into<String>) -> Self {
        Self {
            scene: scene.into(),
            reloads: Cell::new(0),
        }
    }

    /// Number of reloads performed so far.
    pub fn reloads(&self) -> u32 {
        self.reloads.get()
    }
}

impl SceneLoader for LoggedSceneLoader {
    fn reload_current(&self) {
        self.reloads.set(self.reloads.get() + 1);
        info!("Scene '{}' reloaded", self.scene);
    }
}
