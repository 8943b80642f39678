//=========================================================================
// Game State Coordinator
//=========================================================================
//
// Owns the game state, mediates transitions and turns them into time-flow
// and input-routing effects.
//
// A transition is a two-phase commit:
//   1. commit the new state and enqueue its effect batch
//   2. notify subscribers synchronously with the committed state
// The effect batch runs at the start of the next tick. Subscribers may
// therefore observe the new state one tick before the time scale and
// input contexts follow it.
//
// Missing collaborators never fail an operation: they are logged once and
// the affected effect is skipped.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, error, info, warn};

//=== Internal Dependencies ===============================================

use super::{Actor, DeferredQueue, GameState, SceneLoader, ScoreService, SimulationClock};
use crate::core::error::ServiceError;
use crate::core::events::{EventChannel, SubscriptionId};
use crate::core::input::InputService;
use crate::core::registry::ServiceRegistry;

//=== GameStateCoordinator ================================================

/// Single source of truth for whether the simulation is running, paused
/// or over.
///
/// Built once by the composition root and shared as `Rc<GameStateCoordinator>`.
/// Every method takes `&self`; the pause handler subscribed on the input
/// service holds only a weak reference back to the coordinator.
pub struct GameStateCoordinator {
    state: Cell<GameState>,
    state_changed: EventChannel<GameState>,
    pending: RefCell<DeferredQueue<GameState>>,

    clock: Rc<SimulationClock>,
    scenes: Rc<dyn SceneLoader>,

    input: RefCell<Option<Rc<dyn InputService>>>,
    pause_subscription: Cell<Option<SubscriptionId>>,
    actor: RefCell<Option<Rc<dyn Actor>>>,
    score: RefCell<Option<Rc<dyn ScoreService>>>,
}

impl GameStateCoordinator {
    //--- Construction -----------------------------------------------------

    /// Creates a coordinator in `InGame`.
    ///
    /// No effects are applied here; the input service does not exist yet.
    pub fn new(clock: Rc<SimulationClock>, scenes: Rc<dyn SceneLoader>) -> Self {
        Self {
            state: Cell::new(GameState::InGame),
            state_changed: EventChannel::new(),
            pending: RefCell::new(DeferredQueue::new()),
            clock,
            scenes,
            input: RefCell::new(None),
            pause_subscription: Cell::new(None),
            actor: RefCell::new(None),
            score: RefCell::new(None),
        }
    }

    //--- Service Acquisition ----------------------------------------------

    /// Resolves collaborators from `registry`.
    ///
    /// Without an input service the coordinator still transitions but never
    /// switches input contexts. Actor and score service are optional too.
    pub fn acquire_services(self: &Rc<Self>, registry: &ServiceRegistry) {
        match registry.get::<dyn InputService>() {
            Ok(input) => self.attach_input(input),
            Err(err) => warn!("{}; input contexts will not be switched", err),
        }

        match registry.get::<dyn Actor>() {
            Ok(actor) => self.set_actor(actor),
            Err(err) => error!("{}; reset will not idle the player", err),
        }

        match registry.get::<dyn ScoreService>() {
            Ok(score) => *self.score.borrow_mut() = Some(score),
            Err(err) => warn!("{}; reset will not clear the score", err),
        }
    }

    /// Uses `input` for context switching and subscribes the pause toggle to
    /// its pause-request stream. Replaces any previously attached service.
    ///
    /// The contexts of `input` are routed for the current state right away,
    /// so a later pause and resume returns them to the same values.
    pub fn attach_input(self: &Rc<Self>, input: Rc<dyn InputService>) {
        self.detach_input();

        let coordinator: Weak<Self> = Rc::downgrade(self);
        let id = input.on_pause().subscribe(move |_| {
            if let Some(coordinator) = coordinator.upgrade() {
                coordinator.toggle_pause();
            }
        });

        self.pause_subscription.set(Some(id));
        route_input(input.as_ref(), self.state.get());
        *self.input.borrow_mut() = Some(input);
        debug!("Input service attached to game state coordinator");
    }

    /// Unsubscribes from the current input service, if any.
    pub fn detach_input(&self) {
        let previous = self.input.borrow_mut().take();
        if let (Some(input), Some(id)) = (previous, self.pause_subscription.take()) {
            input.on_pause().unsubscribe(id);
        }
    }

    pub fn set_actor(&self, actor: Rc<dyn Actor>) {
        *self.actor.borrow_mut() = Some(actor);
    }

    pub fn has_input_service(&self) -> bool {
        self.input.borrow().is_some()
    }

    //--- State Queries ----------------------------------------------------

    pub fn current_state(&self) -> GameState {
        self.state.get()
    }

    /// Stream of committed states.
    pub fn on_state_change(&self) -> &EventChannel<GameState> {
        &self.state_changed
    }

    /// Number of effect batches waiting for the next tick.
    pub fn pending_effects(&self) -> usize {
        self.pending.borrow().len()
    }

    //--- Transitions ------------------------------------------------------

    /// Flips between `InGame` and `OnPause`. Does nothing in `GameOver`.
    pub fn toggle_pause(&self) -> bool {
        match self.state.get() {
            GameState::InGame => self.set_state(GameState::OnPause),
            GameState::OnPause => self.set_state(GameState::InGame),
            GameState::GameOver => {
                debug!("Pause toggle ignored: game is over");
                false
            }
        }
    }

    /// Commits `new`, enqueues its effects for the next tick and notifies
    /// subscribers. Returns false (and does nothing) if `new` is current.
    pub fn set_state(&self, new: GameState) -> bool {
        let old = self.state.get();
        if old == new {
            debug!("Game state already {:?}", new);
            return false;
        }

        self.state.set(new);
        self.pending.borrow_mut().push(new);
        info!("Game state {:?} -> {:?}", old, new);

        self.state_changed.emit(&new);
        true
    }

    //--- Tick Boundary ----------------------------------------------------

    /// Applies every effect batch queued before this call, oldest first.
    ///
    /// Queued batches are not superseded: two transitions in one tick
    /// apply both batches, and the later one wins.
    pub fn tick(&self) -> usize {
        if self.pending.borrow().is_empty() {
            return 0;
        }

        let due = self.pending.borrow_mut().take();
        for state in &due {
            self.apply_effects(*state);
        }
        due.len()
    }

    fn apply_effects(&self, state: GameState) {
        let scale = match state {
            GameState::InGame => 1.0,
            GameState::OnPause => 0.0,
            GameState::GameOver => {
                debug!("No effects defined for {:?}", state);
                return;
            }
        };

        self.clock.set_time_scale(scale);
        let input = self.input.borrow().clone();
        if let Some(input) = input {
            route_input(input.as_ref(), state);
        }

        debug!("Applied effects for {:?}", state);
    }

    //--- Reset ------------------------------------------------------------

    /// Idles the actor, clears the score, restores normal time flow and
    /// reloads the current scene.
    ///
    /// Bypasses `set_state`: the game state is left as is and no
    /// notification is sent.
    pub fn reset_game(&self) {
        info!("Game reset initiated");

        let actor = self.actor.borrow().clone();
        match actor {
            Some(actor) => {
                actor.set_idle();
                info!("Player state reset to idle");
            }
            None => warn!("{}; skipping actor reset", ServiceError::missing("player actor")),
        }

        let score = self.score.borrow().clone();
        if let Some(score) = score {
            score.reset_score();
            info!("Score reset");
        }

        self.clock.set_time_scale(1.0);
        self.scenes.reload_current();
    }
}

/// Player input while the game runs, UI input while paused. `GameOver`
/// leaves the contexts as they are.
fn route_input(input: &dyn InputService, state: GameState) {
    match state {
        GameState::InGame => {
            input.enable_player_input();
            input.enable_ui_input(false);
        }
        GameState::OnPause => {
            input.disable_player_input();
            input.enable_ui_input(true);
        }
        GameState::GameOver => {}
    }
}

impl Drop for GameStateCoordinator {
    fn drop(&mut self) {
        self.detach_input();
    }
}

//=========================================================================
// Tests
//=========================================================================
