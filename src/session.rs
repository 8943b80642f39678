//=========================================================================
// Session
//
// Composition root and tick loop for one play session.
//
// Architecture:
// ```text
//     SessionBuilder  ──build()──>  Session  ──run()──>  [Tick Loop]
//         │                           │
//         ├─ with_tps()               ├─ registry: InputService, Actor, Score
//         ├─ with_channel_capacity()  ├─ coordinator ← acquire_services()
//         └─ with_pause_panel() ...   └─ ui reactor  ← attach()
// ```
//
// Tick order:
//   1. apply deferred effects queued during the previous tick
//   2. feed platform events to the input reader (may change state)
//   3. advance the simulation clock by one fixed step
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use log::{debug, info};

//=== Internal Dependencies ===============================================

use crate::core::game::{
    Actor, GameStateCoordinator, LoggedSceneLoader, SceneLoader, ScoreService, SimulationClock,
};
use crate::core::input::{InputReader, InputService};
use crate::core::registry::ServiceRegistry;
use crate::core::ui::{PausePanel, UiReactor};
use crate::core::TickControl;
use crate::platform::{PlatformEvent, PlatformHandle};

//=== SessionBuilder ======================================================

/// Builder for configuring and wiring a [`Session`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (ticks per second)
/// - **Channel capacity**: 128 events
/// - **Connected gamepads**: 0 (keyboard and mouse assumed)
/// - **Scene loader**: [`LoggedSceneLoader`] for scene `"Main"`
///
/// # Examples
///
/// ```no_run
/// use campsite::SessionBuilder;
///
/// let mut session = SessionBuilder::new()
///     .with_tps(120.0)
///     .with_connected_gamepads(1)
///     .build();
///
/// let platform = session.platform_handle();
/// std::thread::spawn(move || {
///     // feed input from a window or gamepad backend...
///     platform.shutdown();
/// });
///
/// session.run();
/// ```
pub struct SessionBuilder {
    tps: f64,
    channel_capacity: usize,
    connected_gamepads: usize,
    pause_panel: Option<Rc<dyn PausePanel>>,
    actor: Option<Rc<dyn Actor>>,
    score: Option<Rc<dyn ScoreService>>,
    scenes: Option<Rc<dyn SceneLoader>>,
}

impl SessionBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            connected_gamepads: 0,
            pause_panel: None,
            actor: None,
            score: None,
            scenes: None,
        }
    }

    /// Sets the target ticks per second.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the capacity of the platform → session channel.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Number of gamepads plugged in at startup; picks the initial device.
    pub fn with_connected_gamepads(mut self, count: usize) -> Self {
        self.connected_gamepads = count;
        self
    }

    pub fn with_pause_panel(mut self, panel: Rc<dyn PausePanel>) -> Self {
        self.pause_panel = Some(panel);
        self
    }

    pub fn with_actor(mut self, actor: Rc<dyn Actor>) -> Self {
        self.actor = Some(actor);
        self
    }

    pub fn with_score_service(mut self, score: Rc<dyn ScoreService>) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_scene_loader(mut self, scenes: Rc<dyn SceneLoader>) -> Self {
        self.scenes = Some(scenes);
        self
    }

    /// Wires every collaborator and returns a session ready to tick.
    pub fn build(self) -> Session {
        info!(
            "Building session (TPS: {}, channel: {})",
            self.tps, self.channel_capacity
        );

        let clock = Rc::new(SimulationClock::new());
        let scenes = self
            .scenes
            .unwrap_or_else(|| Rc::new(LoggedSceneLoader::new("Main")) as Rc<dyn SceneLoader>);

        //--- Input service ------------------------------------------------
        let input = Rc::new(InputReader::new());
        input.start(self.connected_gamepads);

        //--- Registry -----------------------------------------------------
        let mut registry = ServiceRegistry::new();
        registry.register::<dyn InputService>(Rc::clone(&input) as Rc<dyn InputService>);
        if let Some(actor) = self.actor {
            registry.register::<dyn Actor>(actor);
        }
        if let Some(score) = self.score {
            registry.register::<dyn ScoreService>(score);
        }
        debug!("{} services registered", registry.len());

        //--- Coordinator --------------------------------------------------
        let coordinator = Rc::new(GameStateCoordinator::new(Rc::clone(&clock), scenes));
        coordinator.acquire_services(&registry);

        //--- UI -----------------------------------------------------------
        let ui = Rc::new(UiReactor::new(self.pause_panel));
        ui.attach(&coordinator, Some(Rc::clone(&input) as Rc<dyn InputService>));

        let (sender, receiver) = bounded(self.channel_capacity);

        Session {
            clock,
            input,
            registry,
            coordinator,
            ui,
            sender: Some(sender),
            receiver,
            frame_duration: Duration::from_secs_f64(1.0 / self.tps),
        }
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Session =============================================================

/// A wired play session.
///
/// Owns the single-threaded core (coordinator, input reader, UI reactor)
/// and the receiving end of the platform channel. Producers on other
/// threads talk to it through [`PlatformHandle`]s.
pub struct Session {
    clock: Rc<SimulationClock>,
    input: Rc<InputReader>,
    registry: ServiceRegistry,
    coordinator: Rc<GameStateCoordinator>,
    ui: Rc<UiReactor>,
    sender: Option<Sender<PlatformEvent>>,
    receiver: Receiver<PlatformEvent>,
    frame_duration: Duration,
}

impl Session {
    //--- Accessors --------------------------------------------------------

    /// Returns a handle for sending platform events to this session.
    ///
    /// # Panics
    ///
    /// Panics if called after [`Session::run`] has started, since the
    /// session releases its own sender so the loop can end on disconnect.
    pub fn platform_handle(&self) -> PlatformHandle {
        let sender = self
            .sender
            .as_ref()
            .expect("platform_handle called after run()");
        PlatformHandle::new(sender.clone())
    }

    pub fn coordinator(&self) -> &Rc<GameStateCoordinator> {
        &self.coordinator
    }

    pub fn input(&self) -> &Rc<InputReader> {
        &self.input
    }

    pub fn ui(&self) -> &Rc<UiReactor> {
        &self.ui
    }

    pub fn clock(&self) -> &Rc<SimulationClock> {
        &self.clock
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    //--- Tick -------------------------------------------------------------

    /// Runs one tick over `events`.
    ///
    /// Returns `Exit` if a `Shutdown` was among the events; events after it
    /// are discarded.
    pub fn step<I>(&self, events: I) -> TickControl
    where
        I: IntoIterator<Item = PlatformEvent>,
    {
        //--- Step 1: Deferred effects from the previous tick ------------
        let applied = self.coordinator.tick();
        if applied > 0 {
            debug!("Applied {} deferred effect batch(es)", applied);
        }

        //--- Step 2: Platform events ------------------------------------
        let mut control = TickControl::Continue;
        for event in events {
            match event {
                PlatformEvent::Inputs(batch) => {
                    for activation in &batch {
                        self.input.process(activation);
                    }
                }
                PlatformEvent::DeviceConnection { name, change } => {
                    self.input.on_device_connection(&name, change);
                }
                PlatformEvent::Shutdown => {
                    control = TickControl::Exit;
                    break;
                }
            }
        }

        //--- Step 3: Advance simulation time ----------------------------
        self.clock.advance(self.frame_duration);
        control
    }

    //--- Execution --------------------------------------------------------

    /// Runs the tick loop at the configured TPS until a `Shutdown` event
    /// arrives or every [`PlatformHandle`] has been dropped.
    ///
    /// Handles must be taken with [`Session::platform_handle`] before calling
    /// this.
    pub fn run(&mut self) {
        info!("Session loop starting ({:?} per tick)", self.frame_duration);

        // Without our own sender the channel disconnects once all handles drop.
        self.sender = None;

        let mut events = Vec::with_capacity(8);
        loop {
            let frame_start = Instant::now();

            let collected = self.collect_platform_events(&mut events);
            let stepped = self.step(events.drain(..));

            if collected == TickControl::Exit || stepped == TickControl::Exit {
                info!("Session loop exiting after tick {}", self.clock.tick());
                break;
            }

            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_duration {
                thread::sleep(self.frame_duration - elapsed);
            }
        }
    }

    //--- collect_platform_events() ---------------------------------------
    //
    // Gathers everything sent during this frame. Waits up to one frame for
    // the first event, then drains whatever else is queued.
    //
    fn collect_platform_events(&self, events: &mut Vec<PlatformEvent>) -> TickControl {
        events.clear();

        match self.receiver.recv_timeout(self.frame_duration) {
            Ok(event) => events.push(event),
            Err(RecvTimeoutError::Disconnected) => return TickControl::Exit,
            Err(RecvTimeoutError::Timeout) => return TickControl::Continue,
        }

        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }

        TickControl::Continue
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
