//=========================================================================
// Campsite — Library Root
//
// Game-session core: who owns the game state, how input reaches it, and
// when the consequences of a state change take effect.
//
// Responsibilities:
// - Expose the session facade (`Session`, `SessionBuilder`)
// - Expose core systems (state coordinator, input service, UI reactor)
//   for hosts that wire their own composition root
// - Provide the platform bridge used by producer threads
//
// Typical usage:
// ```no_run
// use campsite::SessionBuilder;
//
// fn main() {
//     let mut session = SessionBuilder::new().build();
//     let platform = session.platform_handle();
//     // hand `platform` to a window / gamepad thread
//     session.run();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the single-threaded session systems (game state, input,
// notifications, UI reactions).
//
// `platform` contains the cross-thread bridge and the winit keyboard and
// mouse mapper.
//
pub mod core;
pub mod platform;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `session` defines the composition root and tick loop.
//
mod session;

//--- Public Exports ------------------------------------------------------

pub use session::{Session, SessionBuilder};
