//! Evergreen Runtime - Frame loop infrastructure
//!
//! Provides the per-frame building blocks shared by every animator:
//! - `SceneMode` / `ModeSwitch`: the single discrete scene state and its per-frame latch
//! - `FrameContext`: the immutable view of one frame handed to every system
//! - `SceneClock`: wall-clock or deterministic frame timing
//! - `SceneEvent` / `EventBus`: typed event queue drained by the host
//! - `SceneSystem`: trait for systems ticked once per frame

mod clock;
mod event;
mod event_bus;
mod frame;
mod mode;
mod system;

pub use clock::SceneClock;
pub use event::SceneEvent;
pub use event_bus::{EventBus, DEFAULT_EVENT_CAPACITY};
pub use frame::FrameContext;
pub use mode::{ModeSwitch, SceneMode};
pub use system::SceneSystem;
