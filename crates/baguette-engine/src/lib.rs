pub mod api;
pub mod core;
pub mod bridge;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{SoundEvent, GameEvent};
pub use core::time::{Clock, FixedTimestep};
pub use core::timers::{TimerId, TimerQueue};
pub use input::queue::{InputEvent, InputQueue};
pub use bridge::protocol::ProtocolLayout;
