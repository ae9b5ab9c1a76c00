pub mod engine;
pub mod ticker;

pub use engine::{TimerEngine, TimerError, TimerEvent};
pub use ticker::{poll_duration, Ticker};
