//! Swipe to the latest item and regenerate.

pub mod machine;
pub mod model;

pub use machine::{SwipeMachine, swipe_to_latest_and_regenerate};
pub use model::{SwipeFailure, SwipePhase, SwipeProgress, SwipeReport, SwipeTimings};
