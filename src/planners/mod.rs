mod autopilot;

pub use autopilot::{Autopilot, Decision, FallbackPolicy};
