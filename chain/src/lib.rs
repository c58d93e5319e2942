#![warn(clippy::all, rust_2018_idioms)]

//! Geometry engine for gear-chain direction tasks: lays a chain of meshed
//! gears out along a line, keeps neighboring teeth from overlapping at
//! the initial instant, and finds how far the chain turns before the
//! marked teeth of the last two gears meet.

mod data;
pub use data::{Chain, Direction, LineArrangement};
pub mod gear;
pub use gear::{Gear, Tooth, ToothProfile};
mod config;
pub use config::{AlignParams, ConfigError, MeshParams, TaskConfig, VideoConfig};

pub mod align;
pub mod layout;
pub mod mesh;
pub use align::Alignment;

mod task;
pub use task::{assemble, generate, Task};
