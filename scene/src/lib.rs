#![warn(clippy::all, rust_2018_idioms)]

//! What the renderer, video assembler and prompt writer need from a
//! generated task, short of pixels.

pub mod frames;
pub mod outline;
pub mod prompt;

pub use frames::{schedule, Frame};
pub use outline::{DirectionArrow, GearOutline};
pub use prompt::{captions, task_prompt, Captions, SUMMARY_PROMPT};
