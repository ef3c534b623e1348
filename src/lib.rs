//! Arcade fixed-shooter simulation: level resolution, formation generation,
//! the enemy wave, and per-frame collision resolution.  The terminal
//! front-end in `main.rs` drives it one frame at a time.

pub mod collision;
pub mod compute;
pub mod constants;
pub mod enemy;
pub mod entities;
pub mod formation;
pub mod input;
pub mod level;
pub mod wave;
