//! Raging sea library - animated water surface
//!
//! The wave and shading math lives in [`ocean`] and [`noise`] as a CPU
//! reference; `water.wgsl` evaluates the same functions per vertex and
//! per fragment.

pub mod camera;
pub mod cli;
pub mod clock;
pub mod error;
pub mod noise;
pub mod ocean;
pub mod panel;
pub mod params;
pub mod preview;
pub mod rendering;
