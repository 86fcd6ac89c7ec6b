//! Duoview - window event pipeline for stereoscopic dual-view output.
//!
//! A [`window::Window`] drives one OS window whose content may span two
//! outputs (the master and the slave eye). Native notifications arrive on a
//! capture thread through a [`window::WindowSink`], are double-buffered in
//! [`events::EventBuffer`], and are delivered on the consumer thread by
//! [`window::Window::process_events`] together with synthesized key holds
//! and recognized touch gestures.
//!
//! Supporting modules:
//!
//! - [`geometry`] - points, rectangles and GL viewports
//! - [`monitor`] - monitor enumeration, naming and per-monitor overrides
//! - [`tiling`] - master/slave adjacency detection and viewport layout
//! - [`gesture`] - touch gesture recognition
//! - [`power`] - sleep inhibition while a window is active
//! - [`config`] - JSONC configuration and typed window attributes

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod geometry;
pub mod gesture;
pub mod monitor;
pub mod platform;
pub mod power;
pub mod tiling;
pub mod window;
