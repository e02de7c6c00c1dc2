#![no_std]
//! Board-independent start-up glue for the CrowPanel launcher.
//!
//! Everything here runs on the host as well as on the ESP32-S3: the firmware
//! in `app` supplies the peripherals, this crate supplies the sequencing, the
//! draw band, the pointer input mapping and the diagnostics around them.

extern crate alloc;

pub mod band;
pub mod boot;
pub mod config;
pub mod diagnostics;
pub mod display;
pub mod event_loop;
pub mod framebuffer;
pub mod input;
pub mod theme;

pub use band::{Area, BandBuffer, FlushTarget};
pub use boot::{Boot, BootError, Stage};
pub use config::{BoardConfig, DisplayConfig, TouchConfig};
pub use framebuffer::FrameBuffer;
