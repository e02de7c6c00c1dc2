#![no_std]
//! The launcher UI, compiled from `ui/app-window.slint`.
//!
//! The firmware only relies on `AppWindow` and the exported `Theme` global;
//! everything else in the UI can change without touching the firmware.

extern crate alloc;

slint::include_modules!();

/// Slint runtime version the UI is compiled against.
///
/// Every manifest pins `slint` and `slint-build` to exactly this version.
pub const SLINT_VERSION: &str = "1.12.1";
