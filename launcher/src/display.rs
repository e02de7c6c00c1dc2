//! Display registration with the Slint runtime.

use alloc::boxed::Box;

use log::{info, warn};
use slint::platform::{Platform, SetPlatformError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// Our platform is now the default display
    New,
    /// A platform was installed earlier, it stays in charge
    Existing,
}

/// Install `platform` unless one is already registered.
pub fn register(platform: Box<dyn Platform + 'static>) -> Result<Registration, SetPlatformError> {
    match slint::platform::set_platform(platform) {
        Ok(()) => {
            info!("Display registered");
            Ok(Registration::New)
        }
        Err(SetPlatformError::AlreadySet) => {
            warn!("Display already registered, keeping the existing one");
            Ok(Registration::Existing)
        }
        Err(e) => Err(e),
    }
}
