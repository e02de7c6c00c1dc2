use alloc::rc::Rc;
use embassy_time::Instant;
use log::{debug, info};
use slint::{
    platform::{software_renderer::MinimalSoftwareWindow, Platform, WindowAdapter},
    PlatformError,
};

/// Slint platform for the CrowPanel 5.0" RGB panel.
///
/// There is a single full-screen window, rendered by `render_task` into the
/// PSRAM frame. Time comes from the embassy driver, so Slint timers and the
/// render loop share one clock.
pub struct PanelPlatform {
    window: Rc<MinimalSoftwareWindow>,
}

impl PanelPlatform {
    pub fn new(window: Rc<MinimalSoftwareWindow>) -> Self {
        Self { window }
    }
}

impl Platform for PanelPlatform {
    fn create_window_adapter(&self) -> Result<Rc<dyn WindowAdapter>, PlatformError> {
        let size = self.window.size();
        info!("Window adapter for {}x{} panel", size.width, size.height);
        Ok(self.window.clone())
    }

    fn duration_since_start(&self) -> core::time::Duration {
        Instant::now().duration_since(Instant::from_secs(0)).into()
    }

    // `debug()` calls from the .slint files
    fn debug_log(&self, arguments: core::fmt::Arguments) {
        debug!("slint: {}", arguments);
    }
}
