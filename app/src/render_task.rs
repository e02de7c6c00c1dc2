use alloc::rc::Rc;
use embassy_time::Timer;
use launcher::event_loop::Running;
use launcher::input::PointerInput;
use launcher::{BandBuffer, DisplayConfig};
use log::{debug, error, warn};
use slint::platform::software_renderer::{MinimalSoftwareWindow, Rgb565Pixel};

use crate::hardware::{RgbPanel, Touchpad};

/// Idle time between polls when nothing needs repainting
const IDLE_MILLIS: u64 = 10;

#[embassy_executor::task()]
pub async fn render_task(
    window: Rc<MinimalSoftwareWindow>,
    mut panel: RgbPanel,
    band: &'static mut [Rgb565Pixel],
    mut touchpad: Option<Touchpad>,
    display: DisplayConfig,
    _running: Running,
) {
    let mut pointer = PointerInput::new(window.scale_factor());

    loop {
        // Update timers and animations
        slint::platform::update_timers_and_animations();

        // process touchscreen events
        if let Some(touchpad) = touchpad.as_mut() {
            process_touch(touchpad, &mut pointer, &window).await;
        }

        // Draw the scene if something needs to be drawn
        let is_dirty = window.draw_if_needed(|renderer| {
            let refreshed = panel.update(|frame| {
                let mut band = BandBuffer::new(&mut band[..], display.width.into(), frame);
                renderer.render_by_line(&mut band);
                band.finish()
            });
            match refreshed {
                Ok(Ok(flushes)) => debug!("frame updated in {} flushes", flushes),
                Ok(Err(e)) => error!("flush failed: {}", e),
                Err(e) => error!("panel refresh failed: {:?}", e),
            }
        });

        if !is_dirty {
            Timer::after_millis(IDLE_MILLIS).await
        }
    }
}

async fn process_touch(
    touchpad: &mut Touchpad,
    pointer: &mut PointerInput,
    window: &MinimalSoftwareWindow,
) {
    let state = match touchpad.read_touch().await {
        Ok(state) => state,
        Err(e) => {
            warn!("Touch read error: {}", e);
            return;
        }
    };

    for event in pointer.update(state) {
        debug!("Dispatching Slint event: {:?}", event);
        if let Err(e) = window.try_dispatch_event(event) {
            warn!("Event dispatch failed: {:?}", e);
        }
    }
}
