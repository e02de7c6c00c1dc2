#![no_std]
#![no_main]

use alloc::boxed::Box;
use alloc::vec;
use core::convert::Infallible;
use embassy_executor::Spawner;
use embassy_time::Timer;
use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::timer::timg::TimerGroup;
use esp_hal_embassy::main;
use hardware::DisplayPeripherals;
use launcher::event_loop::{AlreadyRunning, EventLoop};
use launcher::theme::ResolvedTheme;
use launcher::{diagnostics, display, BoardConfig, Boot, Stage};
use log::info;
use render_task::render_task;
use slint::platform::software_renderer::{MinimalSoftwareWindow, RepaintBufferType, Rgb565Pixel};
use slint::{ComponentHandle, PhysicalSize, PlatformError};
use slint_backend::PanelPlatform;
use slint_generated::{AppWindow, Theme as UiTheme};

extern crate alloc;

mod hardware;
mod render_task;
mod slint_backend;

esp_bootloader_esp_idf::esp_app_desc!();

const BOARD: BoardConfig = BoardConfig::CROWPANEL_5;

/// Seconds between heap usage reports once the UI is up
const HEAP_REPORT_SECS: u64 = 30;

#[main]
async fn main(spawner: Spawner) {
    // Initialize peripherals
    let peripherals = esp_hal::init(esp_hal::Config::default().with_cpu_clock(CpuClock::_240MHz));

    esp_println::logger::init_logger_from_env();
    esp_alloc::heap_allocator!(size: 72 * 1024);
    // Frame buffer and draw band live in PSRAM
    esp_alloc::psram_allocator!(peripherals.PSRAM, esp_hal::psram);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_hal_embassy::init(timg0.timer0);
    info!("Embassy initialized!");

    let mut boot = Boot::new();
    let display_config = BOARD.display;

    // 1) Graphics runtime: the window every frame is rendered into
    let window = boot
        .require(Stage::Graphics, || {
            let window = MinimalSoftwareWindow::new(RepaintBufferType::ReusedBuffer);
            window.set_size(PhysicalSize::new(
                display_config.width.into(),
                display_config.height.into(),
            ));
            Ok::<_, Infallible>(window)
        })
        .expect("graphics init failed");

    // 2) Display: panel, draw band, platform registration
    let display_peripherals = DisplayPeripherals {
        lcd_cam: peripherals.LCD_CAM,
        dma: peripherals.DMA_CH2,
        backlight: peripherals.GPIO2,
        de: peripherals.GPIO40,
        vsync: peripherals.GPIO41,
        hsync: peripherals.GPIO39,
        pclk: peripherals.GPIO0,
        b0: peripherals.GPIO8,
        b1: peripherals.GPIO3,
        b2: peripherals.GPIO46,
        b3: peripherals.GPIO9,
        b4: peripherals.GPIO1,
        g0: peripherals.GPIO5,
        g1: peripherals.GPIO6,
        g2: peripherals.GPIO7,
        g3: peripherals.GPIO15,
        g4: peripherals.GPIO16,
        g5: peripherals.GPIO4,
        r0: peripherals.GPIO45,
        r1: peripherals.GPIO48,
        r2: peripherals.GPIO47,
        r3: peripherals.GPIO21,
        r4: peripherals.GPIO14,
    };
    let (panel, band) = boot
        .require(Stage::Display, || -> Result<_, hardware::DisplayError> {
            let panel = hardware::initialize_display(display_peripherals, &display_config)?;
            let band = vec![Rgb565Pixel(0); display_config.draw_buffer_pixels()].leak();
            display::register(Box::new(PanelPlatform::new(window.clone())))?;
            Ok((panel, band))
        })
        .expect("Display configuration error");

    // Optional theme (the UI keeps its built-in colors without it)
    let theme = boot.attempt(Stage::Theme, || BOARD.theme.resolve());

    // 3) Touch
    let touchpad = boot
        .attempt_async(
            Stage::Touch,
            hardware::initialize_touchpad(
                peripherals.I2C1,
                peripherals.GPIO19,
                peripherals.GPIO20,
                &BOARD.touch,
                &display_config,
            ),
        )
        .await;
    if touchpad.is_some() {
        info!("Touch: GT911 registered");
    }

    // 4) Event loop: timers, animations, input, redraws
    boot.require(Stage::EventLoop, || match EventLoop::start() {
        Ok(running) => spawner.spawn(render_task(
            window.clone(),
            panel,
            band,
            touchpad,
            display_config,
            running,
        )),
        Err(AlreadyRunning) => {
            info!("Event loop already running");
            Ok(())
        }
    })
    .expect("event loop start failed");

    // Diagnostics
    boot.attempt(Stage::Diagnostics, || {
        diagnostics::log_versions(&[
            ("Slint", slint_generated::SLINT_VERSION),
            ("Firmware", env!("CARGO_PKG_VERSION")),
        ])
    });

    // 5) Hand over to the UI
    let app_window = boot
        .require(Stage::Ui, || {
            let app_window = AppWindow::new()?;
            if let Some(theme) = &theme {
                apply_theme(&app_window, theme);
            }
            app_window.show()?;
            Ok::<_, PlatformError>(app_window)
        })
        .expect("UI load error");

    boot.log_summary();

    // the UI must outlive this loop, the render task drives it from here on
    let _app_window = app_window;
    loop {
        Timer::after_secs(HEAP_REPORT_SECS).await;
        info!(
            "Heap used: {} free: {}",
            esp_alloc::HEAP.used(),
            esp_alloc::HEAP.free()
        );
    }
}

fn apply_theme(app_window: &AppWindow, theme: &ResolvedTheme) {
    let ui_theme = app_window.global::<UiTheme>();
    ui_theme.set_primary(theme.primary);
    ui_theme.set_secondary(theme.secondary);
    ui_theme.set_background(theme.background);
    ui_theme.set_foreground(theme.foreground);
    ui_theme.set_font_size(theme.font_size);
}
