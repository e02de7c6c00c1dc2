//! Display hardware initialization module
//!
//! The CrowPanel 5.0" drives an 800x480 RGB565 panel straight from the
//! ESP32-S3 LCD_CAM peripheral (DPI mode). The panel has no frame memory of
//! its own, so a full frame lives in PSRAM and is streamed out continuously
//! by DMA; rendering pauses the stream, patches the frame and restarts it.

use esp_hal::dma::{DmaBufError, DmaDescriptor, DmaError, DmaTxBuf, CHUNK_SIZE};
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::lcd_cam::lcd::dpi::{
    Config as DpiConfig, ConfigError, Dpi, DpiTransfer, Format, FrameTiming,
};
use esp_hal::lcd_cam::lcd::{ClockMode, Phase, Polarity};
use esp_hal::lcd_cam::LcdCam;
use esp_hal::peripherals::{
    DMA_CH2, GPIO0, GPIO1, GPIO14, GPIO15, GPIO16, GPIO2, GPIO21, GPIO3, GPIO39, GPIO4, GPIO40,
    GPIO41, GPIO45, GPIO46, GPIO47, GPIO48, GPIO5, GPIO6, GPIO7, GPIO8, GPIO9, LCD_CAM,
};
use esp_hal::time::Rate;
use esp_hal::Blocking;
use launcher::framebuffer::{leak_aligned, FrameError};
use launcher::{DisplayConfig, FrameBuffer};
use log::info;
use slint::platform::software_renderer::Rgb565Pixel;
use slint::platform::SetPlatformError;
use static_cell::StaticCell;

const FRAME_BYTES: usize = launcher::BoardConfig::CROWPANEL_5.display.frame_bytes();
const NUM_DMA_DESC: usize = FRAME_BYTES.div_ceil(CHUNK_SIZE);

/// PSRAM DMA wants cache-line aligned buffers
const FRAME_ALIGN: usize = 64;

static DESCRIPTORS: StaticCell<[DmaDescriptor; NUM_DMA_DESC]> = StaticCell::new();

/// Pins and peripherals wired to the panel
pub struct DisplayPeripherals {
    pub lcd_cam: LCD_CAM<'static>,
    pub dma: DMA_CH2<'static>,
    pub backlight: GPIO2<'static>,
    pub de: GPIO40<'static>,
    pub vsync: GPIO41<'static>,
    pub hsync: GPIO39<'static>,
    pub pclk: GPIO0<'static>,
    pub b0: GPIO8<'static>,
    pub b1: GPIO3<'static>,
    pub b2: GPIO46<'static>,
    pub b3: GPIO9<'static>,
    pub b4: GPIO1<'static>,
    pub g0: GPIO5<'static>,
    pub g1: GPIO6<'static>,
    pub g2: GPIO7<'static>,
    pub g3: GPIO15<'static>,
    pub g4: GPIO16<'static>,
    pub g5: GPIO4<'static>,
    pub r0: GPIO45<'static>,
    pub r1: GPIO48<'static>,
    pub r2: GPIO47<'static>,
    pub r3: GPIO21<'static>,
    pub r4: GPIO14<'static>,
}

#[derive(Debug)]
pub enum DisplayError {
    Config(ConfigError),
    Buffer(DmaBufError),
    Dma(DmaError),
    Frame(FrameError),
    Platform(SetPlatformError),
}

impl From<ConfigError> for DisplayError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<DmaBufError> for DisplayError {
    fn from(e: DmaBufError) -> Self {
        Self::Buffer(e)
    }
}

impl From<DmaError> for DisplayError {
    fn from(e: DmaError) -> Self {
        Self::Dma(e)
    }
}

impl From<FrameError> for DisplayError {
    fn from(e: FrameError) -> Self {
        Self::Frame(e)
    }
}

impl From<SetPlatformError> for DisplayError {
    fn from(e: SetPlatformError) -> Self {
        Self::Platform(e)
    }
}

enum ScanOut {
    Idle(Dpi<'static, Blocking>, DmaTxBuf),
    Running(DpiTransfer<'static, DmaTxBuf, Blocking>),
    /// Only observable if a restart panicked half way
    Gone,
}

/// The RGB panel and its frame in PSRAM
pub struct RgbPanel {
    scan_out: ScanOut,
    config: DisplayConfig,
    _backlight: Output<'static>,
}

impl RgbPanel {
    /// Pause scan-out, let `draw` patch the frame, then resume.
    pub fn update<R>(&mut self, draw: impl FnOnce(FrameBuffer<'_>) -> R) -> Result<R, DisplayError> {
        let (dpi, mut buffer) = match core::mem::replace(&mut self.scan_out, ScanOut::Gone) {
            ScanOut::Idle(dpi, buffer) => (dpi, buffer),
            ScanOut::Running(transfer) => transfer.stop(),
            ScanOut::Gone => unreachable!("panel scan-out lost"),
        };

        let frame = FrameBuffer::new(
            buffer.as_mut_slice(),
            self.config.width.into(),
            self.config.height.into(),
        );
        let result = match frame {
            Ok(frame) => Ok(draw(frame)),
            Err(e) => Err(DisplayError::from(e)),
        };

        self.start(dpi, buffer)?;
        result
    }

    fn start(&mut self, dpi: Dpi<'static, Blocking>, buffer: DmaTxBuf) -> Result<(), DisplayError> {
        match dpi.send(true, buffer) {
            Ok(transfer) => {
                self.scan_out = ScanOut::Running(transfer);
                Ok(())
            }
            Err((e, dpi, buffer)) => {
                self.scan_out = ScanOut::Idle(dpi, buffer);
                Err(e.into())
            }
        }
    }
}

/// Brings up the DPI panel, clears it to black and starts streaming.
///
/// # Errors
///
/// Returns an error if the LCD peripheral rejects the timing, the frame
/// cannot be wrapped for DMA, or the first transfer fails to start.
pub fn initialize_display(
    p: DisplayPeripherals,
    config: &DisplayConfig,
) -> Result<RgbPanel, DisplayError> {
    let lcd_cam = LcdCam::new(p.lcd_cam);

    // HSYNC 4 + back porch 43 + 800 + front porch 8, VSYNC 4 + 12 + 480 + 8
    let dpi_config = DpiConfig::default()
        .with_clock_mode(ClockMode {
            polarity: Polarity::IdleLow,
            phase: Phase::ShiftHigh,
        })
        .with_frequency(Rate::from_mhz(15))
        .with_format(Format {
            enable_2byte_mode: true,
            ..Default::default()
        })
        .with_timing(FrameTiming {
            horizontal_active_width: config.width.into(),
            horizontal_total_width: usize::from(config.width) + 55,
            horizontal_blank_front_porch: 47,
            vertical_active_height: config.height.into(),
            vertical_total_height: usize::from(config.height) + 24,
            vertical_blank_front_porch: 16,
            hsync_width: 4,
            vsync_width: 4,
            hsync_position: 0,
        })
        .with_vsync_idle_level(Level::High)
        .with_hsync_idle_level(Level::High)
        .with_de_idle_level(Level::Low)
        .with_disable_black_region(false);

    let dpi = Dpi::new(lcd_cam.lcd, p.dma, dpi_config)?
        .with_vsync(p.vsync)
        .with_hsync(p.hsync)
        .with_de(p.de)
        .with_pclk(p.pclk)
        .with_data0(p.b0)
        .with_data1(p.b1)
        .with_data2(p.b2)
        .with_data3(p.b3)
        .with_data4(p.b4)
        .with_data5(p.g0)
        .with_data6(p.g1)
        .with_data7(p.g2)
        .with_data8(p.g3)
        .with_data9(p.g4)
        .with_data10(p.g5)
        .with_data11(p.r0)
        .with_data12(p.r1)
        .with_data13(p.r2)
        .with_data14(p.r3)
        .with_data15(p.r4);

    let descriptors = DESCRIPTORS.init([DmaDescriptor::EMPTY; NUM_DMA_DESC]);
    let frame = leak_aligned(config.frame_bytes(), FRAME_ALIGN);
    let mut buffer = DmaTxBuf::new(descriptors, frame)?;
    FrameBuffer::new(
        buffer.as_mut_slice(),
        config.width.into(),
        config.height.into(),
    )?
    .fill(Rgb565Pixel(0));

    let backlight = Output::new(p.backlight, Level::High, OutputConfig::default());
    info!(
        "Panel {}x{} streaming, {} byte frame",
        config.width,
        config.height,
        config.frame_bytes()
    );

    let mut panel = RgbPanel {
        scan_out: ScanOut::Gone,
        config: *config,
        _backlight: backlight,
    };
    panel.start(dpi, buffer)?;
    Ok(panel)
}
