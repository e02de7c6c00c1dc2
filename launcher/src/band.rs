//! Partial draw buffer
//!
//! Slint renders dirty regions line by line. [`BandBuffer`] collects those
//! lines in a fixed band of memory and hands complete rectangles to a
//! [`FlushTarget`], so the full frame never has to exist in the renderer's
//! pixel format.

use log::error;
use slint::platform::software_renderer::{LineBufferProvider, Rgb565Pixel};

/// Rectangle in display coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Area {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Area {
    pub fn pixels(&self) -> usize {
        self.width * self.height
    }
}

/// Pushes a rendered rectangle to the display.
///
/// `pixels` holds `area.width * area.height` pixels, row-major.
pub trait FlushTarget {
    type Error: core::fmt::Debug;

    fn flush(&mut self, area: Area, pixels: &[Rgb565Pixel]) -> Result<(), Self::Error>;
}

impl<T: FlushTarget + ?Sized> FlushTarget for &mut T {
    type Error = T::Error;

    fn flush(&mut self, area: Area, pixels: &[Rgb565Pixel]) -> Result<(), Self::Error> {
        T::flush(self, area, pixels)
    }
}

pub struct BandBuffer<'a, F: FlushTarget> {
    band: &'a mut [Rgb565Pixel],
    width: usize,
    target: F,
    pending: Option<Area>,
    flushes: usize,
    error: Option<F::Error>,
}

impl<'a, F: FlushTarget> BandBuffer<'a, F> {
    /// `width` is the display width, lines extending past it are dropped.
    pub fn new(band: &'a mut [Rgb565Pixel], width: usize, target: F) -> Self {
        debug_assert!(band.len() >= width, "band shorter than one line");
        Self {
            band,
            width,
            target,
            pending: None,
            flushes: 0,
            error: None,
        }
    }

    /// Flush what is left in the band.
    ///
    /// Returns the number of flushes issued, or the first flush error.
    pub fn finish(mut self) -> Result<usize, F::Error> {
        self.flush_pending();
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.flushes),
        }
    }

    fn flush_pending(&mut self) {
        let Some(area) = self.pending.take() else {
            return;
        };
        self.flushes += 1;
        if let Err(e) = self.target.flush(area, &self.band[..area.pixels()]) {
            error!("flush of {:?} failed: {:?}", area, e);
            if self.error.is_none() {
                self.error = Some(e);
            }
        }
    }

    fn extends_pending(&self, line: usize, x: usize, width: usize) -> bool {
        match self.pending {
            Some(p) => {
                p.y + p.height == line
                    && p.x == x
                    && p.width == width
                    && (p.height + 1) * width <= self.band.len()
            }
            None => false,
        }
    }
}

impl<F: FlushTarget> LineBufferProvider for &mut BandBuffer<'_, F> {
    type TargetPixel = Rgb565Pixel;

    fn process_line(
        &mut self,
        line: usize,
        range: core::ops::Range<usize>,
        render_fn: impl FnOnce(&mut [Self::TargetPixel]),
    ) {
        let width = range.len();
        if width == 0 {
            return;
        }
        if range.end > self.width || width > self.band.len() {
            error!(
                "line {} range {:?} exceeds display width {}",
                line, range, self.width
            );
            return;
        }

        if !self.extends_pending(line, range.start, width) {
            self.flush_pending();
        }

        let area = self.pending.get_or_insert(Area {
            x: range.start,
            y: line,
            width,
            height: 0,
        });
        let offset = area.pixels();
        area.height += 1;

        render_fn(&mut self.band[offset..offset + width]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    #[derive(Default)]
    struct Recorder {
        flushed: Vec<(Area, Vec<u16>)>,
        fail_on: Option<usize>,
    }

    impl FlushTarget for Recorder {
        type Error = usize;

        fn flush(&mut self, area: Area, pixels: &[Rgb565Pixel]) -> Result<(), usize> {
            let index = self.flushed.len();
            self.flushed
                .push((area, pixels.iter().map(|p| p.0).collect()));
            if self.fail_on == Some(index) {
                return Err(index);
            }
            Ok(())
        }
    }

    fn render(band: &mut BandBuffer<'_, &mut Recorder>, line: usize, range: core::ops::Range<usize>) {
        let mut provider = band;
        provider.process_line(line, range, |pixels| {
            pixels.fill(Rgb565Pixel(line as u16));
        });
    }

    #[test]
    fn test_consecutive_lines_coalesce_until_band_is_full() {
        let mut storage = vec![Rgb565Pixel(0); 8];
        let mut recorder = Recorder::default();
        let mut band = BandBuffer::new(&mut storage, 4, &mut recorder);
        for line in 0..3 {
            render(&mut band, line, 0..4);
        }
        assert_eq!(band.finish(), Ok(2));

        assert_eq!(recorder.flushed.len(), 2);
        assert_eq!(
            recorder.flushed[0],
            (
                Area {
                    x: 0,
                    y: 0,
                    width: 4,
                    height: 2
                },
                vec![0, 0, 0, 0, 1, 1, 1, 1]
            )
        );
        assert_eq!(
            recorder.flushed[1],
            (
                Area {
                    x: 0,
                    y: 2,
                    width: 4,
                    height: 1
                },
                vec![2, 2, 2, 2]
            )
        );
    }

    #[test]
    fn test_narrow_segments_pack_more_lines() {
        let mut storage = vec![Rgb565Pixel(0); 8];
        let mut recorder = Recorder::default();
        let mut band = BandBuffer::new(&mut storage, 4, &mut recorder);
        for line in 10..14 {
            render(&mut band, line, 1..3);
        }
        assert_eq!(band.finish(), Ok(1));
        assert_eq!(
            recorder.flushed[0].0,
            Area {
                x: 1,
                y: 10,
                width: 2,
                height: 4
            }
        );
        assert_eq!(recorder.flushed[0].1, vec![10, 10, 11, 11, 12, 12, 13, 13]);
    }

    #[test]
    fn test_range_change_or_gap_starts_new_rectangle() {
        let mut storage = vec![Rgb565Pixel(0); 16];
        let mut recorder = Recorder::default();
        let mut band = BandBuffer::new(&mut storage, 4, &mut recorder);
        render(&mut band, 0, 0..4);
        render(&mut band, 1, 1..4);
        render(&mut band, 3, 1..4);
        assert_eq!(band.finish(), Ok(3));

        let areas: Vec<Area> = recorder.flushed.iter().map(|(a, _)| *a).collect();
        assert_eq!(
            areas,
            vec![
                Area {
                    x: 0,
                    y: 0,
                    width: 4,
                    height: 1
                },
                Area {
                    x: 1,
                    y: 1,
                    width: 3,
                    height: 1
                },
                Area {
                    x: 1,
                    y: 3,
                    width: 3,
                    height: 1
                },
            ]
        );
    }

    #[test]
    fn test_line_past_display_width_is_dropped() {
        let mut storage = vec![Rgb565Pixel(0); 8];
        let mut recorder = Recorder::default();
        let mut band = BandBuffer::new(&mut storage, 4, &mut recorder);
        let mut rendered = false;
        {
            let mut provider = &mut band;
            provider.process_line(0, 2..6, |_| rendered = true);
            provider.process_line(1, 2..2, |_| rendered = true);
        }
        assert!(!rendered);
        assert_eq!(band.finish(), Ok(0));
        assert!(recorder.flushed.is_empty());
    }

    #[test]
    fn test_flush_error_is_kept_and_rendering_continues() {
        let mut storage = vec![Rgb565Pixel(0); 4];
        let mut recorder = Recorder {
            fail_on: Some(0),
            ..Default::default()
        };
        let mut band = BandBuffer::new(&mut storage, 4, &mut recorder);
        render(&mut band, 0, 0..4);
        render(&mut band, 1, 0..4);
        assert_eq!(band.finish(), Err(0));
        assert_eq!(recorder.flushed.len(), 2);
    }
}
