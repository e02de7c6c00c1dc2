//! RGB565 frame in the byte layout the LCD peripheral streams out.

use alloc::vec;
use core::fmt::{self, Display, Formatter};

use slint::platform::software_renderer::Rgb565Pixel;

use crate::band::{Area, FlushTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    BufferTooSmall { needed: usize, actual: usize },
    OutOfBounds { area: Area },
    SizeMismatch { expected: usize, actual: usize },
}

impl Display for FrameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::BufferTooSmall { needed, actual } => {
                write!(f, "frame buffer holds {} bytes, needs {}", actual, needed)
            }
            FrameError::OutOfBounds { area } => write!(f, "area {:?} outside frame", area),
            FrameError::SizeMismatch { expected, actual } => {
                write!(f, "got {} pixels for an area of {}", actual, expected)
            }
        }
    }
}

/// Little-endian RGB565 view over a DMA buffer.
pub struct FrameBuffer<'a> {
    bytes: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> FrameBuffer<'a> {
    pub fn new(bytes: &'a mut [u8], width: usize, height: usize) -> Result<Self, FrameError> {
        let needed = width * height * 2;
        if bytes.len() < needed {
            return Err(FrameError::BufferTooSmall {
                needed,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            bytes,
            width,
            height,
        })
    }

    pub fn fill(&mut self, color: Rgb565Pixel) {
        let [lo, hi] = color.0.to_le_bytes();
        for pixel in self.bytes[..self.width * self.height * 2].chunks_exact_mut(2) {
            pixel[0] = lo;
            pixel[1] = hi;
        }
    }

    #[cfg(test)]
    fn pixel(&self, x: usize, y: usize) -> Option<Rgb565Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y * self.width + x) * 2;
        Some(Rgb565Pixel(u16::from_le_bytes([
            self.bytes[offset],
            self.bytes[offset + 1],
        ])))
    }
}

impl FlushTarget for FrameBuffer<'_> {
    type Error = FrameError;

    fn flush(&mut self, area: Area, pixels: &[Rgb565Pixel]) -> Result<(), FrameError> {
        if area.x + area.width > self.width || area.y + area.height > self.height {
            return Err(FrameError::OutOfBounds { area });
        }
        if pixels.len() != area.pixels() {
            return Err(FrameError::SizeMismatch {
                expected: area.pixels(),
                actual: pixels.len(),
            });
        }
        if area.width == 0 {
            return Ok(());
        }

        for (row, source) in pixels.chunks_exact(area.width).enumerate() {
            let start = ((area.y + row) * self.width + area.x) * 2;
            let destination = &mut self.bytes[start..start + area.width * 2];
            for (bytes, pixel) in destination.chunks_exact_mut(2).zip(source) {
                bytes.copy_from_slice(&pixel.0.to_le_bytes());
            }
        }
        Ok(())
    }
}

/// Leaks a zeroed `len` byte buffer starting on an `align` boundary.
///
/// `align` must be a power of two.
pub fn leak_aligned(len: usize, align: usize) -> &'static mut [u8] {
    let raw = vec![0u8; len + align].leak();
    let offset = raw.as_ptr().align_offset(align);
    &mut raw[offset..offset + len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_buffer_too_small() {
        let mut bytes = vec![0u8; 10];
        assert_eq!(
            FrameBuffer::new(&mut bytes, 4, 2).err(),
            Some(FrameError::BufferTooSmall {
                needed: 16,
                actual: 10
            })
        );
    }

    #[test]
    fn test_flush_copies_rows_little_endian() {
        let mut bytes = vec![0u8; 4 * 3 * 2];
        let mut frame = FrameBuffer::new(&mut bytes, 4, 3).unwrap();
        let area = Area {
            x: 1,
            y: 1,
            width: 2,
            height: 2,
        };
        let pixels = [
            Rgb565Pixel(0x1234),
            Rgb565Pixel(0x5678),
            Rgb565Pixel(0x9ABC),
            Rgb565Pixel(0xDEF0),
        ];
        frame.flush(area, &pixels).unwrap();

        assert_eq!(frame.pixel(1, 1).map(|p| p.0), Some(0x1234));
        assert_eq!(frame.pixel(2, 1).map(|p| p.0), Some(0x5678));
        assert_eq!(frame.pixel(1, 2).map(|p| p.0), Some(0x9ABC));
        assert_eq!(frame.pixel(2, 2).map(|p| p.0), Some(0xDEF0));
        assert_eq!(frame.pixel(0, 0).map(|p| p.0), Some(0));
        assert_eq!(frame.pixel(4, 0).map(|p| p.0), None);
        // row 1 starts at byte 8, x = 1 adds 2
        assert_eq!(&bytes[10..14], &[0x34, 0x12, 0x78, 0x56]);
    }

    #[test]
    fn test_flush_rejects_bad_areas() {
        let mut bytes = vec![0u8; 4 * 3 * 2];
        let mut frame = FrameBuffer::new(&mut bytes, 4, 3).unwrap();
        let area = Area {
            x: 3,
            y: 0,
            width: 2,
            height: 1,
        };
        assert_eq!(
            frame.flush(area, &[Rgb565Pixel(0); 2]),
            Err(FrameError::OutOfBounds { area })
        );
        let area = Area {
            x: 0,
            y: 0,
            width: 2,
            height: 1,
        };
        assert_eq!(
            frame.flush(area, &[Rgb565Pixel(0); 3]),
            Err(FrameError::SizeMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_leak_aligned() {
        for len in [1, 63, 64, 4000] {
            let buffer = leak_aligned(len, 64);
            assert_eq!(buffer.len(), len);
            assert_eq!(buffer.as_ptr() as usize % 64, 0);
            assert!(buffer.iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn test_fill() {
        let mut bytes = vec![0u8; 2 * 2 * 2];
        let mut frame = FrameBuffer::new(&mut bytes, 2, 2).unwrap();
        frame.fill(Rgb565Pixel(0xF800));
        assert_eq!(bytes, vec![0x00, 0xF8, 0x00, 0xF8, 0x00, 0xF8, 0x00, 0xF8]);
    }
}
