//! Render preview stub
//!
//! Writes a constant image into a caller-owned buffer where a real renderer
//! would write computed pixels for a live preview consumer.
//!
//! Buffer layout is single-channel and row-major: the sample for pixel
//! `(col, row)` lives at `row * width + col`. Samples beyond
//! `width * height` are never touched.

use std::time::{Duration, Instant};

use thiserror::Error;

/// Value written to every preview sample
pub const PREVIEW_FILL_VALUE: f32 = 1.0;

/// Preview buffer validation errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewError {
    /// The buffer holds fewer samples than `width * height`
    #[error("Preview buffer too small: {required} samples required, {actual} available")]
    BufferTooSmall {
        /// Samples needed for the requested dimensions
        required: usize,
        /// Samples actually available
        actual: usize,
    },

    /// `width * height` does not fit in the address space
    #[error("Preview dimensions {width}x{height} overflow")]
    SizeOverflow {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
}

/// Number of samples an image of `width` x `height` occupies
pub fn required_len(width: u32, height: u32) -> Result<usize, PreviewError> {
    let overflow = PreviewError::SizeOverflow { width, height };
    let width = usize::try_from(width).map_err(|_| overflow)?;
    let height = usize::try_from(height).map_err(|_| overflow)?;
    width.checked_mul(height).ok_or(overflow)
}

/// Bounds-checked view of a preview image
#[derive(Debug)]
pub struct PreviewBuffer<'a> {
    width: u32,
    height: u32,
    data: &'a mut [f32],
}

impl<'a> PreviewBuffer<'a> {
    /// Wrap `data` as a `width` x `height` image
    ///
    /// # Errors
    /// `BufferTooSmall` when `data` holds fewer than `width * height`
    /// samples, `SizeOverflow` when that product overflows.
    pub fn new(width: u32, height: u32, data: &'a mut [f32]) -> Result<Self, PreviewError> {
        let required = required_len(width, height)?;
        if data.len() < required {
            return Err(PreviewError::BufferTooSmall {
                required,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    /// Image width in pixels
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of samples covered by the image
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Length of the underlying buffer, which may exceed the image
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the image covers no samples
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Samples of one row, `None` past the last row
    pub fn row(&self, row: u32) -> Option<&[f32]> {
        if row >= self.height {
            return None;
        }
        let width = self.width as usize;
        let start = row as usize * width;
        Some(&self.data[start..start + width])
    }

    /// Mutable samples of one row, `None` past the last row
    pub fn row_mut(&mut self, row: u32) -> Option<&mut [f32]> {
        if row >= self.height {
            return None;
        }
        let width = self.width as usize;
        let start = row as usize * width;
        Some(&mut self.data[start..start + width])
    }

    /// The samples covered by the image, row-major
    pub fn pixels(&self) -> &[f32] {
        &self.data[..self.pixel_count()]
    }

    /// Raw pointer to the first sample, for handing across the C boundary
    pub fn as_mut_ptr(&mut self) -> *mut f32 {
        self.data.as_mut_ptr()
    }
}

/// Fill every sample of the image with [`PREVIEW_FILL_VALUE`]
pub fn fill_preview(buffer: &mut PreviewBuffer<'_>) {
    for row in 0..buffer.height() {
        if let Some(samples) = buffer.row_mut(row) {
            samples.fill(PREVIEW_FILL_VALUE);
        }
    }
}

/// Validate `data` as a `width` x `height` image and fill it
pub fn update_render_preview(width: u32, height: u32, data: &mut [f32]) -> Result<(), PreviewError> {
    let mut buffer = PreviewBuffer::new(width, height, data)?;
    fill_preview(&mut buffer);
    Ok(())
}

/// Rate limiter for preview refreshes
///
/// A refresh is due on the first check, whenever the buffer was invalidated
/// (for example after a resize), and otherwise once `interval` has elapsed
/// since the last refresh. With no interval every check is due.
#[derive(Debug, Clone)]
pub struct PreviewThrottle {
    interval: Option<Duration>,
    last_update: Option<Instant>,
    dirty: bool,
}

impl PreviewThrottle {
    /// Throttle refreshes to at most one per `interval`
    pub const fn new(interval: Option<Duration>) -> Self {
        Self {
            interval,
            last_update: None,
            dirty: true,
        }
    }

    /// Force the next check to be due regardless of elapsed time
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Whether a refresh is due at `now`; records it as done when it is
    pub fn is_due(&mut self, now: Instant) -> bool {
        let due = self.dirty
            || match (self.interval, self.last_update) {
                (Some(interval), Some(last)) => now.saturating_duration_since(last) >= interval,
                _ => true,
            };

        if due {
            self.dirty = false;
            self.last_update = Some(now);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fill_three_by_two() {
        let mut data = [0.0_f32; 6];
        update_render_preview(3, 2, &mut data).unwrap();
        assert_eq!(data, [1.0; 6]);
    }

    #[test]
    fn test_fill_overwrites_any_initial_values() {
        for (width, height) in [(1, 1), (7, 5), (64, 1), (1, 64)] {
            let len = (width * height) as usize;
            let mut data: Vec<f32> = (0..len).map(|i| i as f32 - 3.5).collect();
            data[0] = f32::NAN;

            update_render_preview(width, height, &mut data).unwrap();

            for sample in &data {
                assert_relative_eq!(*sample, PREVIEW_FILL_VALUE);
            }
        }
    }

    #[test]
    fn test_zero_dimension_leaves_buffer_untouched() {
        let mut data = [0.25_f32; 8];
        update_render_preview(0, 4, &mut data).unwrap();
        assert_eq!(data, [0.25; 8]);

        update_render_preview(4, 0, &mut data).unwrap();
        assert_eq!(data, [0.25; 8]);

        let mut empty: [f32; 0] = [];
        update_render_preview(0, 0, &mut empty).unwrap();
    }

    #[test]
    fn test_samples_past_image_are_untouched() {
        let mut data = [0.0_f32; 10];
        update_render_preview(2, 3, &mut data).unwrap();
        assert_eq!(&data[..6], &[1.0; 6]);
        assert_eq!(&data[6..], &[0.0; 4]);
    }

    #[test]
    fn test_undersized_buffer_is_rejected() {
        let mut data = [0.0_f32; 5];
        let err = update_render_preview(3, 2, &mut data).unwrap_err();
        assert_eq!(err, PreviewError::BufferTooSmall { required: 6, actual: 5 });
        assert_eq!(data, [0.0; 5]);
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn test_overflowing_dimensions_are_rejected() {
        let mut data = [0.0_f32; 1];
        assert_eq!(
            update_render_preview(u32::MAX, u32::MAX, &mut data),
            Err(PreviewError::SizeOverflow { width: u32::MAX, height: u32::MAX })
        );
    }

    #[test]
    fn test_buffer_accessors() {
        let mut data = [0.0_f32; 12];
        let mut buffer = PreviewBuffer::new(4, 2, &mut data).unwrap();
        assert_eq!(buffer.width(), 4);
        assert_eq!(buffer.height(), 2);
        assert_eq!(buffer.pixel_count(), 8);
        assert_eq!(buffer.len(), 12);
        assert!(!buffer.is_empty());
        assert!(buffer.row(2).is_none());

        buffer.row_mut(1).unwrap()[3] = 9.0;
        fill_preview(&mut buffer);
        assert_eq!(buffer.row(1).unwrap(), &[1.0; 4]);
        assert_eq!(buffer.pixels().len(), 8);
    }

    #[test]
    fn test_throttle_limits_refresh_rate() {
        let start = Instant::now();
        let mut throttle = PreviewThrottle::new(Some(Duration::from_millis(100)));

        assert!(throttle.is_due(start));
        assert!(!throttle.is_due(start + Duration::from_millis(40)));
        assert!(!throttle.is_due(start + Duration::from_millis(99)));
        assert!(throttle.is_due(start + Duration::from_millis(100)));

        // Interval restarts from the last refresh
        assert!(!throttle.is_due(start + Duration::from_millis(150)));
        assert!(throttle.is_due(start + Duration::from_millis(230)));
    }

    #[test]
    fn test_throttle_invalidate_forces_refresh() {
        let start = Instant::now();
        let mut throttle = PreviewThrottle::new(Some(Duration::from_secs(1)));

        assert!(throttle.is_due(start));
        assert!(!throttle.is_due(start + Duration::from_millis(10)));

        throttle.invalidate();
        assert!(throttle.is_due(start + Duration::from_millis(20)));
        assert!(!throttle.is_due(start + Duration::from_millis(30)));
    }

    #[test]
    fn test_unthrottled_is_always_due() {
        let now = Instant::now();
        let mut throttle = PreviewThrottle::new(None);
        assert!(throttle.is_due(now));
        assert!(throttle.is_due(now));
    }
}
