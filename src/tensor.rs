//! The host's raster representation and conversions to and from it.

use crate::error::{ImgenError, Result};
use image::RgbImage;

/// Interleaved channels per pixel. The host exchanges RGB only.
const CHANNELS: usize = 3;

/// An owned RGB raster in the host's tensor layout.
///
/// Samples are stored interleaved as `batch x height x width x 3` `f32`
/// values nominally in `[0, 1]`. A batch holds one or more frames; the node
/// only ever reads frame 0 of a batched input and only ever produces
/// single-frame outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    batch: usize,
    height: usize,
    width: usize,
    data: Vec<f32>,
}

impl ImageTensor {
    /// Creates a batched tensor, validating that `data` holds exactly
    /// `batch * height * width * 3` samples.
    pub fn new(batch: usize, height: usize, width: usize, data: Vec<f32>) -> Result<Self> {
        if batch == 0 || height == 0 || width == 0 {
            return Err(ImgenError::Tensor(format!(
                "dimensions must be non-zero, got {batch}x{height}x{width}x3"
            )));
        }
        if height > u32::MAX as usize || width > u32::MAX as usize {
            return Err(ImgenError::Tensor(format!(
                "frame dimensions {height}x{width} exceed the supported raster size"
            )));
        }
        let expected = batch
            .checked_mul(height)
            .and_then(|n| n.checked_mul(width))
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or_else(|| {
                ImgenError::Tensor(format!("tensor shape {batch}x{height}x{width}x3 overflows"))
            })?;
        if data.len() != expected {
            return Err(ImgenError::Tensor(format!(
                "expected {expected} samples for {batch}x{height}x{width}x3, got {}",
                data.len()
            )));
        }
        Ok(Self {
            batch,
            height,
            width,
            data,
        })
    }

    /// Creates a single-frame tensor (batch size 1).
    pub fn from_frame(height: usize, width: usize, data: Vec<f32>) -> Result<Self> {
        Self::new(1, height, width, data)
    }

    /// Converts an 8-bit RGB image into a normalized single-frame tensor.
    pub fn from_rgb_image(image: &RgbImage) -> Self {
        let data = image
            .as_raw()
            .iter()
            .map(|&v| f32::from(v) / 255.0)
            .collect();
        Self {
            batch: 1,
            height: image.height() as usize,
            width: image.width() as usize,
            data,
        }
    }

    /// Decodes encoded image bytes (PNG, JPEG, WebP), converts to RGB and
    /// normalizes into a single-frame tensor.
    pub fn from_encoded(bytes: &[u8]) -> Result<Self> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| ImgenError::ImageDecode(e.to_string()))?;
        Ok(Self::from_rgb_image(&decoded.to_rgb8()))
    }

    /// Renders the first frame as an 8-bit RGB image.
    ///
    /// Samples are mapped `[0, 1] -> [0, 255]` with saturating
    /// round-to-nearest, so tensors built from 8-bit sources convert back
    /// pixel-exactly.
    pub fn to_rgb_image(&self) -> RgbImage {
        let frame_len = self.height * self.width * CHANNELS;
        let bytes: Vec<u8> = self.data[..frame_len]
            .iter()
            .map(|&v| (v * 255.0).round().clamp(0.0, 255.0) as u8)
            .collect();
        RgbImage::from_raw(self.width as u32, self.height as u32, bytes)
            .expect("frame length matches dimensions")
    }

    /// Number of frames in the batch.
    pub fn batch(&self) -> usize {
        self.batch
    }

    /// Frame height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Frame width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The raw interleaved samples, `batch x height x width x 3`.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// The RGB sample at `(frame, y, x)`, or `None` if out of bounds.
    pub fn pixel(&self, frame: usize, y: usize, x: usize) -> Option<[f32; 3]> {
        if frame >= self.batch || y >= self.height || x >= self.width {
            return None;
        }
        let offset = ((frame * self.height + y) * self.width + x) * CHANNELS;
        Some([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn gradient_frame(height: usize, width: usize) -> Vec<f32> {
        (0..height * width * 3)
            .map(|i| (i % 256) as u8)
            .map(|v| f32::from(v) / 255.0)
            .collect()
    }

    #[test]
    fn test_shape_validation() {
        assert!(matches!(
            ImageTensor::new(0, 2, 2, vec![]),
            Err(ImgenError::Tensor(_))
        ));
        assert!(matches!(
            ImageTensor::from_frame(2, 2, vec![0.0; 11]),
            Err(ImgenError::Tensor(_))
        ));
        assert!(ImageTensor::from_frame(2, 2, vec![0.0; 12]).is_ok());
    }

    #[test]
    fn test_accessors() {
        let tensor = ImageTensor::new(2, 3, 4, vec![0.5; 2 * 3 * 4 * 3]).unwrap();
        assert_eq!(tensor.batch(), 2);
        assert_eq!(tensor.height(), 3);
        assert_eq!(tensor.width(), 4);
        assert_eq!(tensor.data().len(), 72);
        assert_eq!(tensor.pixel(1, 2, 3), Some([0.5, 0.5, 0.5]));
        assert_eq!(tensor.pixel(2, 0, 0), None);
    }

    #[test]
    fn test_from_rgb_image_normalizes() {
        let mut image = RgbImage::new(2, 1);
        image.put_pixel(0, 0, image::Rgb([0, 128, 255]));
        image.put_pixel(1, 0, image::Rgb([51, 102, 204]));

        let tensor = ImageTensor::from_rgb_image(&image);
        assert_eq!(tensor.batch(), 1);
        assert_eq!(tensor.height(), 1);
        assert_eq!(tensor.width(), 2);
        assert_eq!(tensor.pixel(0, 0, 0), Some([0.0, 128.0 / 255.0, 1.0]));
        assert_eq!(
            tensor.pixel(0, 0, 1),
            Some([51.0 / 255.0, 102.0 / 255.0, 204.0 / 255.0])
        );
    }

    #[test]
    fn test_to_rgb_image_rounds_and_saturates() {
        let tensor = ImageTensor::from_frame(
            1,
            3,
            vec![0.5, 0.0, 1.0, 1.5, -0.25, 0.2, 127.4 / 255.0, 127.6 / 255.0, 0.999],
        )
        .unwrap();
        let image = tensor.to_rgb_image();
        assert_eq!(image.get_pixel(0, 0).0, [128, 0, 255]);
        assert_eq!(image.get_pixel(1, 0).0, [255, 0, 51]);
        assert_eq!(image.get_pixel(2, 0).0, [127, 128, 255]);
    }

    #[test]
    fn test_to_rgb_image_uses_first_frame() {
        let mut data = vec![0.0; 2 * 1 * 1 * 3];
        data[3..].copy_from_slice(&[1.0, 1.0, 1.0]);
        let tensor = ImageTensor::new(2, 1, 1, data).unwrap();
        assert_eq!(tensor.to_rgb_image().get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_png_round_trip_is_pixel_exact() {
        let tensor = ImageTensor::from_frame(16, 16, gradient_frame(16, 16)).unwrap();

        let mut png = Vec::new();
        image::DynamicImage::ImageRgb8(tensor.to_rgb_image())
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let decoded = ImageTensor::from_encoded(&png).unwrap();
        assert_eq!(decoded, tensor);
    }

    #[test]
    fn test_from_encoded_rejects_garbage() {
        assert!(matches!(
            ImageTensor::from_encoded(b"not an image"),
            Err(ImgenError::ImageDecode(_))
        ));
    }
}
