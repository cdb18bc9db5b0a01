//! Texture loading and data structures.
//! Material maps are decoded from PNG to RGBA8; missing maps use 1x1 fallbacks.

use std::path::Path;

use crate::material::Fallback;

/// Texture data in CPU-friendly format before GPU upload.
#[derive(Clone, Debug)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

/// Supported texture formats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextureFormat {
    Rgba8,
}

impl TextureData {
    /// Create a new texture with given dimensions and RGBA8 format.
    pub fn new_rgba8(width: u32, height: u32, data: Vec<u8>) -> anyhow::Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            anyhow::bail!(
                "RGBA8 texture {}x{} needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            );
        }
        Ok(Self {
            data,
            width,
            height,
            format: TextureFormat::Rgba8,
        })
    }

    /// Load texture from PNG file.
    pub fn load_png<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        log::info!("Loading texture from {:?}", path);

        let img = image::open(path)
            .map_err(|e| anyhow::anyhow!("Failed to open image {:?}: {}", path, e))?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let data = rgba.into_raw();

        log::debug!("Loaded texture {}x{} with {} bytes", width, height, data.len());

        Self::new_rgba8(width, height, data)
    }

    /// Single-texel texture of one color.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            data: rgba.to_vec(),
            width: 1,
            height: 1,
            format: TextureFormat::Rgba8,
        }
    }

    /// Stand-in for an empty material slot.
    pub fn fallback(kind: Fallback) -> Self {
        match kind {
            Fallback::Black => Self::solid([0, 0, 0, 255]),
            Fallback::White => Self::solid([255, 255, 255, 255]),
            // Tangent-space +Z.
            Fallback::FlatNormal => Self::solid([128, 128, 255, 255]),
        }
    }

    /// Get the number of bytes per pixel for the format.
    pub fn bytes_per_pixel(&self) -> u32 {
        match self.format {
            TextureFormat::Rgba8 => 4,
        }
    }

    /// Check if the texture data is valid.
    pub fn is_valid(&self) -> bool {
        let expected_size =
            self.width as usize * self.height as usize * self.bytes_per_pixel() as usize;
        self.data.len() == expected_size && self.width > 0 && self.height > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallbacks_are_single_texels() {
        let flat = TextureData::fallback(Fallback::FlatNormal);
        assert!(flat.is_valid());
        assert_eq!(flat.data, vec![128, 128, 255, 255]);
        assert_eq!(TextureData::fallback(Fallback::Black).data, vec![0, 0, 0, 255]);
    }

    #[test]
    fn size_mismatch_is_rejected() {
        assert!(TextureData::new_rgba8(2, 2, vec![0; 15]).is_err());
        assert!(TextureData::new_rgba8(2, 2, vec![0; 16]).unwrap().is_valid());
    }

    #[test]
    fn huge_dimensions_do_not_overflow() {
        let tex = TextureData {
            data: vec![0; 4],
            width: 70_000,
            height: 70_000,
            format: TextureFormat::Rgba8,
        };
        assert!(!tex.is_valid());
    }

    #[test]
    fn png_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.png");
        image::RgbaImage::from_pixel(3, 2, image::Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let tex = TextureData::load_png(&path).unwrap();
        assert_eq!((tex.width, tex.height), (3, 2));
        assert!(tex.is_valid());
        assert_eq!(&tex.data[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn missing_png_is_an_error() {
        assert!(TextureData::load_png("definitely/not/here.png").is_err());
    }
}
