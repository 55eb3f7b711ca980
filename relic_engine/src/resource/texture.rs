//! Decoded texture data.
//!
//! Pixels are tightly packed rows of `components` bytes per texel, as handed
//! over by the image decoder.

use crate::error::{Error, Result};

/// CPU-side texture
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    /// Bytes per texel (4 for RGBA8)
    pub components: u32,
    pub data: Vec<u8>,
}

impl Texture {
    pub fn new(width: u32, height: u32, components: u32, data: Vec<u8>) -> Self {
        Self { width, height, components, data }
    }

    /// Byte size implied by the dimensions, `None` if it does not fit in `usize`
    pub fn expected_size(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.components as usize)
    }

    /// Actual pixel buffer size
    pub fn data_size(&self) -> usize {
        self.data.len()
    }

    /// Check that dimensions and pixel buffer agree
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 || self.components == 0 {
            return Err(Error::InvalidResource(format!(
                "Texture has empty dimensions {}x{}x{}",
                self.width, self.height, self.components
            )));
        }
        let expected = self.expected_size().ok_or_else(|| Error::InvalidResource(format!(
            "Texture dimensions {}x{}x{} overflow",
            self.width, self.height, self.components
        )))?;
        if self.data.len() != expected {
            return Err(Error::SizeMismatch { expected, actual: self.data.len() });
        }
        Ok(())
    }
}
