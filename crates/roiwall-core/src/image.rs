use crate::error::EngineError;

/// Maximum addressable texture coordinates of a source texture.
///
/// Hosts often back a non-power-of-two image with power-of-two storage; the
/// logical image then ends at `(s, t) < (1, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexCoordMax {
    pub s: f32,
    pub t: f32,
}

impl Default for TexCoordMax {
    fn default() -> Self {
        Self { s: 1.0, t: 1.0 }
    }
}

/// A host-owned texture borrowed for one composite call.
///
/// `T` is the backend's texture handle type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceImage<T> {
    pub texture: T,
    pub width: u32,
    pub height: u32,
    /// Width of the backing storage; 0 means "same as `width`".
    pub hardware_width: u32,
    /// Height of the backing storage; 0 means "same as `height`".
    pub hardware_height: u32,
}

impl<T> SourceImage<T> {
    /// An image whose storage exactly matches its logical size.
    pub fn new(texture: T, width: u32, height: u32) -> Self {
        Self {
            texture,
            width,
            height,
            hardware_width: 0,
            hardware_height: 0,
        }
    }

    pub fn with_storage(mut self, hardware_width: u32, hardware_height: u32) -> Self {
        self.hardware_width = hardware_width;
        self.hardware_height = hardware_height;
        self
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let storage_too_small = (self.hardware_width != 0 && self.hardware_width < self.width)
            || (self.hardware_height != 0 && self.hardware_height < self.height);
        if self.width == 0 || self.height == 0 || storage_too_small {
            return Err(EngineError::InvalidImage {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// `(width / hardware_width, height / hardware_height)`.
    pub fn max_coords(&self) -> TexCoordMax {
        let ratio = |logical: u32, storage: u32| {
            if storage == 0 {
                1.0
            } else {
                logical as f32 / storage as f32
            }
        };
        TexCoordMax {
            s: ratio(self.width, self.hardware_width),
            t: ratio(self.height, self.hardware_height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_storage_shrinks_max_coords() {
        let img = SourceImage::new(7u32, 1920, 1080).with_storage(2048, 2048);
        let m = img.max_coords();
        assert_eq!(m.s, 1920.0 / 2048.0);
        assert_eq!(m.t, 1080.0 / 2048.0);
    }

    #[test]
    fn unpadded_storage_is_unit() {
        assert_eq!(SourceImage::new(1u32, 640, 360).max_coords(), TexCoordMax::default());
    }

    #[test]
    fn zero_sized_image_is_invalid() {
        let err = SourceImage::new(1u32, 0, 360).validate().expect_err("zero width");
        assert!(matches!(err, EngineError::InvalidImage { width: 0, height: 360 }));
        assert!(SourceImage::new(1u32, 640, 0).validate().is_err());
    }

    #[test]
    fn storage_smaller_than_image_is_invalid() {
        assert!(SourceImage::new(1u32, 640, 360)
            .with_storage(512, 512)
            .validate()
            .is_err());
    }
}
