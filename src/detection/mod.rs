pub mod contours;
pub mod preprocessing;

use image::{DynamicImage, RgbImage};

use crate::models::Region;
use crate::render;

/// Errors from the contour counting path, kept distinct from detector-based
/// failures since the two signals are independent.
#[derive(Debug, thiserror::Error)]
pub enum ContourError {
    #[error("image buffer is empty ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}

/// Output of one counting pass.
#[derive(Debug)]
pub struct LeafCount {
    pub count: usize,
    pub regions: Vec<Region>,
    /// RGB copy of the input with region outlines painted.
    pub annotated: RgbImage,
}

/// Contour-based leaf counter.
///
/// Runs directly on the image with no dependency on the detector, as a
/// cross-check signal. The two counts may legitimately disagree; callers must
/// treat them as distinct signals, never reconcile them automatically.
#[derive(Debug, Clone)]
pub struct LeafCounter {
    pub blur_sigma: f32,
    pub block_radius: u32,
    pub morph_radius: u8,
    pub min_leaf_area: u32,
}

impl LeafCounter {
    pub fn new() -> Self {
        Self {
            blur_sigma: 1.5,
            block_radius: 5,
            morph_radius: 2,
            min_leaf_area: 500,
        }
    }

    /// Count leaf-sized regions in the image.
    ///
    /// Pipeline: grayscale, Gaussian blur, inverted adaptive threshold,
    /// morphological closing to merge fragmented regions, connected-component
    /// labeling, then a minimum-area filter.
    pub fn count(&self, img: &DynamicImage) -> Result<LeafCount, ContourError> {
        let (width, height) = (img.width(), img.height());
        if width == 0 || height == 0 {
            return Err(ContourError::EmptyImage { width, height });
        }

        let gray = preprocessing::to_grayscale(img);
        let blurred = preprocessing::apply_blur(&gray, self.blur_sigma);
        let binary = preprocessing::threshold_foreground(&blurred, self.block_radius);
        let closed = preprocessing::close_regions(&binary, self.morph_radius);
        let regions = contours::find_regions(&closed, self.min_leaf_area);
        let annotated = render::outline_regions(img, &closed, &regions);

        Ok(LeafCount {
            count: regions.len(),
            regions,
            annotated,
        })
    }
}

impl Default for LeafCounter {
    fn default() -> Self {
        Self::new()
    }
}
