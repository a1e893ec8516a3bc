use image::{GrayImage, Luma};
use imageproc::region_labelling::{Connectivity, connected_components};
use std::collections::HashMap;

use crate::models::Region;

/// Label connected foreground regions in a binary image and keep those with
/// at least `min_area` foreground pixels.
pub fn find_regions(binary: &GrayImage, min_area: u32) -> Vec<Region> {
    let labeled = connected_components(binary, Connectivity::Eight, Luma([0u8]));

    let mut extents: HashMap<u32, Region> = HashMap::new();
    for (x, y, label) in labeled.enumerate_pixels() {
        let label = label[0];
        if label == 0 {
            continue; // background
        }

        extents
            .entry(label)
            .and_modify(|region| {
                region.min_x = region.min_x.min(x);
                region.min_y = region.min_y.min(y);
                region.max_x = region.max_x.max(x);
                region.max_y = region.max_y.max(y);
                region.pixel_count += 1;
            })
            .or_insert(Region {
                label,
                min_x: x,
                min_y: y,
                max_x: x,
                max_y: y,
                pixel_count: 1,
            });
    }

    let mut regions: Vec<Region> = extents
        .into_values()
        .filter(|region| region.pixel_count >= min_area)
        .collect();
    // HashMap iteration order is arbitrary; keep callers and annotations
    // deterministic.
    regions.sort_by_key(|region| region.label);
    regions
}
