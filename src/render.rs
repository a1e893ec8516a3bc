use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::models::{DrawInstruction, Region};

const ANNOTATION_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Burn detection boxes into an RGB copy of the image.
///
/// Labels travel with the instructions for renderers that can draw text; this
/// layer only outlines the boxes.
pub fn annotate_boxes(img: &DynamicImage, instructions: &[DrawInstruction]) -> RgbImage {
    let mut canvas = img.to_rgb8();
    for instruction in instructions {
        let bbox = &instruction.bbox;
        if !bbox.is_valid() {
            continue;
        }
        let rect = Rect::at(bbox.x_min as i32, bbox.y_min as i32)
            .of_size(bbox.pixel_width(), bbox.pixel_height());
        draw_hollow_rect_mut(&mut canvas, rect, ANNOTATION_COLOR);
    }
    canvas
}

/// Paint the outline of each labeled region onto an RGB copy of the image:
/// foreground pixels of the binary mask that touch background within the
/// region's extent.
pub fn outline_regions(img: &DynamicImage, binary: &GrayImage, regions: &[Region]) -> RgbImage {
    let mut canvas = img.to_rgb8();
    let (width, height) = binary.dimensions();

    for region in regions {
        for y in region.min_y..=region.max_y {
            for x in region.min_x..=region.max_x {
                if binary.get_pixel(x, y)[0] == 0 {
                    continue;
                }
                let on_border = x == 0
                    || y == 0
                    || x + 1 >= width
                    || y + 1 >= height
                    || binary.get_pixel(x - 1, y)[0] == 0
                    || binary.get_pixel(x + 1, y)[0] == 0
                    || binary.get_pixel(x, y - 1)[0] == 0
                    || binary.get_pixel(x, y + 1)[0] == 0;
                if on_border && x < canvas.width() && y < canvas.height() {
                    canvas.put_pixel(x, y, ANNOTATION_COLOR);
                }
            }
        }
    }

    canvas
}
