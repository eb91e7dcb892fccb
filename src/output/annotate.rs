//! Bounding box annotation for prediction images.

use crate::error::{Error, Result};
use crate::output::{BoundingBox, Detection};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::path::Path;

/// Box outline colors, cycled by class index.
const PALETTE: [Rgb<u8>; 10] = [
    Rgb([255, 56, 56]),
    Rgb([255, 157, 151]),
    Rgb([255, 112, 31]),
    Rgb([255, 178, 29]),
    Rgb([72, 249, 10]),
    Rgb([61, 219, 134]),
    Rgb([26, 147, 52]),
    Rgb([0, 212, 187]),
    Rgb([44, 153, 168]),
    Rgb([0, 194, 255]),
];

/// Outline color for a class index.
pub fn class_color(class: usize) -> Rgb<u8> {
    PALETTE[class % PALETTE.len()]
}

/// Outline thickness scaled to image size, at least 2 pixels.
pub fn line_thickness(width: u32, height: u32) -> u32 {
    (width.min(height) / 320).max(2)
}

/// Draw a rectangle outline onto the image, clamped to its bounds.
pub fn draw_box(image: &mut RgbImage, bbox: &BoundingBox, color: Rgb<u8>, thickness: u32) {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return;
    }

    let max_x = (width - 1) as f32;
    let max_y = (height - 1) as f32;
    let x1 = bbox.x1.round().clamp(0.0, max_x) as u32;
    let y1 = bbox.y1.round().clamp(0.0, max_y) as u32;
    let x2 = bbox.x2.round().clamp(0.0, max_x) as u32;
    let y2 = bbox.y2.round().clamp(0.0, max_y) as u32;
    if x2 <= x1 || y2 <= y1 {
        return;
    }

    for t in 0..thickness {
        let top = (y1 + t).min(max_y as u32);
        let bottom = y2.saturating_sub(t).max(y1);
        for x in x1..=x2 {
            image.put_pixel(x, top, color);
            image.put_pixel(x, bottom, color);
        }

        let left = (x1 + t).min(max_x as u32);
        let right = x2.saturating_sub(t).max(x1);
        for y in y1..=y2 {
            image.put_pixel(left, y, color);
            image.put_pixel(right, y, color);
        }
    }
}

/// Render detections onto a copy of the source image.
pub fn annotate(image: &DynamicImage, detections: &[Detection]) -> RgbImage {
    let mut canvas = image.to_rgb8();
    let thickness = line_thickness(canvas.width(), canvas.height());

    for detection in detections {
        draw_box(
            &mut canvas,
            &detection.bbox,
            class_color(detection.class),
            thickness,
        );
    }

    canvas
}

/// Save an annotated image, format determined by the path extension.
pub fn save_annotated(image: &RgbImage, path: &Path) -> Result<()> {
    image.save(path).map_err(|e| Error::ImageWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Encode an annotated image as PNG in memory.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| Error::ImageEncode { source: e })?;

    Ok(buffer)
}
