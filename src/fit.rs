use image::{RgbImage, imageops};

use crate::frame::{Frame, FrameSize};

/// Uniformly scale `src` to fit inside `frame` and center it on a black
/// canvas of exactly `frame` dimensions (letterbox/pillarbox).
///
/// Scaled dimensions are truncated and centering offsets use floor division,
/// so an odd residual leaves the extra pixel of padding on the bottom/right.
/// Consumers rely on pixel-exact output, so this rounding is deliberate.
///
/// A zero-dimension `src` is a decoder contract violation and is not
/// defended against here.
pub fn fit_to_frame(src: &RgbImage, frame: FrameSize) -> Frame {
    let (src_w, src_h) = src.dimensions();
    let img_aspect = f64::from(src_w) / f64::from(src_h);
    let frame_aspect = frame.aspect();

    let (new_w, new_h) = if img_aspect > frame_aspect {
        // Image is relatively wider than the frame: fit to width.
        (frame.width, (f64::from(frame.width) / img_aspect) as u32)
    } else {
        // Fit to height.
        ((f64::from(frame.height) * img_aspect) as u32, frame.height)
    };

    let resized = imageops::resize(src, new_w, new_h, imageops::FilterType::Triangle);

    let mut canvas = RgbImage::new(frame.width, frame.height);
    let x_offset = (frame.width - new_w) / 2;
    let y_offset = (frame.height - new_h) / 2;
    imageops::replace(&mut canvas, &resized, i64::from(x_offset), i64::from(y_offset));

    Frame::from(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_rgb(width: u32, height: u32, rgb: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(width, height, image::Rgb(rgb))
    }

    #[test]
    fn wider_image_is_letterboxed_to_frame_size() {
        let frame = FrameSize::new(100, 100);
        let out = fit_to_frame(&solid_rgb(200, 100, [255, 0, 0]), frame);
        assert_eq!(out.size(), frame);

        // 2:1 source in a square frame: content is 100x50, vertically centered.
        assert_eq!(out.pixel(0, 0), [0, 0, 0]);
        assert_eq!(out.pixel(0, 99), [0, 0, 0]);
        assert_eq!(out.pixel(50, 50), [255, 0, 0]);
    }

    #[test]
    fn taller_image_is_pillarboxed_to_frame_size() {
        let frame = FrameSize::new(100, 100);
        let out = fit_to_frame(&solid_rgb(50, 100, [0, 255, 0]), frame);
        assert_eq!(out.size(), frame);

        // 1:2 source in a square frame: content is 50x100, horizontally centered.
        assert_eq!(out.pixel(0, 50), [0, 0, 0]);
        assert_eq!(out.pixel(99, 50), [0, 0, 0]);
        assert_eq!(out.pixel(50, 50), [0, 255, 0]);
    }

    #[test]
    fn matching_aspect_fills_the_frame() {
        let frame = FrameSize::new(80, 60);
        let out = fit_to_frame(&solid_rgb(160, 120, [9, 9, 9]), frame);
        assert_eq!(out.size(), frame);
        assert_eq!(out.pixel(0, 0), [9, 9, 9]);
        assert_eq!(out.pixel(79, 59), [9, 9, 9]);
    }

    #[test]
    fn centering_pads_within_one_pixel() {
        // 2:1 source into 5x5: content height floors to 2, offset floors to 1,
        // leaving 1 row of padding above and 2 below.
        let frame = FrameSize::new(5, 5);
        let out = fit_to_frame(&solid_rgb(2, 1, [255, 255, 255]), frame);
        assert_eq!(out.size(), frame);
        assert_eq!(out.pixel(2, 0), [0, 0, 0]);
        assert_eq!(out.pixel(2, 1), [255, 255, 255]);
        assert_eq!(out.pixel(2, 2), [255, 255, 255]);
        assert_eq!(out.pixel(2, 3), [0, 0, 0]);
        assert_eq!(out.pixel(2, 4), [0, 0, 0]);
    }

    #[test]
    fn padding_is_black() {
        let frame = FrameSize::new(10, 10);
        let out = fit_to_frame(&solid_rgb(10, 2, [200, 100, 50]), frame);
        for x in 0..10 {
            assert_eq!(out.pixel(x, 0), [0, 0, 0]);
            assert_eq!(out.pixel(x, 9), [0, 0, 0]);
        }
    }

    #[test]
    fn full_source_remains_visible() {
        // A source with distinct corners keeps all corners inside the canvas.
        let mut src = RgbImage::new(4, 2);
        src.put_pixel(0, 0, image::Rgb([255, 0, 0]));
        src.put_pixel(3, 0, image::Rgb([0, 255, 0]));
        src.put_pixel(0, 1, image::Rgb([0, 0, 255]));
        src.put_pixel(3, 1, image::Rgb([255, 255, 0]));

        let frame = FrameSize::new(8, 8);
        let out = fit_to_frame(&src, frame);
        assert_eq!(out.size(), frame);

        // Content spans the full width (8x4, rows 2..6); the outermost content
        // rows are not black while the padding rows are.
        assert_eq!(out.pixel(4, 0), [0, 0, 0]);
        assert_ne!(out.pixel(0, 2), [0, 0, 0]);
        assert_ne!(out.pixel(7, 5), [0, 0, 0]);
        assert_eq!(out.pixel(4, 7), [0, 0, 0]);
    }
}
