//! sRGB <-> CIE L*a*b* conversion and channel plumbing.

use image::{imageops, imageops::FilterType, RgbImage};
use ndarray::Array4;
use palette::{IntoColor, Lab, LinSrgb, Srgb};

use super::LabImage;

/// Convert an 8-bit RGB image to floating-point Lab.
///
/// Pixel intensities are normalized to [0, 1] before the color-space
/// conversion, so L lands in [0, 100] and a/b centered on zero.
pub fn rgb_to_lab(img: &RgbImage) -> LabImage {
    let mut lab = LabImage::new(img.width(), img.height());
    for (src, dst) in img.pixels().zip(lab.pixels_mut()) {
        let srgb = Srgb::new(
            f32::from(src[0]) / 255.0,
            f32::from(src[1]) / 255.0,
            f32::from(src[2]) / 255.0,
        );
        let c: Lab = srgb.into_linear().into_color();
        dst.0 = [c.l, c.a, c.b];
    }
    lab
}

/// Convert a floating-point Lab image back to 8-bit RGB.
///
/// Components outside the sRGB gamut are clamped during the 8-bit
/// rescale.
pub fn lab_to_rgb(lab: &LabImage) -> RgbImage {
    let mut img = RgbImage::new(lab.width(), lab.height());
    for (src, dst) in lab.pixels().zip(img.pixels_mut()) {
        let lin: LinSrgb = Lab::new(src[0], src[1], src[2]).into_color();
        let srgb: Srgb<f32> = Srgb::from_linear(lin);
        dst.0 = [to_u8(srgb.red), to_u8(srgb.green), to_u8(srgb.blue)];
    }
    img
}

/// Bilinearly resize a Lab image.
///
/// `imageops::resize` clamps float samples to [0, 1], so each channel is
/// mapped into that range first and back afterwards. Bilinear filtering
/// commutes with the affine map, so channel values are preserved.
pub fn resize_lab(img: &LabImage, width: u32, height: u32) -> LabImage {
    let mut packed = LabImage::new(img.width(), img.height());
    for (src, dst) in img.pixels().zip(packed.pixels_mut()) {
        dst.0 = [
            src[0] / 100.0,
            (src[1] + 128.0) / 256.0,
            (src[2] + 128.0) / 256.0,
        ];
    }

    let resized = imageops::resize(&packed, width, height, FilterType::Triangle);

    let mut out = LabImage::new(width, height);
    for (src, dst) in resized.pixels().zip(out.pixels_mut()) {
        dst.0 = [
            src[0] * 100.0,
            src[1].mul_add(256.0, -128.0),
            src[2].mul_add(256.0, -128.0),
        ];
    }
    out
}

/// Extract the lightness channel as a network input tensor (1, 1, H, W).
pub fn lightness_tensor(lab: &LabImage) -> Array4<f32> {
    let (width, height) = lab.dimensions();
    let mut tensor = Array4::<f32>::zeros((1, 1, height as usize, width as usize));
    for (x, y, px) in lab.enumerate_pixels() {
        tensor[[0, 0, y as usize, x as usize]] = px[0];
    }
    tensor
}

/// Replace the chrominance planes of `lab` with those of `ab`.
///
/// The lightness channel is kept untouched; only the a and b channels
/// are taken from `ab`. Both images must have the same dimensions.
pub fn merge_chrominance(lab: &LabImage, ab: &LabImage) -> LabImage {
    debug_assert_eq!(lab.dimensions(), ab.dimensions());
    let mut merged = lab.clone();
    for (dst, src) in merged.pixels_mut().zip(ab.pixels()) {
        dst[1] = src[1];
        dst[2] = src[2];
    }
    merged
}

/// Rescale a [0, 1] color component to 8-bit with clamping.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn gray_pixels_have_no_chroma() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([128, 128, 128]));
        img.put_pixel(1, 0, Rgb([30, 30, 30]));

        let lab = rgb_to_lab(&img);
        for px in lab.pixels() {
            assert!(px[1].abs() < 0.1, "a = {}", px[1]);
            assert!(px[2].abs() < 0.1, "b = {}", px[2]);
        }
    }

    #[test]
    fn lightness_extremes() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([0, 0, 0]));
        img.put_pixel(1, 0, Rgb([255, 255, 255]));

        let lab = rgb_to_lab(&img);
        assert!(lab.get_pixel(0, 0)[0].abs() < 0.01);
        assert!((lab.get_pixel(1, 0)[0] - 100.0).abs() < 0.01);
    }

    #[test]
    fn round_trip_is_close() {
        let img = RgbImage::from_fn(8, 8, |x, y| {
            Rgb([(x * 30) as u8, (y * 30) as u8, 200])
        });

        let back = lab_to_rgb(&rgb_to_lab(&img));
        for (a, b) in img.pixels().zip(back.pixels()) {
            for c in 0..3 {
                assert!((i16::from(a[c]) - i16::from(b[c])).abs() <= 1);
            }
        }
    }

    #[test]
    fn resize_preserves_constant_planes() {
        let mut img = LabImage::new(9, 5);
        for px in img.pixels_mut() {
            px.0 = [62.0, -40.0, 55.0];
        }

        let resized = resize_lab(&img, 4, 7);
        assert_eq!(resized.dimensions(), (4, 7));
        for px in resized.pixels() {
            assert!((px[0] - 62.0).abs() < 0.01);
            assert!((px[1] + 40.0).abs() < 0.01);
            assert!((px[2] - 55.0).abs() < 0.01);
        }
    }

    #[test]
    fn lightness_tensor_shape_and_values() {
        let lab = rgb_to_lab(&RgbImage::new(4, 3));
        let tensor = lightness_tensor(&lab);
        assert_eq!(tensor.shape(), &[1, 1, 3, 4]);
        assert!(tensor.iter().all(|v| v.abs() < 0.01));
    }

    #[test]
    fn merge_keeps_lightness_and_takes_chroma() {
        let lab = rgb_to_lab(&RgbImage::from_pixel(2, 2, Rgb([90, 120, 40])));
        let mut ab = LabImage::new(2, 2);
        for px in ab.pixels_mut() {
            px.0 = [0.0, 12.5, -7.25];
        }

        let merged = merge_chrominance(&lab, &ab);
        for (m, o) in merged.pixels().zip(lab.pixels()) {
            assert_eq!(m[0], o[0]);
            assert_eq!(m[1], 12.5);
            assert_eq!(m[2], -7.25);
        }
    }
}
