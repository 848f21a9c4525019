//! Image loading, color-space conversion, and saving utilities.

mod lab;
mod load;
mod save;

pub use lab::{lab_to_rgb, lightness_tensor, merge_chrominance, resize_lab, rgb_to_lab};
pub use load::load_image;
pub use save::save_image;

/// Floating-point image holding (L, a, b) per pixel.
/// L is in [0, 100]; a and b are centered on zero.
pub type LabImage = image::Rgb32FImage;

/// Side length of the square network input.
pub const NET_INPUT_SIZE: u32 = 224;
