//! # rechroma
//!
//! Automatic colorization of black-and-white photographs with a
//! pretrained ONNX network.
//!
//! The network predicts only the chrominance of an image: the source is
//! converted to CIE L\*a\*b\*, the lightness channel is fed through the
//! graph at a fixed 224x224 resolution, and the predicted a/b planes are
//! upsampled and recombined with the original full-resolution lightness.
//! Output dimensions always equal input dimensions.
//!
//! ## Example
//!
//! ```no_run
//! use rechroma::{Config, Session};
//!
//! # fn main() -> rechroma::Result<()> {
//! let mut session = Session::new(Config::default())?;
//!
//! session.open("old_photo.jpg")?;
//! session.colorize()?;
//! let saved = session.save()?;
//! println!("wrote {}", saved.display());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod image;
pub mod model;
pub mod pipeline;
pub mod session;

pub use error::{Error, Result};
pub use pipeline::Colorizer;
pub use session::{Config, Session};
