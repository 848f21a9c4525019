//! Colorization pipeline: network input preparation, forward inference,
//! and annealed-mean chrominance decoding.

mod colorize;
mod decode;

pub use colorize::Colorizer;
