//! Decoder for Havok spline-compressed animation blocks.
//!
//! Turns a raw block buffer into per-joint position, rotation and scale curves that can be
//! sampled at arbitrary frame values. Locating the buffer inside a container and composing
//! bone matrices are left to the caller.

#![forbid(unsafe_code)]

mod cursor;
mod decode;
mod error;
mod mask;
mod math;
pub mod nurbs;
mod quantization;
mod track;

pub use cursor::*;
pub use decode::*;
pub use error::*;
pub use mask::*;
pub use math::*;
pub use quantization::*;
pub use track::*;

#[cfg(test)]
mod test_buffer;





#[cfg(test)]
mod track_tests;
