//! Untyped image buffers: pixel memory described at runtime by a [`Layout`] and a
//! [`Semantics`] descriptor, either owned ([`ImageBuffer`]) or borrowed from the caller
//! ([`ImageView`]).

pub mod buffer;
pub mod layout;
pub mod semantics;

pub use buffer::{ImageBuffer, ImageView, PixelBuffer, RowPointers};
pub use layout::Layout;
pub use semantics::{PixelFormat, SampleFormat, Semantics};
