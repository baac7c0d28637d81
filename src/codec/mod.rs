// In: src/codec/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Codec Adapter
// ====================================================================================
//
// The codec layer is the only part of the crate that talks to image file formats.
// The numeric kernels never see encoded bytes, and the pipeline never sees a
// concrete encoder type.
//
//   1. [load]   path -> `SourceImage` (8-bit samples as an (h, w, c) array, c in {1, 3})
//   2. [encode] (h, w, c) f64 reconstruction -> `QuantizedImage` (clipped u8)
//               -> bytes in memory, or one write to the destination file
//
// ====================================================================================
pub mod encode;
pub mod load;

pub use encode::{encode_into, encode_to_vec, Destination, QuantizedImage};
pub use load::{load_image, SourceImage};
