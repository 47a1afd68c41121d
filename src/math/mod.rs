//! Integer geometry and spatial indexing

pub mod parcel;
pub mod morton;

pub use parcel::Parcel;
pub use morton::{encode_signed, decode_signed, encode_unsigned, decode_unsigned};
