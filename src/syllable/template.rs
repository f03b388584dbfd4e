//! Serialized template decoding.
//!
//! A persisted spectrogram template is a flat sequence of little endian
//! IEEE 754 32 bit floats, row major, `length` rows of `features` values,
//! with no header. Reading the bytes from disk is the host's concern; this
//! module only decodes them.

use alloc::vec::Vec;

use crate::error::Error;

/// Decodes a raw template dump into a flat row major feature buffer.
/// The byte length must be a positive multiple of `features * 4`.
pub fn spectrogram_from_bytes(bytes: &[u8], features: usize) -> Result<Vec<f32>, Error> {
    if features == 0 {
        return Err(Error::InvalidTemplate);
    }
    let row_size = features * core::mem::size_of::<f32>();
    if bytes.is_empty() || bytes.len() % row_size != 0 {
        return Err(Error::MalformedTemplateFile);
    }
    let mut values = Vec::with_capacity(bytes.len() / core::mem::size_of::<f32>());
    for chunk in bytes.chunks_exact(core::mem::size_of::<f32>()) {
        values.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    Ok(values)
}
