//! GLB container framing
//!
//! Chunk layout and header come from [`gltf::binary::Glb`]; this module only
//! pads the chunks to four bytes (JSON with spaces, BIN with zeros) and
//! checks the total against the 32-bit length field.

use std::borrow::Cow;

use gltf::binary::{Glb, Header};
use gltf_json as json;

use crate::error::ExportError;

pub const VERSION: u32 = 2;

const HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

fn padded_len(len: usize) -> usize {
    len.saturating_add(3) & !3
}

/// Total container length for unpadded chunk sizes; `bin_len == 0` omits BIN
pub fn container_len(json_len: usize, bin_len: usize) -> Result<u32, ExportError> {
    let mut total = HEADER_LEN
        .saturating_add(CHUNK_HEADER_LEN)
        .saturating_add(padded_len(json_len));
    if bin_len > 0 {
        total = total.saturating_add(CHUNK_HEADER_LEN).saturating_add(padded_len(bin_len));
    }
    u32::try_from(total).map_err(|_| ExportError::BufferTooLarge(total))
}

fn pad(mut bytes: Vec<u8>, fill: u8) -> Vec<u8> {
    let len = padded_len(bytes.len());
    bytes.resize(len, fill);
    bytes
}

/// Serialize `root` and frame it with `bin` as a GLB file
pub fn to_glb(root: &json::Root, bin: Vec<u8>) -> Result<Vec<u8>, ExportError> {
    let json = json::serialize::to_vec(root)?;
    let length = container_len(json.len(), bin.len())?;
    let glb = Glb {
        header: Header {
            magic: *b"glTF",
            version: VERSION,
            length,
        },
        json: Cow::Owned(pad(json, b' ')),
        bin: (!bin.is_empty()).then(|| Cow::Owned(pad(bin, 0))),
    };
    Ok(glb.to_vec()?)
}
