//! Zlib codec used as the storage encoding for every object.
//!
//! Pure byte-to-byte transforms; no object-format knowledge lives here.
//! Compression writes into a growable sink, so incompressible input can
//! never overflow a fixed-size buffer. Decompression streams through a
//! bounded chunk until the decoder reports end-of-stream, so arbitrarily
//! large payloads never have to fit the chunk.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{StoreError, StoreResult};

/// Size of the intermediate read buffer used during decompression.
const CHUNK: usize = 8 * 1024;

/// Compress bytes into a zlib stream.
pub fn compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    // Writing to a Vec cannot fail.
    encoder.write_all(data).expect("write to in-memory sink");
    encoder.finish().expect("write to in-memory sink")
}

/// Decompress a zlib stream.
///
/// Fails with [`StoreError::CorruptStream`] if `data` is not a valid zlib
/// stream. The source is in memory, so every decoder error is corruption.
pub fn decompress(data: &[u8]) -> StoreResult<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut out = Vec::new();
    let mut chunk = [0u8; CHUNK];
    loop {
        match decoder.read(&mut chunk) {
            Ok(0) => return Ok(out),
            Ok(n) => out.extend_from_slice(&chunk[..n]),
            Err(e) => return Err(StoreError::CorruptStream(e.to_string())),
        }
    }
}
