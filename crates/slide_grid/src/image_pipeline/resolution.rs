//! Horizontal resolution lookup from image headers.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use image::ImageFormat;

const INCHES_PER_METER: f32 = 39.370_08;
const CM_PER_INCH: f32 = 2.54;

/// Reads the horizontal resolution in dots per inch, if the file declares one.
///
/// Only the header is read. Unknown formats and missing metadata both yield `None`.
pub fn read_dpi(path: &Path, format: ImageFormat) -> Option<f32> {
    let file = File::open(path).ok()?;
    match format {
        ImageFormat::Png => png_dpi(BufReader::new(file)),
        ImageFormat::Jpeg => {
            let mut header = [0u8; 18];
            let mut reader = BufReader::new(file);
            reader.read_exact(&mut header).ok()?;
            jfif_dpi(&header)
        },
        _ => None,
    }
}

/// Resolution from a PNG `pHYs` chunk.
pub fn png_dpi<R: Read>(reader: R) -> Option<f32> {
    let reader = png::Decoder::new(reader).read_info().ok()?;
    let dims = reader.info().pixel_dims?;
    match dims.unit {
        png::Unit::Meter => Some(dims.xppu as f32 / INCHES_PER_METER),
        png::Unit::Unspecified => None,
    }
}

/// Resolution from a JFIF APP0 segment at the start of a JPEG stream.
pub fn jfif_dpi(header: &[u8]) -> Option<f32> {
    if header.len() < 18 || header[..4] != [0xFF, 0xD8, 0xFF, 0xE0] || &header[6..11] != b"JFIF\0" {
        return None;
    }

    let density = f32::from(u16::from_be_bytes([header[14], header[15]]));
    match header[13] {
        1 => Some(density),
        2 => Some(density * CM_PER_INCH),
        // 0 only describes pixel aspect ratio.
        _ => None,
    }
}
