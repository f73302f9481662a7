//! Decoding of ingested image files with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{DecodeError, Orientation, Raster};

/// Decode an image file from bytes, applying EXIF orientation correction.
///
/// The format is guessed from the content (JPEG, PNG, WEBP, GIF, BMP). The
/// result is always RGBA8 so images with and without alpha share one
/// pipeline.
///
/// # Errors
///
/// Returns `DecodeError::Empty` for empty input, `DecodeError::InvalidFormat`
/// when the format cannot be recognized and `DecodeError::CorruptedFile`
/// when the decoder fails.
pub fn decode_image(bytes: &[u8]) -> Result<Raster, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let orientation = extract_orientation(bytes);
    let img = decode_dynamic(bytes)?;
    let img = apply_orientation(img, orientation);

    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(DecodeError::ZeroSize { width, height });
    }

    Ok(Raster::from_rgba_image(img.into_rgba8()))
}

fn decode_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    let Ok(exif) = Reader::new().read_from_container(&mut cursor) else {
        return Orientation::Normal;
    };
    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageEncoder};

    fn png_bytes(width: u32, height: u32, rgba: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(rgba, width, height, ExtendedColorType::Rgba8)
            .unwrap();
        out
    }

    #[test]
    fn test_decode_png_keeps_alpha() {
        let rgba = [255, 0, 0, 128, 0, 255, 0, 255];
        let raster = decode_image(&png_bytes(2, 1, &rgba)).unwrap();

        assert_eq!(raster.width, 2);
        assert_eq!(raster.height, 1);
        assert_eq!(raster.pixels, rgba.to_vec());
    }

    #[test]
    fn test_decode_jpeg_is_opaque() {
        let mut out = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, 90)
            .write_image(&[128u8; 4 * 4 * 3], 4, 4, ExtendedColorType::Rgb8)
            .unwrap();

        let raster = decode_image(&out).unwrap();
        assert_eq!((raster.width, raster.height), (4, 4));
        assert!(raster.pixels.chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(matches!(decode_image(&[]), Err(DecodeError::Empty)));
    }

    #[test]
    fn test_decode_unknown_format() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_truncated_png() {
        let bytes = png_bytes(8, 8, &[9u8; 8 * 8 * 4]);
        let result = decode_image(&bytes[..24]);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_orientation_without_exif() {
        let bytes = png_bytes(1, 1, &[1, 2, 3, 4]);
        assert_eq!(extract_orientation(&bytes), Orientation::Normal);
    }

    /// APP1 segment carrying a big-endian TIFF header with one Orientation entry.
    fn exif_segment(orientation: u16) -> Vec<u8> {
        let mut tiff = vec![b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08];
        tiff.extend_from_slice(&[0x00, 0x01]);
        tiff.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
        tiff.extend_from_slice(&orientation.to_be_bytes());
        tiff.extend_from_slice(&[0x00, 0x00]);
        tiff.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        let mut payload = b"Exif\0\0".to_vec();
        payload.extend_from_slice(&tiff);

        let mut segment = vec![0xFF, 0xE1];
        segment.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
        segment.extend_from_slice(&payload);
        segment
    }

    /// 16x8 JPEG, left half black and right half white, tagged with `orientation`.
    fn oriented_jpeg(orientation: u16) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(16 * 8 * 3);
        for _y in 0..8 {
            for x in 0..16 {
                let v = if x < 8 { 0 } else { 255 };
                rgb.extend_from_slice(&[v, v, v]);
            }
        }
        let mut jpeg = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, 95)
            .write_image(&rgb, 16, 8, ExtendedColorType::Rgb8)
            .unwrap();

        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&exif_segment(orientation));
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn test_extract_orientation_from_jpeg() {
        assert_eq!(extract_orientation(&oriented_jpeg(6)), Orientation::Rotate90CW);
        assert_eq!(extract_orientation(&oriented_jpeg(3)), Orientation::Rotate180);
        assert_eq!(extract_orientation(&oriented_jpeg(1)), Orientation::Normal);
    }

    #[test]
    fn test_decode_applies_rotate_90() {
        let raster = decode_image(&oriented_jpeg(6)).unwrap();
        assert_eq!((raster.width, raster.height), (8, 16));

        // The left (black) half ends up on top after a clockwise turn.
        assert!(raster.pixel(4, 3)[0] < 64);
        assert!(raster.pixel(4, 12)[0] > 192);
    }

    #[test]
    fn test_decode_applies_rotate_180() {
        let raster = decode_image(&oriented_jpeg(3)).unwrap();
        assert_eq!((raster.width, raster.height), (16, 8));
        assert!(raster.pixel(3, 4)[0] > 192);
        assert!(raster.pixel(12, 4)[0] < 64);
    }

    #[test]
    fn test_decode_applies_rotate_270() {
        let raster = decode_image(&oriented_jpeg(8)).unwrap();
        assert_eq!((raster.width, raster.height), (8, 16));
        assert!(raster.pixel(4, 3)[0] > 192);
        assert!(raster.pixel(4, 12)[0] < 64);
    }

    #[test]
    fn test_apply_orientation_mirrors() {
        let mut img = image::RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        let img = DynamicImage::ImageRgba8(img);

        let flipped = apply_orientation(img.clone(), Orientation::FlipHorizontal).into_rgba8();
        assert_eq!(flipped.get_pixel(1, 0).0, [255, 0, 0, 255]);

        let transposed = apply_orientation(img, Orientation::Transpose).into_rgba8();
        assert_eq!(transposed.dimensions(), (1, 2));
        assert_eq!(transposed.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }
}
