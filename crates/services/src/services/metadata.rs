use std::io::Cursor;

use chrono::{DateTime, NaiveDateTime, Utc};
use exif::{In, Tag, Value};
use image::ImageReader;

/// Fields pulled out of a photo's EXIF block. Every field is optional
/// because consumer cameras and messaging apps strip metadata freely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoMetadata {
    pub taken_at: Option<DateTime<Utc>>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,
    pub exposure_time: Option<String>,
    pub f_number: Option<f64>,
    pub iso: Option<u32>,
}

#[derive(Clone, Default)]
pub struct MetadataService;

impl MetadataService {
    pub fn new() -> Self {
        Self
    }

    /// Parses EXIF out of raw image bytes. Returns `None` when the file has
    /// no readable EXIF block; individual fields are `None` when absent.
    pub fn extract(&self, bytes: &[u8]) -> Option<PhotoMetadata> {
        let exif = match exif::Reader::new().read_from_container(&mut Cursor::new(bytes)) {
            Ok(exif) => exif,
            Err(err) => {
                tracing::debug!("No EXIF data: {}", err);
                return None;
            }
        };

        let mut meta = PhotoMetadata {
            taken_at: extract_taken_at(&exif),
            ..Default::default()
        };

        // Dimensions only count when both axes are present.
        let width = extract_u32(&exif, Tag::PixelXDimension)
            .or_else(|| extract_u32(&exif, Tag::ImageWidth));
        let height = extract_u32(&exif, Tag::PixelYDimension)
            .or_else(|| extract_u32(&exif, Tag::ImageLength));
        if let (Some(w), Some(h)) = (width, height) {
            meta.width = Some(w);
            meta.height = Some(h);
        }

        meta.camera_make = extract_string(&exif, Tag::Make);
        meta.camera_model = extract_string(&exif, Tag::Model);
        meta.exposure_time = exif
            .get_field(Tag::ExposureTime, In::PRIMARY)
            .map(|f| f.display_value().to_string());
        meta.f_number = extract_rational(&exif, Tag::FNumber);
        meta.iso = extract_u32(&exif, Tag::PhotographicSensitivity);

        Some(meta)
    }

    /// Decodes just the image header to recover pixel dimensions when EXIF
    /// has none. Returns `None` for formats the decoder does not recognize.
    pub fn probe_dimensions(&self, bytes: &[u8]) -> Option<(u32, u32)> {
        ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .ok()?
            .into_dimensions()
            .ok()
    }
}

/// Capture timestamp, preferring the moment the shutter fired over
/// later edit or digitization times.
fn extract_taken_at(exif: &exif::Exif) -> Option<DateTime<Utc>> {
    [Tag::DateTimeOriginal, Tag::DateTime, Tag::DateTimeDigitized]
        .iter()
        .find_map(|&tag| {
            let field = exif.get_field(tag, In::PRIMARY)?;
            parse_exif_datetime(&field.value)
        })
}

fn parse_exif_datetime(value: &Value) -> Option<DateTime<Utc>> {
    let Value::Ascii(blocks) = value else {
        return None;
    };
    let raw = blocks.first()?;
    let text = std::str::from_utf8(raw).ok()?;
    NaiveDateTime::parse_from_str(text.trim(), "%Y:%m:%d %H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc())
}

fn extract_u32(exif: &exif::Exif, tag: Tag) -> Option<u32> {
    exif.get_field(tag, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
}

fn extract_rational(exif: &exif::Exif, tag: Tag) -> Option<f64> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match field.value {
        Value::Rational(ref rationals) => rationals.first().map(|r| r.to_f64()),
        _ => None,
    }
}

fn extract_string(exif: &exif::Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let text = field
        .display_value()
        .to_string()
        .trim_matches('"')
        .trim()
        .to_string();
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use image::{ImageFormat, RgbImage};

    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn garbage_bytes_have_no_metadata() {
        let svc = MetadataService::new();
        assert_eq!(svc.extract(b"not an image at all"), None);
        assert_eq!(svc.extract(&[]), None);
    }

    #[test]
    fn plain_png_has_no_exif_but_probes_dimensions() {
        let svc = MetadataService::new();
        let bytes = png_bytes(64, 48);

        // PNGs written by the encoder carry no EXIF chunk.
        assert_eq!(svc.extract(&bytes), None);
        assert_eq!(svc.probe_dimensions(&bytes), Some((64, 48)));
    }

    #[test]
    fn probe_rejects_non_images() {
        let svc = MetadataService::new();
        assert_eq!(svc.probe_dimensions(b"<html></html>"), None);
    }

    #[test]
    fn exif_datetime_format_parses() {
        let value = Value::Ascii(vec![b"2023:07:14 16:02:55".to_vec()]);
        let parsed = parse_exif_datetime(&value).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2023-07-14T16:02:55+00:00");
    }

    #[test]
    fn malformed_datetime_is_ignored() {
        let value = Value::Ascii(vec![b"not a timestamp".to_vec()]);
        assert_eq!(parse_exif_datetime(&value), None);
        assert_eq!(parse_exif_datetime(&Value::Ascii(vec![])), None);
    }
}
