use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use exif::{Exif, Field, In, Tag, Value};
use serde::Serialize;

use crate::error::{Error, Result};

pub const NO_METADATA_MESSAGE: &str = "The file does not contain any metadata.";

/// Every tag found in a file, rendered as `"<tag> : <value>"` lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MetadataListing {
    Tags(Vec<String>),
    Empty,
}

impl MetadataListing {
    pub fn lines(&self) -> &[String] {
        match self {
            MetadataListing::Tags(lines) => lines,
            MetadataListing::Empty => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, MetadataListing::Empty)
    }
}

impl fmt::Display for MetadataListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataListing::Tags(lines) => f.write_str(&lines.join("\n")),
            MetadataListing::Empty => f.write_str(NO_METADATA_MESSAGE),
        }
    }
}

/// The six EXIF fields the gallery shows and sorts by.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageMetadata {
    pub date_time_original: Option<String>,
    pub model: Option<String>,
    pub exposure_time: Option<f64>,
    pub f_number: Option<f64>,
    pub iso_speed_ratings: Option<u32>,
    pub lens_model: Option<String>,
    /// Selection state for rendering only.
    pub visible: bool,
}

impl Default for ImageMetadata {
    fn default() -> Self {
        Self {
            date_time_original: None,
            model: None,
            exposure_time: None,
            f_number: None,
            iso_speed_ratings: None,
            lens_model: None,
            visible: true,
        }
    }
}

impl ImageMetadata {
    /// Read the recognized fields from an image file. Fields the file does
    /// not carry stay `None`; only an unreadable image is an error.
    pub fn from_image_path(path: &Path) -> Result<Self> {
        let Some(exif) = read_exif(path)? else {
            return Ok(Self::default());
        };

        Ok(Self {
            // The capture time is taken from IFD0 `DateTime`, kept in raw EXIF form.
            date_time_original: primary(&exif, Tag::DateTime).and_then(ascii_value),
            model: primary(&exif, Tag::Model).and_then(ascii_value),
            exposure_time: primary(&exif, Tag::ExposureTime).and_then(rational_value),
            f_number: primary(&exif, Tag::FNumber).and_then(rational_value),
            iso_speed_ratings: primary(&exif, Tag::PhotographicSensitivity).and_then(int_value),
            lens_model: primary(&exif, Tag::LensModel).and_then(ascii_value),
            visible: true,
        })
    }

    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// List every tag of the primary image (IFD0 with its Exif and GPS sub-IFDs).
pub fn metadata_listing(path: &Path) -> Result<MetadataListing> {
    let Some(exif) = read_exif(path)? else {
        return Ok(MetadataListing::Empty);
    };

    let lines: Vec<String> = exif
        .fields()
        .filter(|field| field.ifd_num == In::PRIMARY)
        .map(|field| format!("{} : {}", tag_name(field.tag), render_value(field, &exif)))
        .collect();

    if lines.is_empty() {
        return Ok(MetadataListing::Empty);
    }
    Ok(MetadataListing::Tags(lines))
}

/// Open the file as an image and parse its EXIF block.
/// `Ok(None)` means the image is fine but carries no usable tag block.
fn read_exif(path: &Path) -> Result<Option<Exif>> {
    image::image_dimensions(path).map_err(|source| Error::ImageRead {
        path: path.to_path_buf(),
        source,
    })?;

    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => Ok(Some(exif)),
        Err(exif::Error::Io(err)) => Err(Error::Io(err)),
        Err(exif::Error::NotFound(_)) | Err(exif::Error::NotSupported(_)) => {
            tracing::debug!(path = %path.display(), "no EXIF block");
            Ok(None)
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring malformed EXIF block");
            Ok(None)
        }
    }
}

fn primary(exif: &Exif, tag: Tag) -> Option<&Field> {
    exif.get_field(tag, In::PRIMARY)
}

fn tag_name(tag: Tag) -> String {
    if tag.description().is_some() {
        tag.to_string()
    } else {
        tag.number().to_string()
    }
}

fn render_value(field: &Field, exif: &Exif) -> String {
    match ascii_value(field) {
        Some(text) => text,
        None => field.display_value().with_unit(exif).to_string(),
    }
}

fn ascii_value(field: &Field) -> Option<String> {
    match &field.value {
        Value::Ascii(parts) => {
            let joined = parts
                .iter()
                .map(|part| String::from_utf8_lossy(part).trim_end_matches('\0').to_string())
                .collect::<Vec<_>>()
                .join(", ");
            Some(joined.trim().to_string())
        }
        _ => None,
    }
}

fn rational_value(field: &Field) -> Option<f64> {
    match &field.value {
        Value::Rational(values) => values.first().map(|r| r.to_f64()),
        Value::SRational(values) => values.first().map(|r| r.to_f64()),
        _ => None,
    }
}

fn int_value(field: &Field) -> Option<u32> {
    match &field.value {
        Value::Short(values) => values.first().map(|&v| v as u32),
        Value::Long(values) => values.first().copied(),
        _ => None,
    }
}
