use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::view::ViewEntry;

/// Field a gallery listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    DateTimeOriginal,
    Model,
    ExposureTime,
    FNumber,
    IsoSpeedRatings,
    LensModel,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::Name,
        SortKey::DateTimeOriginal,
        SortKey::Model,
        SortKey::ExposureTime,
        SortKey::FNumber,
        SortKey::IsoSpeedRatings,
        SortKey::LensModel,
    ];

    /// The label used in forms.
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Name => "Name",
            SortKey::DateTimeOriginal => "DateTimeOriginal",
            SortKey::Model => "Model",
            SortKey::ExposureTime => "ExposureTime",
            SortKey::FNumber => "FNumber",
            SortKey::IsoSpeedRatings => "ISOSpeedRatings",
            SortKey::LensModel => "LensModel",
        }
    }

    /// Compare two entries on this key. Unset metadata sorts before any value.
    pub fn compare(&self, a: &ViewEntry, b: &ViewEntry) -> Ordering {
        let (ma, mb) = (&a.metadata, &b.metadata);
        match self {
            SortKey::Name => a.image.name.cmp(&b.image.name),
            SortKey::DateTimeOriginal => ma.date_time_original.cmp(&mb.date_time_original),
            SortKey::Model => ma.model.cmp(&mb.model),
            SortKey::ExposureTime => cmp_f64(ma.exposure_time, mb.exposure_time),
            SortKey::FNumber => cmp_f64(ma.f_number, mb.f_number),
            SortKey::IsoSpeedRatings => ma.iso_speed_ratings.cmp(&mb.iso_speed_ratings),
            SortKey::LensModel => ma.lens_model.cmp(&mb.lens_model),
        }
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.label() == s)
            .ok_or_else(|| Error::UnknownSortLabel(s.to_string()))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn cmp_f64(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.total_cmp(&y),
    }
}

/// Stable sort of a gallery listing.
pub fn sort_entries(mut entries: Vec<ViewEntry>, key: SortKey) -> Vec<ViewEntry> {
    entries.sort_by(|a, b| key.compare(a, b));
    entries
}

pub fn sort_by_label(entries: Vec<ViewEntry>, label: &str) -> Result<Vec<ViewEntry>> {
    let key: SortKey = label.parse()?;
    Ok(sort_entries(entries, key))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::domain::{Image, UserId};
    use crate::exif::ImageMetadata;

    fn entry(id: i64, name: &str, metadata: ImageMetadata) -> ViewEntry {
        ViewEntry {
            image: Image {
                id,
                user: UserId(1),
                catalog_id: 1,
                name: name.to_string(),
                file: PathBuf::from(format!("images/{name}.jpg")),
                description: String::new(),
                created_at: 0,
            },
            metadata,
        }
    }

    fn names(entries: &[ViewEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.image.name.as_str()).collect()
    }

    #[test]
    fn test_sort_by_name() {
        let entries = vec![
            entry(1, "b", ImageMetadata::default()),
            entry(2, "a", ImageMetadata::default()),
        ];
        let sorted = sort_by_label(entries, "Name").unwrap();
        assert_eq!(names(&sorted), vec!["a", "b"]);
    }

    #[test]
    fn test_unset_sorts_first() {
        let shot = ImageMetadata {
            exposure_time: Some(0.0025),
            ..Default::default()
        };
        let entries = vec![
            entry(1, "set", shot),
            entry(2, "unset", ImageMetadata::default()),
        ];
        let sorted = sort_by_label(entries, "ExposureTime").unwrap();
        assert_eq!(names(&sorted), vec!["unset", "set"]);
    }

    #[test]
    fn test_sort_is_stable() {
        let entries = vec![
            entry(1, "first", ImageMetadata::default()),
            entry(2, "second", ImageMetadata::default()),
            entry(3, "third", ImageMetadata::default()),
        ];
        let sorted = sort_entries(entries, SortKey::Model);
        assert_eq!(names(&sorted), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_sort_by_iso_and_fnumber() {
        let make = |iso: u32, f: f64| ImageMetadata {
            iso_speed_ratings: Some(iso),
            f_number: Some(f),
            ..Default::default()
        };
        let entries = vec![
            entry(1, "a", make(800, 1.8)),
            entry(2, "b", make(100, 8.0)),
            entry(3, "c", make(400, 3.5)),
        ];

        let by_iso = sort_entries(entries.clone(), SortKey::IsoSpeedRatings);
        assert_eq!(names(&by_iso), vec!["b", "c", "a"]);

        let by_f = sort_entries(entries, SortKey::FNumber);
        assert_eq!(names(&by_f), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_sort_by_string_fields() {
        let with = |model: &str, lens: &str, date: &str| ImageMetadata {
            model: Some(model.to_string()),
            lens_model: Some(lens.to_string()),
            date_time_original: Some(date.to_string()),
            ..Default::default()
        };
        let entries = vec![
            entry(1, "a", with("X100V", "Fujinon", "2021:01:01 00:00:00")),
            entry(2, "b", with("Canon EOS 77D", "EF50mm", "2020:08:12 10:32:48")),
        ];

        assert_eq!(names(&sort_entries(entries.clone(), SortKey::Model)), vec!["b", "a"]);
        assert_eq!(names(&sort_entries(entries.clone(), SortKey::LensModel)), vec!["b", "a"]);
        assert_eq!(
            names(&sort_entries(entries, SortKey::DateTimeOriginal)),
            vec!["b", "a"]
        );
    }

    #[test]
    fn test_label_roundtrip() {
        for key in SortKey::ALL {
            assert_eq!(key.label().parse::<SortKey>().unwrap(), key);
        }
        assert_eq!(SortKey::IsoSpeedRatings.to_string(), "ISOSpeedRatings");
    }

    #[test]
    fn test_unknown_label() {
        let err = sort_by_label(Vec::new(), "Size").unwrap_err();
        assert!(matches!(err, Error::UnknownSortLabel(ref l) if l == "Size"));
        assert!("name".parse::<SortKey>().is_err());
    }
}
