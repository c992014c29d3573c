use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use gallery_core::actions::DELETE_VALUE;
use gallery_core::domain::{FormData, RequestContext, UploadedFile, UserId};
use gallery_core::handlers::{CATALOG_SELECT_FIELD, SORT_FIELD, UPLOAD_FIELD};
use gallery_core::view::{ViewEntry, SELECT_FIELD, SHOW_FIELD};
use gallery_core::Gallery;

use super::print_notices;

pub fn upload(
    gallery: &Gallery,
    user: UserId,
    file: &Path,
    name: String,
    catalog: String,
    description: String,
) -> Result<()> {
    let bytes =
        std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let form = FormData::new()
        .with(UPLOAD_FIELD, "1")
        .with("name", name)
        .with("catalog", catalog)
        .with("description", description);
    let ctx = RequestContext::post(user, form).with_upload(UploadedFile { file_name, bytes });

    let page = gallery.upload(&ctx)?;
    print_notices(&page.notices);
    if let Some(image) = page.uploaded {
        println!("  #{} {} -> {}", image.id, image.name, image.file.display());
    }
    Ok(())
}

pub fn ls(
    gallery: &Gallery,
    user: UserId,
    catalog: &str,
    sort: Option<&str>,
    show: &[String],
    json: bool,
) -> Result<()> {
    let mut form = FormData::new().with(CATALOG_SELECT_FIELD, catalog);
    if show.is_empty() {
        form.push(SELECT_FIELD, "1");
    }
    for name in show {
        form.push(SHOW_FIELD, name.as_str());
    }
    if let Some(label) = sort {
        form.push(SORT_FIELD, label);
    }

    let page = gallery.browse(&RequestContext::post(user, form))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&page.entries)?);
        return Ok(());
    }

    print_notices(&page.notices);

    if page.entries.is_empty() {
        println!("No images in {}.", page.selected);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID"),
        Cell::new("Name"),
        Cell::new("Date"),
        Cell::new("Model"),
        Cell::new("Exposure"),
        Cell::new("F"),
        Cell::new("ISO"),
        Cell::new("Lens"),
        Cell::new("Shown"),
    ]);

    for entry in &page.entries {
        add_entry_row(&mut table, entry);
    }

    println!();
    println!("  {}", page.selected);
    println!("{table}");
    println!();
    println!("  {} image(s)", page.entries.len());
    println!();

    Ok(())
}

fn add_entry_row(table: &mut Table, entry: &ViewEntry) {
    let meta = &entry.metadata;
    table.add_row(vec![
        Cell::new(entry.image.id),
        Cell::new(&entry.image.name),
        Cell::new(meta.date_time_original.as_deref().unwrap_or("-")),
        Cell::new(meta.model.as_deref().unwrap_or("-")),
        Cell::new(meta.exposure_time.map(format_exposure).unwrap_or_else(|| "-".into())),
        Cell::new(meta.f_number.map(|f| format!("f/{f:.1}")).unwrap_or_else(|| "-".into())),
        Cell::new(meta.iso_speed_ratings.map(|i| i.to_string()).unwrap_or_else(|| "-".into())),
        Cell::new(meta.lens_model.as_deref().unwrap_or("-")),
        Cell::new(if meta.visible { "yes" } else { "" }),
    ]);
}

/// Shutter speeds below a second read better as fractions.
fn format_exposure(seconds: f64) -> String {
    if seconds > 0.0 && seconds < 1.0 {
        format!("1/{:.0}", 1.0 / seconds)
    } else {
        format!("{seconds}s")
    }
}

pub fn rm(gallery: &Gallery, user: UserId, id: i64) -> Result<()> {
    let form = FormData::new().with(id.to_string(), DELETE_VALUE);
    let page = gallery.browse(&RequestContext::post(user, form))?;
    print_notices(&page.notices);
    Ok(())
}

pub fn exif(gallery: &Gallery, user: UserId, id: i64) -> Result<()> {
    let details = gallery.image_details(user, id)?;

    println!("{} ({})", details.image.name, details.image.file.display());
    println!("{}", "-".repeat(60));
    println!("{}", details.listing);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_exposure_uses_fractions_below_one_second() {
        assert_eq!(format_exposure(0.0025), "1/400");
        assert_eq!(format_exposure(2.0), "2s");
    }
}
