use anyhow::Result;
use gallery_core::domain::{FormData, RequestContext, UserId};
use gallery_core::handlers::{
    ADD_CATALOG_FIELD, CATALOG_NAME_FIELD, CATALOG_SELECT_FIELD, DELETE_CATALOG_FIELD,
};
use gallery_core::Gallery;

use super::print_notices;

pub fn list(gallery: &Gallery, user: UserId) -> Result<()> {
    let names = gallery.catalog_names(user)?;

    if names.is_empty() {
        println!("No catalogs. Use `gallery catalogs add <NAME>` to create one.");
        return Ok(());
    }

    for name in &names {
        println!("{name}");
    }
    println!();
    println!("{} catalog(s)", names.len());

    Ok(())
}

pub fn add(gallery: &Gallery, user: UserId, name: &str) -> Result<()> {
    let form = FormData::new()
        .with(ADD_CATALOG_FIELD, "1")
        .with(CATALOG_NAME_FIELD, name);
    let page = gallery.upload(&RequestContext::post(user, form))?;
    print_notices(&page.notices);
    Ok(())
}

pub fn rm(gallery: &Gallery, user: UserId, name: &str) -> Result<()> {
    let form = FormData::new()
        .with(CATALOG_SELECT_FIELD, name)
        .with(DELETE_CATALOG_FIELD, "1");
    let page = gallery.browse(&RequestContext::post(user, form))?;
    print_notices(&page.notices);
    Ok(())
}
