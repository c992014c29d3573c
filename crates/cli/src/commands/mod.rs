pub mod catalogs;
pub mod images;

use gallery_core::domain::{Notice, NoticeLevel};

/// Print request notices the way the web page would flash them.
pub(crate) fn print_notices(notices: &[Notice]) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Success => println!("✓ {notice}"),
            NoticeLevel::Info => println!("{notice}"),
        }
    }
}
