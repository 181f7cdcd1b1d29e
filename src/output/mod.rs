mod format;
mod json;

pub use format::save_page_image;
pub use json::write_json;

/// File name of a page image: `<base>.png` for a single page,
/// `<base>_<index>.png` when there are several
pub fn page_png_filename(base_name: &str, index: usize, total: usize) -> String {
    if total == 1 {
        format!("{}.png", base_name)
    } else {
        format!("{}_{}.png", base_name, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_png_filename() {
        assert_eq!(page_png_filename("atlas", 0, 1), "atlas.png");
        assert_eq!(page_png_filename("atlas", 0, 3), "atlas_0.png");
        assert_eq!(page_png_filename("ui", 2, 3), "ui_2.png");
    }
}
