// Image types accepted by `Photo::add`. Detection only looks at the file
// name suffix; the bytes are never inspected, so a renamed file of another
// format passes as long as its suffix is allowed.

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Jpeg,
    Png,
    Gif,
}

impl ImageType {
    /// Classify `path` by its extension, ignoring case. `None` for any other
    /// extension and for names without one.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageType::Jpeg),
            "png" => Some(ImageType::Png),
            "gif" => Some(ImageType::Gif),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ImageType::Jpeg => "image/jpeg",
            ImageType::Png => "image/png",
            ImageType::Gif => "image/gif",
        }
    }
}
