//! Content-type resolution for stored media.
//!
//! Pure suffix lookups, no I/O. The stored extension is a hint taken from the
//! original upload name and is not guaranteed to match the true content, so
//! unknown suffixes fall back to the family default rather than failing.

/// MIME type for a video file name. Case-insensitive suffix match; unknown
/// or absent names default to `video/mp4`.
pub fn video_content_type(filename: Option<&str>) -> &'static str {
    let Some(filename) = filename else {
        return "video/mp4";
    };
    let name = filename.to_lowercase();
    if name.ends_with(".webm") {
        "video/webm"
    } else if name.ends_with(".ogg") {
        "video/ogg"
    } else if name.ends_with(".mkv") {
        "video/x-matroska"
    } else if name.ends_with(".avi") {
        "video/x-msvideo"
    } else if name.ends_with(".mov") {
        "video/quicktime"
    } else if name.ends_with(".flv") {
        "video/x-flv"
    } else if name.ends_with(".wmv") {
        "video/x-ms-wmv"
    } else if name.ends_with(".m4v") {
        "video/x-m4v"
    } else if name.ends_with(".3gp") {
        "video/3gpp"
    } else if name.ends_with(".mpg") || name.ends_with(".mpeg") {
        "video/mpeg"
    } else {
        "video/mp4"
    }
}

/// MIME type for an image file name. Defaults to `image/jpeg`.
pub fn image_content_type(filename: Option<&str>) -> &'static str {
    let Some(filename) = filename else {
        return "image/jpeg";
    };
    let name = filename.to_lowercase();
    if name.ends_with(".png") {
        "image/png"
    } else if name.ends_with(".gif") {
        "image/gif"
    } else if name.ends_with(".webp") {
        "image/webp"
    } else {
        "image/jpeg"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_types_by_suffix() {
        assert_eq!(video_content_type(Some("a.webm")), "video/webm");
        assert_eq!(video_content_type(Some("a.mkv")), "video/x-matroska");
        assert_eq!(video_content_type(Some("a.MOV")), "video/quicktime");
        assert_eq!(video_content_type(Some("a.mpg")), "video/mpeg");
        assert_eq!(video_content_type(Some("a.mpeg")), "video/mpeg");
    }

    #[test]
    fn video_defaults_to_mp4() {
        assert_eq!(video_content_type(Some("a.mp4")), "video/mp4");
        assert_eq!(video_content_type(Some("a.unknown")), "video/mp4");
        assert_eq!(video_content_type(None), "video/mp4");
    }

    #[test]
    fn image_types_by_suffix() {
        assert_eq!(image_content_type(Some("a.png")), "image/png");
        assert_eq!(image_content_type(Some("a.gif")), "image/gif");
        assert_eq!(image_content_type(Some("a.webp")), "image/webp");
    }

    #[test]
    fn image_defaults_to_jpeg() {
        assert_eq!(image_content_type(Some("a.jpg")), "image/jpeg");
        assert_eq!(image_content_type(Some("a.unknown")), "image/jpeg");
        assert_eq!(image_content_type(None), "image/jpeg");
    }
}
