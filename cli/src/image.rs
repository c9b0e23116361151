use std::path::Path;

use anyhow::{Context, Result, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Largest image accepted as an attachment.
const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Read an image file and return it as a `data:` URL.
pub(crate) fn load_image_data_url(path: &Path) -> Result<String> {
    let size = std::fs::metadata(path)
        .with_context(|| format!("Failed to read image: {}", path.display()))?
        .len();
    if size > MAX_IMAGE_BYTES {
        bail!(
            "Image {} is too large ({} KB, max {} KB)",
            path.display(),
            size / 1024,
            MAX_IMAGE_BYTES / 1024
        );
    }
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read image: {}", path.display()))?;
    let mime = sniff_image_mime(&bytes)
        .with_context(|| format!("Not an image: {}", path.display()))?;
    Ok(to_data_url(mime, &bytes))
}

/// MIME type detected from the file's leading bytes. Content recognized as
/// something other than an image is rejected; unknown content is kept as
/// `application/octet-stream`.
fn sniff_image_mime(bytes: &[u8]) -> Result<&'static str> {
    match infer::get(bytes) {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Image => Ok(kind.mime_type()),
        Some(kind) => bail!("detected {}", kind.mime_type()),
        None => Ok("application/octet-stream"),
    }
}

pub(crate) fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Short description of an image reference for tables.
pub(crate) fn describe_image(image: &str) -> String {
    if image.is_empty() {
        return String::new();
    }
    match image
        .strip_prefix("data:")
        .and_then(|rest| rest.split(';').next())
    {
        Some(mime) if !mime.is_empty() => mime.to_string(),
        _ => "yes".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_sniff_image_mime() {
        assert_eq!(sniff_image_mime(&PNG_MAGIC).unwrap(), "image/png");
        assert_eq!(sniff_image_mime(&[0xFF, 0xD8, 0xFF]).unwrap(), "image/jpeg");
        assert_eq!(sniff_image_mime(b"plain words").unwrap(), "application/octet-stream");
        assert!(sniff_image_mime(b"%PDF-1.4\n").is_err());
    }

    #[test]
    fn test_mime_follows_content_not_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, PNG_MAGIC).unwrap();
        let url = load_image_data_url(&path).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_load_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt.png");
        std::fs::write(&path, b"%PDF-1.4\n").unwrap();
        let err = load_image_data_url(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Not an image"));
    }

    #[test]
    fn test_to_data_url() {
        assert_eq!(to_data_url("image/png", b"hi"), "data:image/png;base64,aGk=");
    }

    #[test]
    fn test_load_image_data_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();
        let url = load_image_data_url(&path).unwrap();
        assert_eq!(url, "data:image/jpeg;base64,/9j/");
    }

    #[test]
    fn test_load_missing_image() {
        assert!(load_image_data_url(&PathBuf::from("/nonexistent/x.png")).is_err());
    }

    #[test]
    fn test_describe_image() {
        assert_eq!(describe_image(""), "");
        assert_eq!(describe_image("data:image/png;base64,aGk="), "image/png");
        assert_eq!(describe_image("blob:1234"), "yes");
    }
}
