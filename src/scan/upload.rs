use std::path::Path;

use bytes::Bytes;
use tempfile::NamedTempFile;

use crate::ai::ImagePayload;

/// Image as received from the client.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub body: Bytes,
    pub content_type: String,
    pub file_name: Option<String>,
}

/// An upload staged on disk for the length of one scan. The file is
/// removed when this value is dropped, whichever way the scan ends.
pub struct StoredImage {
    file: NamedTempFile,
    mime_type: String,
}

impl StoredImage {
    pub async fn store(dir: &Path, upload: ImageUpload) -> std::io::Result<Self> {
        let mime_type = resolve_mime(&upload.content_type, upload.file_name.as_deref());
        let ext = ext_from_mime(&mime_type).unwrap_or("bin");
        let file = tempfile::Builder::new()
            .prefix("scan-")
            .suffix(&format!(".{ext}"))
            .tempfile_in(dir)?;
        tokio::fs::write(file.path(), &upload.body).await?;
        Ok(Self { file, mime_type })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub async fn load(&self) -> std::io::Result<ImagePayload> {
        let bytes = tokio::fs::read(self.path()).await?;
        Ok(ImagePayload {
            bytes: Bytes::from(bytes),
            mime_type: self.mime_type.clone(),
        })
    }
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

fn mime_from_ext(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

/// Browsers often send `application/octet-stream`; fall back to the file
/// extension, then to JPEG.
fn resolve_mime(content_type: &str, file_name: Option<&str>) -> String {
    let ct = content_type.trim().to_ascii_lowercase();
    if ct.starts_with("image/") {
        return ct;
    }
    file_name
        .and_then(mime_from_ext)
        .unwrap_or("image/jpeg")
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ext_from_mime() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("image/webp"), Some("webp"));
        assert_eq!(ext_from_mime("image/heic"), Some("heic"));
        assert_eq!(ext_from_mime("application/octet-stream"), None);
    }

    #[test]
    fn mime_falls_back_to_extension_then_jpeg() {
        assert_eq!(resolve_mime("image/PNG", None), "image/png");
        assert_eq!(resolve_mime("application/octet-stream", Some("fridge.WEBP")), "image/webp");
        assert_eq!(resolve_mime("", Some("noext")), "image/jpeg");
        assert_eq!(resolve_mime("", None), "image/jpeg");
    }

    #[tokio::test]
    async fn file_lives_until_drop() {
        let dir = tempfile::tempdir().unwrap();
        let upload = ImageUpload {
            body: Bytes::from_static(b"\x89PNG"),
            content_type: "image/png".into(),
            file_name: Some("shelf.png".into()),
        };
        let stored = StoredImage::store(dir.path(), upload).await.unwrap();
        let path = stored.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(path.extension().unwrap(), "png");

        let payload = stored.load().await.unwrap();
        assert_eq!(&payload.bytes[..], b"\x89PNG");
        assert_eq!(payload.mime_type, "image/png");

        drop(stored);
        assert!(!path.exists());
    }
}
