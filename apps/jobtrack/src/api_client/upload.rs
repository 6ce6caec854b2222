//! Client-side checks for résumé uploads. A file that fails here never reaches the network.

use std::path::Path;

use bytes::Bytes;

use crate::errors::ClientError;

const ALLOWED: [(&str, &str); 4] = [
    ("pdf", "application/pdf"),
    ("txt", "text/plain"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
];

/// A résumé file that has passed type validation.
#[derive(Debug, Clone)]
pub struct UploadFile {
    file_name: String,
    mime: &'static str,
    content: Bytes,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Result<Self, ClientError> {
        let file_name = file_name.into();
        let mime = upload_mime(&file_name)?;
        let content = content.into();
        if content.is_empty() {
            return Err(ClientError::validation(format!("{file_name} is empty")));
        }
        Ok(Self {
            file_name,
            mime,
            content,
        })
    }

    /// Validates the type from the path first, then reads the file.
    pub async fn from_path(path: &Path) -> Result<Self, ClientError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ClientError::validation(format!("Invalid file path: {}", path.display())))?
            .to_string();
        upload_mime(&file_name)?;
        let content = tokio::fs::read(path).await?;
        Self::new(file_name, content)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }
}

/// Maps an allowed file name to its MIME type.
pub fn upload_mime(file_name: &str) -> Result<&'static str, ClientError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    extension
        .and_then(|ext| {
            ALLOWED
                .iter()
                .find(|(allowed, _)| *allowed == ext)
                .map(|(_, mime)| *mime)
        })
        .ok_or_else(|| {
            ClientError::validation(format!(
                "Invalid file format for '{file_name}'. Only PDF, TXT, DOC, DOCX allowed"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_allowed_types_map_to_mime() {
        assert_eq!(upload_mime("cv.pdf").unwrap(), "application/pdf");
        assert_eq!(upload_mime("CV.TXT").unwrap(), "text/plain");
        assert_eq!(upload_mime("cv.doc").unwrap(), "application/msword");
        assert!(upload_mime("my.cv.docx").unwrap().contains("wordprocessingml"));
    }

    #[test]
    fn test_other_types_rejected() {
        for name in ["cv.png", "cv.exe", "cv", "cv.pdf.zip", ".pdf", "resume.rtf"] {
            let err = upload_mime(name).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "{name} should be rejected");
        }
    }

    #[test]
    fn test_empty_file_rejected() {
        let err = UploadFile::new("cv.pdf", Vec::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_from_path_rejects_before_reading() {
        // the file does not exist: a read attempt would surface a storage error instead
        let err = UploadFile::from_path(Path::new("/nonexistent/photo.jpg"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_from_path_reads_allowed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "Ada Lovelace\nAnalyst").unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.file_name(), "resume.txt");
        assert_eq!(file.mime(), "text/plain");
        assert_eq!(file.content().len(), 20);
    }
}
