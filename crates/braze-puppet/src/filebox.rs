//! Transferable file handles.
//!
//! A [`FileBox`] names a file together with one way of obtaining its bytes.
//! Remote variants stay lazy: nothing is downloaded until a caller asks for
//! the bytes, and callers that only need a URL never pay for the transfer.

use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{PuppetError, PuppetResult};

/// A file attachment in transit between the host and a puppet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileBox {
    /// A file hosted at a remote URL.
    Url { url: String, name: Option<String> },
    /// Base64-encoded file content.
    Base64 { data: String, name: Option<String> },
    /// In-memory file content.
    Buffer { bytes: Vec<u8>, name: Option<String> },
    /// A file on the local filesystem.
    Path { path: PathBuf, name: Option<String> },
}

impl FileBox {
    pub fn from_url(url: impl Into<String>) -> Self {
        FileBox::Url {
            url: url.into(),
            name: None,
        }
    }

    pub fn from_base64(data: impl Into<String>) -> Self {
        FileBox::Base64 {
            data: data.into(),
            name: None,
        }
    }

    pub fn from_buffer(bytes: Vec<u8>) -> Self {
        FileBox::Buffer { bytes, name: None }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        FileBox::Path {
            path: path.into(),
            name: None,
        }
    }

    /// Attaches a filename, replacing any previous one.
    pub fn with_name(mut self, new_name: impl Into<String>) -> Self {
        let slot = match &mut self {
            FileBox::Url { name, .. }
            | FileBox::Base64 { name, .. }
            | FileBox::Buffer { name, .. }
            | FileBox::Path { name, .. } => name,
        };
        *slot = Some(new_name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            FileBox::Url { name, .. }
            | FileBox::Base64 { name, .. }
            | FileBox::Buffer { name, .. }
            | FileBox::Path { name, .. } => name.as_deref(),
        }
    }

    /// The remote URL, if this box points at one.
    pub fn remote_url(&self) -> Option<&str> {
        match self {
            FileBox::Url { url, .. } => Some(url),
            _ => None,
        }
    }

    /// Materializes the file content.
    ///
    /// `Url` boxes cannot be materialized here; fetching is the caller's
    /// responsibility and asking for bytes from one is an error.
    pub async fn to_bytes(&self) -> PuppetResult<Vec<u8>> {
        match self {
            FileBox::Url { url, .. } => Err(PuppetError::payload(format!(
                "cannot read bytes from remote url {url}"
            ))),
            FileBox::Base64 { data, .. } => STANDARD
                .decode(data)
                .map_err(|e| PuppetError::payload(format!("invalid base64 content: {e}"))),
            FileBox::Buffer { bytes, .. } => Ok(bytes.clone()),
            FileBox::Path { path, .. } => Ok(tokio::fs::read(path).await?),
        }
    }

    /// Encodes the file content as a `data:` URL.
    pub async fn to_data_url(&self) -> PuppetResult<String> {
        let bytes = self.to_bytes().await?;
        Ok(format!(
            "data:application/octet-stream;base64,{}",
            STANDARD.encode(&bytes)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn base64_box_decodes_content() {
        let file = FileBox::from_base64(STANDARD.encode(b"hello")).with_name("greeting.txt");
        assert_eq!(file.name(), Some("greeting.txt"));
        assert_eq!(file.to_bytes().await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn buffer_box_builds_data_url() {
        let file = FileBox::from_buffer(vec![1, 2, 3]);
        let url = file.to_data_url().await.unwrap();
        assert_eq!(url, "data:application/octet-stream;base64,AQID");
    }

    #[tokio::test]
    async fn url_box_refuses_to_materialize() {
        let file = FileBox::from_url("https://example.com/pic.png");
        assert_eq!(file.remote_url(), Some("https://example.com/pic.png"));
        assert!(file.to_bytes().await.is_err());
    }

    #[tokio::test]
    async fn path_box_reads_from_disk() {
        let path = std::env::temp_dir().join("braze-filebox-test.bin");
        std::fs::write(&path, b"on disk").unwrap();
        let file = FileBox::from_path(&path);
        assert_eq!(file.to_bytes().await.unwrap(), b"on disk");
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn invalid_base64_is_a_payload_error() {
        let file = FileBox::from_base64("!!!not base64!!!");
        let err = file.to_bytes().await.unwrap_err();
        assert!(matches!(err, PuppetError::Payload { .. }));
    }

    #[test]
    fn with_name_replaces_existing_name() {
        let file = FileBox::from_buffer(vec![0]).with_name("a.bin").with_name("b.bin");
        assert_eq!(file.name(), Some("b.bin"));
    }
}
