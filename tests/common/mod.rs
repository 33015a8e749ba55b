#![allow(dead_code)]

use std::path::Path;

use invoice_pdf_server::AppConfig;
use tempfile::TempDir;

pub const BOUNDARY: &str = "----invoice-test-boundary";

pub const SQUARE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20" viewBox="0 0 40 20"><rect width="40" height="20" fill="#f7a80a"/></svg>"##;

/// Scratch directories for one test, removed when dropped.
pub struct TestDirs {
    pub root: TempDir,
}

impl TestDirs {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("Failed to create temp dir");
        for sub in ["uploads", "output", "static"] {
            std::fs::create_dir_all(root.path().join(sub)).expect("Failed to create sub dir");
        }
        Self { root }
    }

    pub fn config(&self) -> AppConfig {
        AppConfig {
            upload_dir: self.root.path().join("uploads"),
            output_dir: self.root.path().join("output"),
            static_dir: self.root.path().join("static"),
            ..AppConfig::default()
        }
    }

    pub fn uploads(&self) -> std::path::PathBuf {
        self.root.path().join("uploads")
    }

    pub fn output(&self) -> std::path::PathBuf {
        self.root.path().join("output")
    }
}

pub fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| entries.count())
        .unwrap_or(0)
}

/// Hand-built multipart/form-data body.
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(self, name: &str, value: &str) -> Self {
        self.raw_text(name, value.as_bytes())
    }

    pub fn raw_text(mut self, name: &str, value: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n",
                BOUNDARY, name
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(value);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, name, filename, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        self.body
    }

    pub fn content_type() -> String {
        format!("multipart/form-data; boundary={}", BOUNDARY)
    }
}
