use std::collections::HashMap;

use actix_multipart::{Field, Multipart};
use actix_web::HttpResponse;
use futures_util::TryStreamExt;
use log::debug;

use crate::ErrorResponse;

/// Name of the multipart part carrying the logo file.
pub const LOGO_FIELD: &str = "logo";

#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct ParsedInvoiceMultipart {
    /// Text parts by name; the first occurrence of a repeated name wins.
    pub fields: HashMap<String, String>,
    /// The logo part, when a file was actually selected.
    pub logo: Option<UploadedFile>,
}

#[derive(Debug, thiserror::Error)]
pub enum MultipartParseError {
    #[error("Multipart field error: {0}")]
    FieldError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Invalid UTF-8 data in field {field}: {message}")]
    Utf8Error { field: String, message: String },
    #[error("Payload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },
}

impl From<MultipartParseError> for HttpResponse {
    fn from(error: MultipartParseError) -> Self {
        match error {
            MultipartParseError::PayloadTooLarge { .. } => HttpResponse::PayloadTooLarge()
                .json(ErrorResponse::payload_too_large(&error.to_string())),
            _ => HttpResponse::BadRequest().json(ErrorResponse::bad_request(&error.to_string())),
        }
    }
}

pub struct MultipartParser;

impl MultipartParser {
    /// Collects text fields and the optional logo, rejecting payloads
    /// larger than `limit` bytes in total.
    pub async fn parse_invoice_multipart(
        mut multipart: Multipart,
        limit: usize,
    ) -> Result<ParsedInvoiceMultipart, MultipartParseError> {
        let mut parsed = ParsedInvoiceMultipart::default();
        let mut consumed = 0usize;

        while let Some(mut field) = multipart
            .try_next()
            .await
            .map_err(|e| MultipartParseError::FieldError(e.to_string()))?
        {
            let content_disposition = field.content_disposition().ok_or_else(|| {
                MultipartParseError::FieldError("Content disposition not found".to_string())
            })?;
            let name = content_disposition
                .get_name()
                .ok_or_else(|| MultipartParseError::FieldError("Field name not found".to_string()))?
                .to_string();
            let filename = content_disposition.get_filename().map(|s| s.to_string());

            let bytes = read_field(&mut field, &mut consumed, limit).await?;

            match filename {
                Some(filename) if name == LOGO_FIELD => {
                    if filename.is_empty() {
                        debug!("Logo part present but no file selected");
                    } else if parsed.logo.is_none() {
                        parsed.logo = Some(UploadedFile { filename, bytes });
                    }
                }
                Some(filename) => {
                    debug!("Ignoring unexpected file part {} ({})", name, filename);
                }
                None => {
                    let value = String::from_utf8(bytes).map_err(|e| {
                        MultipartParseError::Utf8Error {
                            field: name.clone(),
                            message: e.to_string(),
                        }
                    })?;
                    parsed.fields.entry(name).or_insert(value);
                }
            }
        }

        Ok(parsed)
    }
}

async fn read_field(
    field: &mut Field,
    consumed: &mut usize,
    limit: usize,
) -> Result<Vec<u8>, MultipartParseError> {
    let mut buffer = Vec::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|e| MultipartParseError::IoError(e.to_string()))?
    {
        *consumed += chunk.len();
        if *consumed > limit {
            return Err(MultipartParseError::PayloadTooLarge { limit });
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer)
}
