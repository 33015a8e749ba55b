use std::path::PathBuf;

use actix_files::NamedFile;
use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use chrono::Local;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::invoice::models::{GenerateInvoiceRequest, InvoiceForm};
use crate::invoice::multipart_parser::{MultipartParser, UploadedFile};
use crate::logo;
use crate::render::{render_invoice, RenderError, RenderedInvoice};
use crate::storage::{allowed_file, stage_upload, StorageError};
use crate::{AppState, ErrorResponse};

pub const DOWNLOAD_NAME: &str = "invoice.pdf";

#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    #[error("Failed to stage logo: {0}")]
    Storage(#[from] StorageError),
    #[error("Failed to render invoice: {0}")]
    Render(#[from] RenderError),
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
}

/// Output path for a new invoice, unique even within the same second.
pub fn output_path(config: &AppConfig) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let id = Uuid::new_v4().simple().to_string();
    config.output_dir.join(format!("inv_{}_{}.pdf", stamp, &id[..8]))
}

/// Stages the logo, normalizes it, and renders the PDF. Every scratch file
/// created for the logo is gone when this returns.
pub fn build_invoice(
    config: &AppConfig,
    form: &InvoiceForm,
    logo_upload: Option<UploadedFile>,
) -> Result<RenderedInvoice, InvoiceError> {
    let staged = match logo_upload {
        Some(upload) if allowed_file(&upload.filename) => {
            Some(stage_upload(&config.upload_dir, &upload.filename, &upload.bytes)?)
        }
        Some(upload) => {
            warn!("Ignoring logo with disallowed type: {}", upload.filename);
            None
        }
        None => None,
    };

    let normalized = staged.as_ref().and_then(|staged| {
        debug!(
            "Normalizing {} logo {}",
            staged.format().mime_type(),
            staged.path().display()
        );
        logo::normalize(staged, &config.upload_dir)
    });

    let output = output_path(config);
    let rendered = render_invoice(
        form,
        normalized.as_ref().map(|logo| logo.path()),
        &output,
        config.branding(),
    )?;
    Ok(rendered)
}

#[utoipa::path(
    post,
    path = "/generate-invoice",
    tag = "Invoice",
    request_body(content = inline(GenerateInvoiceRequest), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Generated invoice as a PDF attachment", content_type = "application/pdf", body = Vec<u8>),
        (status = 400, description = "Malformed multipart payload", body = ErrorResponse),
        (status = 413, description = "Payload too large", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn generate_invoice(
    req: HttpRequest,
    payload: Multipart,
    data: web::Data<AppState>,
) -> impl Responder {
    info!("Executing generate_invoice handler");
    let config = data.config.clone();

    let parsed =
        match MultipartParser::parse_invoice_multipart(payload, config.max_upload_bytes).await {
            Ok(parsed) => parsed,
            Err(e) => {
                error!("Failed to parse invoice form: {}", e);
                return HttpResponse::from(e);
            }
        };
    debug!(
        "Parsed {} form fields, logo: {}",
        parsed.fields.len(),
        parsed.logo.as_ref().map_or("none", |l| l.filename.as_str())
    );

    let form = InvoiceForm::from_fields(&parsed.fields);
    let logo_upload = parsed.logo;
    let render_config = config.clone();
    let rendered = match web::block(move || build_invoice(&render_config, &form, logo_upload)).await
    {
        Ok(Ok(rendered)) => rendered,
        Ok(Err(e)) => {
            error!("Server Error: {}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&e.to_string()));
        }
        Err(e) => {
            error!("Render task failed: {}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Render task failed"));
        }
    };

    match NamedFile::open_async(&rendered.path).await {
        Ok(file) => {
            info!(
                "Sending invoice {} (logo embedded: {})",
                rendered.path.display(),
                rendered.logo_embedded
            );
            file.set_content_disposition(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(DOWNLOAD_NAME.to_string())],
            })
            .into_response(&req)
        }
        Err(e) => {
            error!("Failed to open rendered invoice {}: {}", rendered.path.display(), e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to read generated invoice"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Invoice",
    responses(
        (status = 200, description = "Invoice entry form", content_type = "text/html"),
        (status = 404, description = "Form page not installed", body = ErrorResponse)
    )
)]
pub async fn index(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    let page = data.config.static_dir.join("index.html");
    match NamedFile::open_async(&page).await {
        Ok(file) => file.into_response(&req),
        Err(e) => {
            error!("Index page {} unavailable: {}", page.display(), e);
            HttpResponse::NotFound().json(ErrorResponse::not_found("Index page not found"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Invoice",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
    })
}
