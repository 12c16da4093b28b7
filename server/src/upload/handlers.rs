//! Upload Handlers
//!
//! `GET /` serves the upload form; `POST /upload` runs the pipeline:
//! token check, content sniffing, size check, file write, metadata insert.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::Html;

use super::error::UploadError;
use super::types::IncomingImage;
use super::validate::UploadValidator;
use crate::api::AppState;

/// Multipart field carrying the shared secret.
pub const AUTH_FIELD: &str = "auth";

/// Multipart field carrying the image.
pub const FILE_FIELD: &str = "data";

/// Body returned for a stored upload.
pub const UPLOAD_OK: &str = "Image uploaded successfully";

/// Parsed `POST /upload` form.
#[derive(Debug, Default)]
struct UploadForm {
    token: Option<String>,
    image: Option<IncomingImage>,
}

/// Serve the upload form.
///
/// GET /
#[tracing::instrument(skip(state))]
pub async fn upload_form(State(state): State<AppState>) -> Html<String> {
    Html(render_form(state.config.form_auth_token.as_deref()))
}

fn render_form(token: Option<&str>) -> String {
    format!(
        r#"<form action="/upload" method="post" enctype="multipart/form-data">
    <input type="hidden" name="{AUTH_FIELD}" value="{}">
    <input type="file" name="{FILE_FIELD}">
    <input type="submit" value="Upload">
</form>"#,
        escape_attr(token.unwrap_or_default())
    )
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Accept one image upload.
///
/// POST /upload
///
/// Expects multipart form with:
/// - `auth`: The shared secret
/// - `data`: The image file
///
/// The file write and the metadata insert are not atomic: if the insert
/// fails the file stays on disk without a row.
#[tracing::instrument(skip(state, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, &'static str), UploadError> {
    let form = read_form(&state.validator, &mut multipart).await?;
    let token = form.token.unwrap_or_default();

    let Some(image) = form.image else {
        state.validator.check_token(&token)?;
        return Err(UploadError::NoFile);
    };

    let content_type = image.content_type.clone();
    let size = image.size;

    // Sniffing and copying are blocking file I/O.
    let validator = state.validator.clone();
    let files = state.files.clone();
    let stored = tokio::task::spawn_blocking(move || {
        let mut validated = validator.validate(&token, image)?;
        files.store(&mut validated)
    })
    .await??;

    let row = match state.metadata.record(&content_type, size).await {
        Ok(row) => row,
        Err(e) => {
            tracing::error!(
                path = %stored.path.display(),
                error = %e,
                "Stored file has no metadata row"
            );
            return Err(e.into());
        }
    };

    tracing::info!(
        id = row.id,
        path = %stored.path.display(),
        content_type = %row.content_type,
        size = row.size,
        "Image uploaded"
    );

    Ok((StatusCode::OK, UPLOAD_OK))
}

/// Read the multipart body.
///
/// The first `auth` value is checked as soon as it arrives so a bad token
/// never causes the file to be buffered. Only the first `data` part that
/// carries a filename is kept.
async fn read_form(
    validator: &UploadValidator,
    multipart: &mut Multipart,
) -> Result<UploadForm, UploadError> {
    let mut form = UploadForm::default();

    while let Some(mut field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            AUTH_FIELD if form.token.is_none() => {
                let token = field.text().await?;
                validator.check_token(&token)?;
                form.token = Some(token);
            }
            FILE_FIELD if form.image.is_none() => {
                let Some(filename) = field.file_name().map(String::from) else {
                    continue;
                };
                let content_type = field.content_type().unwrap_or_default().to_string();

                let mut image = IncomingImage::new(filename, content_type, validator.max_size());
                while let Some(chunk) = field.chunk().await? {
                    image.write_chunk(&chunk)?;
                }
                image.finish()?;
                form.image = Some(image);
            }
            _ => {
                // Ignore unknown and repeated fields
            }
        }
    }

    Ok(form)
}
