//! Serve command: HTTP API for uploading and converting documents.

use super::convert::{Conversion, ConversionReport, ConversionStats};
use super::load_config;
use anyhow::{Context, Result};
use axum::{
    extract::{
        multipart::MultipartRejection, DefaultBodyLimit, Multipart, Path as AxumPath, State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use mdconvert_core::slug::file_stem_slug;
use mdconvert_core::{AsciiMode, Config, OutputFormat, StyleName};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

/// Upload extensions accepted by `/api/convert`
const UPLOAD_EXTENSIONS: &[&str] = &["md", "markdown", "txt"];

const INDEX_HTML: &str = include_str!("../../static/index.html");

#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    output_dir: PathBuf,
}

/// Start the conversion API
pub async fn serve(config_path: &Path, port: Option<u16>) -> Result<()> {
    let config = load_config(config_path)?;
    let port = port.unwrap_or(config.server.port);
    let output_dir = config.server_output_dir();

    tokio::fs::create_dir_all(&output_dir)
        .await
        .with_context(|| format!("Failed to create output directory {:?}", output_dir))?;

    let state = AppState {
        config: Arc::new(config),
        output_dir,
    };
    let app = router(state);

    let addr = format!("127.0.0.1:{}", port);
    tracing::info!("Starting conversion API on http://{}", addr);
    println!("\nServing at http://{}", addr);
    println!("   Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn router(state: AppState) -> Router {
    let body_limit = state.config.server.max_upload_bytes;

    Router::new()
        .route("/", get(index))
        .route("/api/health", get(api_health))
        .route("/api/convert", post(api_convert))
        .route("/api/download/{filename}", get(api_download))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn api_health() -> Response {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .into_response()
}

/// An uploaded document and the options sent with it
#[derive(Debug, Default)]
struct ConvertRequest {
    filename: String,
    content: String,
    format: Option<String>,
    style: Option<String>,
    ascii_mode: Option<String>,
}

#[derive(Debug, Serialize)]
struct FileLink {
    #[serde(rename = "type")]
    kind: &'static str,
    filename: String,
    url: String,
}

#[derive(Debug, Serialize)]
struct ConvertResponse {
    success: bool,
    files: Vec<FileLink>,
    stats: ConversionStats,
}

impl From<ConversionReport> for ConvertResponse {
    fn from(report: ConversionReport) -> Self {
        let files = report
            .files
            .into_iter()
            .filter_map(|file| {
                let filename = file.path.file_name()?.to_string_lossy().into_owned();
                Some(FileLink {
                    kind: file.kind,
                    url: format!("/api/download/{}", filename),
                    filename,
                })
            })
            .collect();

        Self {
            success: true,
            files,
            stats: report.stats,
        }
    }
}

async fn api_convert(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => return json_error(rejection.status(), rejection.body_text()),
    };

    match read_upload(&mut multipart).await {
        Ok(request) => convert_upload(state, request).await,
        Err(response) => response,
    }
}

/// Collect the `file` part and the option fields of an upload form
async fn read_upload(multipart: &mut Multipart) -> Result<ConvertRequest, Response> {
    let mut request = ConvertRequest::default();
    let mut has_file = false;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(json_error(e.status(), e.body_text())),
        };
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                request.filename = field.file_name().unwrap_or("").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| json_error(e.status(), e.body_text()))?;
                request.content = String::from_utf8(bytes.to_vec()).map_err(|_| {
                    json_error(StatusCode::BAD_REQUEST, "Uploaded file is not valid UTF-8")
                })?;
                has_file = true;
            }
            "format" | "style" | "ascii_mode" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| json_error(e.status(), e.body_text()))?;
                let value = Some(text.trim().to_string()).filter(|v| !v.is_empty());
                match name.as_str() {
                    "format" => request.format = value,
                    "style" => request.style = value,
                    _ => request.ascii_mode = value,
                }
            }
            _ => tracing::debug!("Ignoring form field {:?}", name),
        }
    }

    if !has_file {
        return Err(json_error(StatusCode::BAD_REQUEST, "No file uploaded"));
    }
    if request.filename.is_empty() {
        return Err(json_error(StatusCode::BAD_REQUEST, "No file selected"));
    }

    Ok(request)
}

async fn convert_upload(state: AppState, request: ConvertRequest) -> Response {
    if !allowed_upload(&request.filename) {
        return json_error(
            StatusCode::BAD_REQUEST,
            "Unsupported file type; use .md, .markdown or .txt",
        );
    }

    let format = match parse_option::<OutputFormat>(request.format.as_deref()) {
        Ok(format) => format,
        Err(message) => return json_error(StatusCode::BAD_REQUEST, message),
    };
    let style = match parse_option::<StyleName>(request.style.as_deref()) {
        Ok(style) => style,
        Err(message) => return json_error(StatusCode::BAD_REQUEST, message),
    };
    let ascii_mode = match parse_option::<AsciiMode>(request.ascii_mode.as_deref()) {
        Ok(mode) => mode,
        Err(message) => return json_error(StatusCode::BAD_REQUEST, message),
    };

    let conversion = Conversion::new(state.config.as_ref().clone())
        .with_format(format)
        .with_style(style)
        .with_ascii_mode(ascii_mode);
    let output_base = state.output_dir.join(output_stem(&request.filename));
    let retention = Duration::from_secs(state.config.server.retention_secs);
    let output_dir = state.output_dir.clone();

    tracing::info!("Converting upload {:?} to {}", request.filename, conversion.format());

    let result = tokio::task::spawn_blocking(move || {
        purge_expired(&output_dir, retention);
        conversion.run(&request.content, &output_base)
    })
    .await;

    match result {
        Ok(Ok(report)) => Json(ConvertResponse::from(report)).into_response(),
        Ok(Err(e)) => {
            tracing::error!("Conversion failed: {:#}", e);
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Conversion failed: {:#}", e),
            )
        }
        Err(e) => {
            tracing::error!("Conversion task panicked: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Conversion task failed")
        }
    }
}

async fn api_download(
    AxumPath(filename): AxumPath<String>,
    State(state): State<AppState>,
) -> Response {
    let Some(name) = download_name(&filename) else {
        return json_error(StatusCode::NOT_FOUND, "File not found");
    };

    let path = state.output_dir.join(name);
    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, content_type_for(name).to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", name),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(_) => json_error(StatusCode::NOT_FOUND, "File not found"),
    }
}

fn parse_option<T>(value: Option<&str>) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|v| v.parse::<T>().map_err(|e| e.to_string()))
        .transpose()
}

fn allowed_upload(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| UPLOAD_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Unique output stem for an upload
fn output_stem(filename: &str) -> String {
    format!(
        "{}_{}",
        file_stem_slug(filename),
        Utc::now().format("%Y%m%d%H%M%S%3f")
    )
}

/// A plain file name inside the output directory, or `None`
fn download_name(filename: &str) -> Option<&str> {
    let valid = !filename.is_empty()
        && !filename.starts_with('.')
        && filename
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    valid.then_some(filename)
}

fn content_type_for(name: &str) -> &'static str {
    match name.rsplit_once('.').map(|(_, ext)| ext) {
        Some("pdf") => "application/pdf",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("html") => "text/html; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Remove generated outputs at least `retention` old
fn purge_expired(dir: &Path, retention: Duration) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let age = entry
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| modified.elapsed().ok());

        if !matches!(age, Some(age) if age >= retention) {
            continue;
        }

        let removed = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        match removed {
            Ok(()) => tracing::debug!("Removed expired output {:?}", path),
            Err(e) => tracing::debug!("Could not remove {:?}: {}", path, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::extract::FromRequest;
    use axum::http::Request;
    use tempfile::TempDir;

    const BOUNDARY: &str = "mdconvert-form-boundary";
    const UPLOAD: &str = "---\ntitle: Upload\n---\n# Upload\n\n```python\nx = 1\n```\n";

    fn sample_state() -> (AppState, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState {
            config: Arc::new(Config::default()),
            output_dir: dir.path().to_path_buf(),
        };
        (state, dir)
    }

    /// A `multipart/form-data` body with an optional file part and text fields
    fn form_body(file: Option<(&str, &[u8])>, fields: &[(&str, &str)]) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some((filename, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: text/markdown\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn post_form(state: AppState, body: Vec<u8>) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri("/api/convert")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        let multipart = Multipart::from_request(request, &()).await;
        api_convert(State(state), multipart).await
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn index_serves_upload_form() {
        let Html(page) = index().await;
        assert!(page.contains(r#"enctype="multipart/form-data""#));
        assert!(page.contains(r#"name="ascii_mode""#));
    }

    #[tokio::test]
    async fn api_health_reports_version() {
        let response = api_health().await;
        assert_eq!(response.status(), StatusCode::OK);
        let value = body_json(response).await;
        assert_eq!(value["status"], "ok");
        assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn api_convert_rejects_extension() {
        let (state, _dir) = sample_state();
        let body = form_body(Some(("notes.pdf", UPLOAD.as_bytes())), &[]);
        let response = post_form(state, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value = body_json(response).await;
        assert!(value["error"].as_str().unwrap().contains(".markdown"));
    }

    #[tokio::test]
    async fn api_convert_rejects_unknown_style() {
        let (state, _dir) = sample_state();
        let body = form_body(
            Some(("notes.md", UPLOAD.as_bytes())),
            &[("format", "html"), ("style", "gothic")],
        );
        let response = post_form(state, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value = body_json(response).await;
        assert!(value["error"].as_str().unwrap().contains("gothic"));
    }

    #[tokio::test]
    async fn api_convert_requires_file_part() {
        let (state, _dir) = sample_state();
        let response = post_form(state.clone(), form_body(None, &[("format", "html")])).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "No file uploaded");

        let response = post_form(state, form_body(Some(("", b"# A".as_slice())), &[])).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "No file selected");
    }

    #[tokio::test]
    async fn api_convert_rejects_non_utf8() {
        let (state, _dir) = sample_state();
        let latin1: &[u8] = &[0xff, 0xfe, 0x23];
        let body = form_body(Some(("notes.md", latin1)), &[("format", "html")]);
        let response = post_form(state, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value = body_json(response).await;
        assert!(value["error"].as_str().unwrap().contains("UTF-8"));
    }

    #[tokio::test]
    async fn api_convert_rejects_json_body() {
        let (state, _dir) = sample_state();
        let request = Request::builder()
            .method("POST")
            .uri("/api/convert")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"filename":"a.md","content":"x"}"#))
            .unwrap();
        let multipart = Multipart::from_request(request, &()).await;
        assert!(multipart.is_err());

        let response = api_convert(State(state), multipart).await;
        assert!(response.status().is_client_error());
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn api_convert_html_then_download() {
        let (state, dir) = sample_state();
        let body = form_body(
            Some(("My Notes.md", UPLOAD.as_bytes())),
            &[("format", "html"), ("style", "minimal"), ("ascii_mode", "preserve")],
        );
        let response = post_form(state.clone(), body).await;
        assert_eq!(response.status(), StatusCode::OK);

        let value = body_json(response).await;
        assert_eq!(value["success"], true);
        assert_eq!(value["stats"]["code_blocks"], 1);
        assert_eq!(value["stats"]["title"], "Upload");

        let file = &value["files"][0];
        assert_eq!(file["type"], "html");
        let filename = file["filename"].as_str().unwrap().to_string();
        assert!(filename.starts_with("my-notes_"));
        assert!(filename.ends_with(".html"));
        assert_eq!(file["url"], format!("/api/download/{}", filename));

        let html = fs::read_to_string(dir.path().join(&filename)).unwrap();
        assert!(html.contains("/* minimal */"));

        let response = api_download(AxumPath(filename.clone()), State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert_eq!(disposition, format!("attachment; filename=\"{}\"", filename));
    }

    #[tokio::test]
    async fn api_download_rejects_traversal() {
        let (state, _dir) = sample_state();
        let response = api_download(AxumPath("../Cargo.toml".to_string()), State(state.clone())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = api_download(AxumPath("missing.pdf".to_string()), State(state)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_upload_extensions() {
        assert!(allowed_upload("a.md"));
        assert!(allowed_upload("b.MARKDOWN"));
        assert!(allowed_upload("c.txt"));
        assert!(!allowed_upload("d.html"));
        assert!(!allowed_upload("README"));
    }

    #[test]
    fn test_purge_expired() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("old.pdf");
        fs::write(&file, "x").unwrap();

        purge_expired(dir.path(), Duration::from_secs(3600));
        assert!(file.exists());

        purge_expired(dir.path(), Duration::ZERO);
        assert!(!file.exists());
    }
}
