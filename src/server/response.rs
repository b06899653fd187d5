//! HTTP response helpers.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::utils::{
    escape::escape,
    mime::{self, types},
};

/// Respond with a static file.
pub fn respond_file(request: Request, path: &Path) -> Result<()> {
    let content_type = mime::from_path(path);

    if is_head_request(&request) {
        let response = Response::empty(StatusCode(200))
            .with_header(make_header("Content-Type", content_type));
        request.respond(response)?;
        return Ok(());
    }

    let body = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    send_body(request, 200, content_type, body, None)
}

/// Respond with a rendered card.
pub fn respond_png(request: Request, png: Vec<u8>, cache_control: &'static str) -> Result<()> {
    send_body(request, 200, types::PNG, png, Some(cache_control))
}

pub fn respond_json(request: Request, body: String) -> Result<()> {
    send_body(request, 200, types::JSON, body.into_bytes(), None)
}

pub fn respond_not_found(request: Request) -> Result<()> {
    send_body(request, 404, types::PLAIN, b"404 Not Found".to_vec(), None)
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, types::PLAIN, b"503 Service Unavailable".to_vec(), None)
}

/// Respond with a pipeline error (500) as an HTML diagnostic.
pub fn respond_pipeline_error(request: Request, error: &anyhow::Error) -> Result<()> {
    let error_str = format!("{error:#}");
    let body = format!(
        "<html><body><h1>Share card error</h1><p>{}</p><pre>{}</pre></body></html>",
        escape(request.url()),
        escape(&error_str)
    );
    send_body(request, 500, types::HTML, body.into_bytes(), Some("no-store"))
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
    cache_control: Option<&'static str>,
) -> Result<()> {
    let mut response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type));
    if let Some(value) = cache_control {
        response = response.with_header(make_header("Cache-Control", value));
    }
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    // Static ASCII names and values always form a valid header.
    Header::from_bytes(key, value).unwrap()
}
