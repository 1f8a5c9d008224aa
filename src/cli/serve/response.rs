//! HTTP response handlers.

use anyhow::{Context, Result};
use std::{fs, path::Path};
use tiny_http::{Header, Method, Request, Response as HttpResponse, StatusCode};

use crate::utils::mime;
use crate::worker;

/// Replay an engine response (cache, network, or shell fallback).
pub fn respond_served(request: Request, served: &worker::Response) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, served.status, served.content_type);
    }
    send_body(
        request,
        served.status,
        served.content_type,
        served.body.clone(),
    )
}

/// Respond with a file straight from the site directory (pass-through path).
pub fn respond_file(request: Request, path: &Path) -> Result<()> {
    let content_type = mime::from_path(path);

    if is_head_request(&request) {
        return send_head(request, 200, content_type);
    }

    let body = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    send_body(request, 200, content_type, body)
}

/// Respond with a plain 404.
pub fn respond_not_found(request: Request) -> Result<()> {
    use crate::utils::mime::types::PLAIN;

    if is_head_request(&request) {
        return send_head(request, 404, PLAIN);
    }
    send_body(request, 404, PLAIN, b"404 Not Found".to_vec())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    use crate::utils::mime::types::PLAIN;
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec())
}

/// The engine propagated a fetch failure with no cached fallback.
pub fn respond_bad_gateway(request: Request, error: &anyhow::Error) -> Result<()> {
    use crate::utils::mime::types::PLAIN;
    let body = format!("502 Bad Gateway\n{error:#}");
    send_body(request, 502, PLAIN, body.into_bytes())
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head(request: Request, status: u16, content_type: &'static str) -> Result<()> {
    let response =
        HttpResponse::empty(StatusCode(status)).with_header(make_header("Content-Type", content_type));
    request.respond(response)?;
    Ok(())
}

fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
) -> Result<()> {
    let response = HttpResponse::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type));
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    Header::from_bytes(key, value).unwrap()
}
