//! Request/response model and the network boundary.
//!
//! `Fetcher` is the engine's view of the network: an `Err` means the request
//! never completed (the offline case); HTTP error statuses are ordinary `Ok`
//! responses. No timeouts are set anywhere - a hung fetch blocks that one
//! interception and nothing else.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use url::Url;

use crate::utils::mime;
use crate::utils::path::resolve_under_root;

/// HTTP method of an intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Options,
    Patch,
    Other,
}

impl Method {
    pub fn is_get(self) -> bool {
        matches!(self, Method::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
            Method::Other => "OTHER",
        };
        f.write_str(name)
    }
}

/// An intercepted request.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    /// Document load (navigation) as opposed to a sub-resource fetch.
    pub navigation: bool,
}

impl Request {
    /// A plain sub-resource GET.
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::Get,
            url,
            navigation: false,
        }
    }

    /// A document-load GET.
    pub fn navigation(url: Url) -> Self {
        Self {
            method: Method::Get,
            url,
            navigation: true,
        }
    }

    pub fn new(method: Method, url: Url, navigation: bool) -> Self {
        Self {
            method,
            url,
            navigation,
        }
    }

    /// Scheme + host + effective port comparison against the app origin.
    pub fn same_origin(&self, origin: &Url) -> bool {
        self.url.scheme() == origin.scheme()
            && self.url.host() == origin.host()
            && self.url.port_or_known_default() == origin.port_or_known_default()
    }
}

/// Same-origin ("basic") vs cross-origin ("opaque") response classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Basic,
    Opaque,
}

/// A response snapshot: everything the cache stores and the server replays.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    pub kind: ResponseKind,
}

impl Response {
    pub fn basic(status: u16, content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type,
            body,
            kind: ResponseKind::Basic,
        }
    }

    pub fn opaque(status: u16, content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type,
            body,
            kind: ResponseKind::Opaque,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// Only successful same-origin responses are stored at fetch time.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.kind == ResponseKind::Basic
    }
}

/// The network boundary.
pub trait Fetcher: Send + Sync {
    /// Perform a network fetch. `Err` means the request never completed.
    fn fetch(&self, request: &Request) -> Result<Response>;
}

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeSource {
    Cache,
    Network,
    ShellFallback,
}

impl fmt::Display for ServeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServeSource::Cache => "cache",
            ServeSource::Network => "network",
            ServeSource::ShellFallback => "shell",
        };
        f.write_str(name)
    }
}

/// Result of running a request through the engine.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The engine answered the request.
    Served {
        response: Response,
        source: ServeSource,
    },
    /// Not intercepted (pass-through mode, non-GET, or cross-origin).
    Passthrough,
}

/// Filesystem-backed origin used by the preview server: the "network" is the
/// site directory on disk.
pub struct SiteFetcher {
    root: PathBuf,
}

impl SiteFetcher {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl Fetcher for SiteFetcher {
    fn fetch(&self, request: &Request) -> Result<Response> {
        match resolve_under_root(&self.root, request.url.path()) {
            Some(file) => {
                let body = fs::read(&file)?;
                Ok(Response::basic(200, mime::from_path(&file), body))
            }
            // A server answers missing paths with a 404, it does not fail
            None => Ok(Response::basic(
                404,
                mime::types::PLAIN,
                b"404 Not Found".to_vec(),
            )),
        }
    }
}
