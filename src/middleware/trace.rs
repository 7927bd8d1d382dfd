//! TraceLayer span maker that keeps secrets and student PII out of logs.

use axum::http::{Request, Uri};
use tower_http::trace::MakeSpan;
use tracing::Span;

/// Query parameter names whose values are redacted in logs. `email` is a
/// list filter on the students collection.
const SENSITIVE_PARAMS: &[&str] = &["access_token", "token", "email"];

#[derive(Clone, Debug)]
pub struct SanitizedMakeSpan;

impl<B> MakeSpan<B> for SanitizedMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "http",
            method = %request.method(),
            uri = %sanitize_uri(request.uri()),
            version = ?request.version(),
        )
    }
}

/// `/api/v1/students?name=Ana&email=a@b.c` becomes
/// `/api/v1/students?name=Ana&email=[REDACTED]`.
fn sanitize_uri(uri: &Uri) -> String {
    let Some(query) = uri.query() else {
        return uri.path().to_string();
    };

    let pairs: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if SENSITIVE_PARAMS.contains(&key.to_ascii_lowercase().as_str()) => {
                format!("{key}=[REDACTED]")
            }
            _ => pair.to_string(),
        })
        .collect();

    format!("{}?{}", uri.path(), pairs.join("&"))
}
