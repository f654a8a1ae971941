use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue, Version, header::USER_AGENT},
    middleware::Next,
    response::Response,
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use std::time::Instant;
use tracing::{error, info, warn};

const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
const MAX_REQUEST_ID_LEN: usize = 128;

/// 96 random bits as 16 base64url characters.
fn new_request_id() -> String {
    URL_SAFE_NO_PAD.encode(rand::random::<[u8; 12]>())
}

fn protocol(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => "HTTP/?",
    }
}

fn header_text(req: &Request, name: &HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// One log line per request, at a level picked by status class. The request id is taken
/// from `x-request-id` when sane, generated otherwise, and always echoed back.
///
/// For observer streams the latency is the time until the stream opened.
pub async fn access_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let protocol = protocol(req.version());
    let user_agent = header_text(&req, &USER_AGENT).unwrap_or_else(|| "-".to_string());
    let request_id = header_text(&req, &X_REQUEST_ID)
        .filter(|id| !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN)
        .unwrap_or_else(new_request_id);

    let started = Instant::now();
    let mut resp = next.run(req).await;
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(X_REQUEST_ID, value);
    }

    let status = resp.status();
    macro_rules! emit {
        ($level:ident) => {
            $level!(
                status = status.as_u16(),
                request_id = %request_id,
                method = %method,
                protocol,
                path = %path,
                latency_ms,
                user_agent = %user_agent,
                "request"
            )
        };
    }
    if status.is_server_error() {
        emit!(error);
    } else if status.is_client_error() {
        emit!(warn);
    } else {
        emit!(info);
    }

    resp
}
