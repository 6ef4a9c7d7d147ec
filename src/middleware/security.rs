use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};

// JSON-only API, so nothing is allowed to load or frame it except the Swagger UI.
const API_CSP_POLICY: &str =
    "default-src 'none'; frame-ancestors 'none'; base-uri 'none'; form-action 'none'";
const SWAGGER_CSP_POLICY: &str = "default-src 'self'; script-src 'self' 'unsafe-inline'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; frame-ancestors 'none'";

pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let is_docs = request.uri().path().starts_with("/swagger-ui")
        || request.uri().path().starts_with("/api-docs");

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        "content-security-policy",
        HeaderValue::from_static(if is_docs {
            SWAGGER_CSP_POLICY
        } else {
            API_CSP_POLICY
        }),
    );
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert("referrer-policy", HeaderValue::from_static("no-referrer"));

    if !is_docs {
        headers.insert("cache-control", HeaderValue::from_static("no-store"));
    }

    response
}
