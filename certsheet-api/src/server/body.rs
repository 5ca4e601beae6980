//! Request body extraction accepting JSON or form encoding

use axum::Form;
use axum::Json;
use axum::body::Body;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

use super::error::BadRequest;

/// Largest accepted request body
const BODY_LIMIT: usize = 100 * 1024;

/// Body extractor for `application/json` and
/// `application/x-www-form-urlencoded` requests.
///
/// A missing or blank body, or any other content type, yields `T::default()`.
#[derive(Debug, Clone, Default)]
pub struct JsonOrForm<T>(pub T);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Json,
    Form,
    Other,
}

fn encoding(req: &Request) -> Encoding {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let essence = content_type.split(';').next().unwrap_or_default().trim();

    if essence == "application/x-www-form-urlencoded" {
        Encoding::Form
    } else if essence == "application/json" || essence.ends_with("+json") {
        Encoding::Json
    } else {
        Encoding::Other
    }
}

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = BadRequest;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let encoding = encoding(&req);
        if encoding == Encoding::Other {
            return Ok(Self(T::default()));
        }

        let (parts, body) = req.into_parts();
        let bytes = axum::body::to_bytes(body, BODY_LIMIT)
            .await
            .map_err(|e| BadRequest(format!("Failed to read request body: {}", e)))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        let req = Request::from_parts(parts, Body::from(bytes));
        let value = match encoding {
            Encoding::Form => {
                let Form(value) = Form::<T>::from_request(req, state)
                    .await
                    .map_err(|e| BadRequest(format!("Invalid form body: {}", e.body_text())))?;
                value
            }
            _ => {
                let Json(value) = Json::<T>::from_request(req, state)
                    .await
                    .map_err(|e| BadRequest(format!("Invalid JSON body: {}", e.body_text())))?;
                value
            }
        };

        Ok(Self(value))
    }
}
