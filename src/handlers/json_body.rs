//! A JSON body extractor that treats an empty body as `{}`.
//!
//! Clients routinely POST without a body or without a `Content-Type`; those
//! requests should reach field validation and fail there with a 400 rather
//! than being rejected up front.

use crate::errors::AppError;
use axum::extract::{FromRequest, Request};
use bytes::Bytes;
use serde::de::DeserializeOwned;

#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;
        parse_json_body(&bytes).map(JsonBody)
    }
}

pub(crate) fn parse_json_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    let bytes: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        bytes
    };
    serde_json::from_slice(bytes)
        .map_err(|err| AppError::bad_request(format!("invalid JSON body: {err}")))
}
