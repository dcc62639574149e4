//! Request extractors whose rejections answer with the `AppError` body.

use axum::extract::FromRequest;

use crate::errors::AppError;

/// `axum::Json` with its rejection mapped to a `VALIDATION_ERROR` response.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
