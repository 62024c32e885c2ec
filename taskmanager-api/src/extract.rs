/// Request extractors
///
/// - `ApiJson` / `ApiPath`: axum's `Json` and `Path` with rejections turned
///   into `ApiError::BadRequest`, so malformed bodies and ids get the same
///   error body as every other failure.
/// - `CallerContext`: who is making the request, used to assign task owners.

use crate::{app::AppState, error::ApiError};
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};
use std::convert::Infallible;

/// JSON body extractor with `ApiError` rejections
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameter extractor with `ApiError` rejections
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Identity of the caller on whose behalf a request runs
///
/// An authentication layer can insert a `CallerContext` into the request
/// extensions. When none is present the configured default owner is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerContext {
    /// User the caller acts as
    pub user_id: i64,
}

#[async_trait]
impl FromRequestParts<AppState> for CallerContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<CallerContext>()
            .copied()
            .unwrap_or(CallerContext {
                user_id: state.config.owner.default_id,
            }))
    }
}
