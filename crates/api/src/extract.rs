//! Request extractors that report failures through [`AppError`].

use axum::extract::FromRequestParts;

use crate::error::AppError;

/// Typed path parameters. A segment that does not parse (e.g. a
/// non-numeric id) is a 400 with the usual JSON error body.
///
/// ```ignore
/// async fn get_track(ValidPath(id): ValidPath<DbId>) -> AppResult<...> { ... }
/// ```
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ValidPath<T>(pub T);
