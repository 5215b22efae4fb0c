//! AuthContext Extractor
//!
//! Custom extractor for pulling the authenticated context out of a request.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::AuthContext;
use crate::auth::middleware::authenticate;
use crate::core::ServerState;

/// Auth extractor
///
/// Returns the [`AuthContext`] the middleware already resolved; when the
/// middleware did not run (e.g. a route mounted outside the auth layer),
/// performs the full authentication itself.
impl FromRequestParts<ServerState> for AuthContext {
    type Rejection = crate::utils::AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted (from middleware)
        if let Some(ctx) = parts.extensions.get::<AuthContext>() {
            return Ok(ctx.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(|h| h.to_string());

        let ctx = authenticate(state, auth_header.as_deref(), &parts.uri).await?;

        // Store in extensions for potential reuse
        parts.extensions.insert(ctx.clone());

        Ok(ctx)
    }
}
