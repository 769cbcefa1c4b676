//! Authentication extractors.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};

use bloghub_core::ports::{AuthError, TokenClaims, TokenService};
use bloghub_shared::ErrorBody;

use crate::state::AppState;

/// Authenticated actor extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: uuid::Uuid,
    pub username: String,
    pub is_admin: bool,
}

impl Identity {
    /// Whether this actor may mutate a resource owned by `owner`.
    pub fn owns_or_admin(&self, owner: uuid::Uuid) -> bool {
        self.user_id == owner || self.is_admin
    }
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
            is_admin: claims.is_admin,
        }
    }
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match &self.0 {
            AuthError::InsufficientPermissions => actix_web::http::StatusCode::FORBIDDEN,
            AuthError::HashingError(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
            _ => actix_web::http::StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        let message = match &self.0 {
            AuthError::TokenExpired => "Token expired, please login again",
            AuthError::MissingAuth => "Access token required",
            AuthError::InsufficientPermissions => "Not authorized",
            _ => "Invalid token",
        };
        actix_web::HttpResponse::build(self.status_code()).json(ErrorBody::new(message))
    }
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            tracing::error!("AppState not found in app data");
            return ready(Err(AuthenticationError(AuthError::InvalidToken(
                "server configuration error".to_string(),
            ))));
        };

        let Some(auth_header) = req.headers().get(header::AUTHORIZATION) else {
            return ready(Err(AuthenticationError(AuthError::MissingAuth)));
        };

        let Ok(auth_str) = auth_header.to_str() else {
            return ready(Err(AuthenticationError(AuthError::InvalidToken(
                "invalid authorization header".to_string(),
            ))));
        };

        let Some(token) = auth_str.strip_prefix("Bearer ") else {
            return ready(Err(AuthenticationError(AuthError::InvalidToken(
                "expected Bearer token".to_string(),
            ))));
        };

        match state.tokens.validate_token(token) {
            Ok(claims) => ready(Ok(Identity::from(claims))),
            Err(e) => ready(Err(AuthenticationError(e))),
        }
    }
}
