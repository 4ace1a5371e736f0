pub mod admin;
pub mod board;
pub mod directory;
pub mod health;
pub mod registration;
pub mod tickets;
pub mod webhook;

pub use admin::*;
pub use board::*;
pub use directory::*;
pub use health::*;
pub use registration::*;
pub use tickets::*;
pub use webhook::*;

use axum::http::HeaderMap;
use uuid::Uuid;

use crate::utils::{AppError, AppResult};

/// Extrai a identidade do chamador do header `X-User-Id`
///
/// A autenticação em si é do gateway; aqui só convertemos a identidade
/// injetada em valor explícito de sessão.
pub(crate) fn session_user(headers: &HeaderMap) -> AppResult<Uuid> {
    headers
        .get("X-User-Id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok())
        .ok_or_else(|| {
            AppError::ValidationError("Header X-User-Id ausente ou inválido".to_string())
        })
}
