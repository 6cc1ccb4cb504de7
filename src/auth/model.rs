use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Login account row joined with its user's company.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CuentaLogin {
    pub id_login: i32,
    pub id_usuario: i32,
    pub correo: String,
    pub password_hash: String,
    pub email_verificado_at: Option<DateTime<Utc>>,
    /// 1 = administrador, 2 = contador, 3 = consulta
    pub tipo_usuario: i16,
    pub id_empresa: i32,
}

/// Refresh session row joined with its account.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Sesion {
    pub id_sesion: i32,
    pub id_login: i32,
    pub token_refresh: String,
    pub limite_sesion: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub id_usuario: i32,
    pub tipo_usuario: i16,
    pub id_empresa: i32,
}

/// Login request payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token response after successful login
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub usuario_id: i32,
    pub empresa_id: i32,
    pub rol: i16,
}

/// Refresh token request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// JWT claims of an access token. The refresh token is opaque and lives in
/// the sesiones table, so only "access" appears in token_type here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// user id
    pub sub: String,
    pub empresa_id: String,
    pub rol: String,
    pub exp: usize,
    pub iat: usize,
    pub token_type: String,
}

/// Decoded, type-checked identity of the caller.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub usuario_id: i32,
    pub empresa_id: i32,
    pub rol: i16,
}

impl AuthContext {
    /// Roles allowed to manage workers and generate documents
    /// (1 = administrador, 2 = contador).
    pub fn puede_gestionar(&self) -> bool {
        self.rol == 1 || self.rol == 2
    }
}
