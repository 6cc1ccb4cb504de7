use actix_web::error::{ErrorForbidden, ErrorUnauthorized};
use actix_web::{Error, HttpRequest};

use super::jwt::validate_token;
use super::model::AuthContext;

/// Extract token from Authorization header
fn extract_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|auth| {
            if auth.starts_with("Bearer ") {
                Some(auth[7..].to_string())
            } else {
                None
            }
        })
}

/// Validate the access token on a request and return the caller's identity.
pub fn validate_request_token(req: &HttpRequest) -> Result<AuthContext, Error> {
    let token =
        extract_token(req).ok_or_else(|| ErrorUnauthorized("Falta el token de autorización"))?;

    let claims = validate_token(&token).map_err(|e| {
        log::warn!("Token validation failed: {:?}", e);
        ErrorUnauthorized("Token inválido o expirado")
    })?;

    if claims.token_type != "access" {
        return Err(ErrorUnauthorized("Tipo de token inválido"));
    }

    let usuario_id = claims
        .sub
        .parse::<i32>()
        .map_err(|_| ErrorUnauthorized("Token inválido o expirado"))?;
    let empresa_id = claims
        .empresa_id
        .parse::<i32>()
        .map_err(|_| ErrorUnauthorized("Token inválido o expirado"))?;
    let rol = claims
        .rol
        .parse::<i16>()
        .map_err(|_| ErrorUnauthorized("Token inválido o expirado"))?;

    Ok(AuthContext {
        usuario_id,
        empresa_id,
        rol,
    })
}

/// Like [`validate_request_token`] but also requires a role allowed to
/// manage workers and generate documents.
pub fn require_gestion(req: &HttpRequest) -> Result<AuthContext, Error> {
    let ctx = validate_request_token(req)?;
    if !ctx.puede_gestionar() {
        return Err(ErrorForbidden(
            "El rol de la cuenta no permite esta operación",
        ));
    }
    Ok(ctx)
}
