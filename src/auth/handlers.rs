use actix_web::{web, HttpRequest, HttpResponse, Responder};
use bcrypt::verify;
use chrono::{Duration, Utc};

use super::jwt::{
    generate_access_token, generate_refresh_token, get_access_token_expiry,
    REFRESH_TOKEN_EXPIRY_DAYS,
};
use super::model::{LoginRequest, RefreshRequest, TokenResponse};
use crate::db::AppState;

fn client_ip(req: &HttpRequest) -> Option<String> {
    req.connection_info().realip_remote_addr().map(String::from)
}

fn user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("User-Agent")
        .and_then(|h| h.to_str().ok())
        .map(String::from)
}

/// Login endpoint
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Autenticación",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Inicio de sesión exitoso", body = TokenResponse),
        (status = 401, description = "Credenciales inválidas"),
        (status = 403, description = "Correo no verificado")
    )
)]
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> impl Responder {
    let cuenta = match state.get_cuenta_by_correo(&body.email).await {
        Ok(Some(cuenta)) => cuenta,
        Ok(None) => {
            return HttpResponse::Unauthorized().json(crate::ErrorResponse::new(
                "Unauthorized",
                "Credenciales inválidas",
            ));
        }
        Err(e) => {
            log::error!("Database error during login: {:?}", e);
            return HttpResponse::InternalServerError()
                .json(crate::ErrorResponse::internal_error("Error al iniciar sesión"));
        }
    };

    let password_valid = verify(&body.password, &cuenta.password_hash).unwrap_or(false);
    if !password_valid {
        return HttpResponse::Unauthorized().json(crate::ErrorResponse::new(
            "Unauthorized",
            "Credenciales inválidas",
        ));
    }

    if cuenta.email_verificado_at.is_none() {
        return HttpResponse::Forbidden().json(crate::ErrorResponse::new(
            "Forbidden",
            "Correo no verificado",
        ));
    }

    let access_token =
        match generate_access_token(cuenta.id_usuario, cuenta.id_empresa, cuenta.tipo_usuario) {
            Ok(t) => t,
            Err(e) => {
                log::error!("Failed to generate access token: {:?}", e);
                return HttpResponse::InternalServerError().json(
                    crate::ErrorResponse::internal_error("Error al generar el token"),
                );
            }
        };

    let refresh_token = generate_refresh_token();
    let limite = Utc::now() + Duration::days(REFRESH_TOKEN_EXPIRY_DAYS);

    if let Err(e) = state
        .create_sesion(
            cuenta.id_login,
            &refresh_token,
            limite,
            user_agent(&req).as_deref(),
            client_ip(&req).as_deref(),
        )
        .await
    {
        log::error!("Failed to store session: {:?}", e);
        return HttpResponse::InternalServerError()
            .json(crate::ErrorResponse::internal_error("Error al iniciar sesión"));
    }

    HttpResponse::Ok().json(TokenResponse {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: get_access_token_expiry(),
        usuario_id: cuenta.id_usuario,
        empresa_id: cuenta.id_empresa,
        rol: cuenta.tipo_usuario,
    })
}

/// Exchange a live refresh token for a new access token.
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "Autenticación",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Token renovado", body = TokenResponse),
        (status = 401, description = "Sesión expirada o revocada")
    )
)]
pub async fn refresh_token(
    state: web::Data<AppState>,
    body: web::Json<RefreshRequest>,
) -> impl Responder {
    let sesion = match state.get_sesion_by_token(&body.refresh_token).await {
        Ok(Some(sesion)) => sesion,
        Ok(None) => {
            return HttpResponse::Unauthorized().json(crate::ErrorResponse::new(
                "Unauthorized",
                "Sesión expirada. Inicie sesión nuevamente.",
            ));
        }
        Err(e) => {
            log::error!("Database error during refresh: {:?}", e);
            return HttpResponse::InternalServerError()
                .json(crate::ErrorResponse::internal_error("Error al renovar el token"));
        }
    };

    let access_token =
        match generate_access_token(sesion.id_usuario, sesion.id_empresa, sesion.tipo_usuario) {
            Ok(t) => t,
            Err(e) => {
                log::error!("Failed to generate access token: {:?}", e);
                return HttpResponse::InternalServerError().json(
                    crate::ErrorResponse::internal_error("Error al generar el token"),
                );
            }
        };

    HttpResponse::Ok().json(TokenResponse {
        access_token,
        refresh_token: body.refresh_token.clone(),
        token_type: "Bearer".to_string(),
        expires_in: get_access_token_expiry(),
        usuario_id: sesion.id_usuario,
        empresa_id: sesion.id_empresa,
        rol: sesion.tipo_usuario,
    })
}

/// Revoke a refresh session.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Autenticación",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Sesión cerrada"),
        (status = 404, description = "Sesión no encontrada")
    )
)]
pub async fn logout(state: web::Data<AppState>, body: web::Json<RefreshRequest>) -> impl Responder {
    match state.revoke_sesion(&body.refresh_token).await {
        Ok(true) => HttpResponse::Ok().finish(),
        Ok(false) => HttpResponse::NotFound()
            .json(crate::ErrorResponse::not_found("Sesión no encontrada")),
        Err(e) => {
            log::error!("Database error during logout: {:?}", e);
            HttpResponse::InternalServerError()
                .json(crate::ErrorResponse::internal_error("Error al cerrar sesión"))
        }
    }
}

/// Configure auth routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(login))
            .route("/refresh", web::post().to(refresh_token))
            .route("/logout", web::post().to(logout)),
    );
}
