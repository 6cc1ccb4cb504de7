use actix_web::{web, HttpRequest, HttpResponse, Responder};

use super::models::EmpresaUpdateRequest;
use crate::auth::middleware::{require_gestion, validate_request_token};
use crate::db::{AppState, Empresa};

/// Get the company of the authenticated account.
#[utoipa::path(
    get,
    path = "/api/empresa/{id}",
    tag = "Empresa",
    params(("id" = i32, Path, description = "Company id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Datos de la empresa", body = Empresa),
        (status = 401, description = "No autorizado"),
        (status = 404, description = "Empresa no encontrada")
    )
)]
pub async fn get_empresa(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> impl Responder {
    let ctx = match validate_request_token(&req) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    let empresa_id = path.into_inner();
    if empresa_id != ctx.empresa_id {
        return HttpResponse::Forbidden().json(crate::ErrorResponse::new(
            "Forbidden",
            "La cuenta no pertenece a esta empresa",
        ));
    }

    match state.get_empresa(empresa_id).await {
        Ok(Some(empresa)) => HttpResponse::Ok().json(empresa),
        Ok(None) => {
            HttpResponse::NotFound().json(crate::ErrorResponse::not_found("Empresa no encontrada"))
        }
        Err(e) => {
            log::error!("Failed to get company: {:?}", e);
            HttpResponse::InternalServerError()
                .json(crate::ErrorResponse::internal_error("Error al obtener la empresa"))
        }
    }
}

/// Update editable company fields.
#[utoipa::path(
    put,
    path = "/api/empresa/{id}",
    tag = "Empresa",
    params(("id" = i32, Path, description = "Company id")),
    request_body = EmpresaUpdateRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Empresa actualizada", body = Empresa),
        (status = 401, description = "No autorizado"),
        (status = 403, description = "Rol insuficiente"),
        (status = 404, description = "Empresa no encontrada")
    )
)]
pub async fn update_empresa(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<EmpresaUpdateRequest>,
) -> impl Responder {
    let ctx = match require_gestion(&req) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    let empresa_id = path.into_inner();
    if empresa_id != ctx.empresa_id {
        return HttpResponse::Forbidden().json(crate::ErrorResponse::new(
            "Forbidden",
            "La cuenta no pertenece a esta empresa",
        ));
    }

    match state.update_empresa(empresa_id, &body).await {
        Ok(true) => match state.get_empresa(empresa_id).await {
            Ok(Some(empresa)) => HttpResponse::Ok().json(empresa),
            Ok(None) => HttpResponse::NotFound()
                .json(crate::ErrorResponse::not_found("Empresa no encontrada")),
            Err(e) => {
                log::error!("Failed to reload company after update: {:?}", e);
                HttpResponse::InternalServerError().json(crate::ErrorResponse::internal_error(
                    "Error al actualizar la empresa",
                ))
            }
        },
        Ok(false) => {
            HttpResponse::NotFound().json(crate::ErrorResponse::not_found("Empresa no encontrada"))
        }
        Err(e) => {
            log::error!("Failed to update company: {:?}", e);
            HttpResponse::InternalServerError().json(crate::ErrorResponse::internal_error(
                "Error al actualizar la empresa",
            ))
        }
    }
}

/// Configure company routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/empresa")
            .route("/{id}", web::get().to(get_empresa))
            .route("/{id}", web::put().to(update_empresa)),
    );
}
