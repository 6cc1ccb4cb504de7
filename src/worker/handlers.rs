use actix_web::{web, HttpRequest, HttpResponse, Responder};

use super::models::{RutQuery, TrabajadorCreate, TrabajadorCreatedResponse, TrabajadorSearchQuery};
use crate::auth::middleware::{require_gestion, validate_request_token};
use crate::db::{classify_conflict, AppState, NuevoTrabajador, TrabajadorResumen};
use crate::rut;

/// Search the company roster by name/surname/cargo filters.
#[utoipa::path(
    get,
    path = "/api/trabajadores/search",
    tag = "Trabajadores",
    params(TrabajadorSearchQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Trabajadores encontrados", body = Vec<TrabajadorResumen>),
        (status = 401, description = "No autorizado")
    )
)]
pub async fn search_trabajadores(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<TrabajadorSearchQuery>,
) -> impl Responder {
    let ctx = match validate_request_token(&req) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    match state
        .search_trabajadores(
            ctx.empresa_id,
            query.nombre.as_deref(),
            query.apellido_paterno.as_deref(),
            query.apellido_materno.as_deref(),
            query.cargo.as_deref(),
        )
        .await
    {
        Ok(trabajadores) => HttpResponse::Ok().json(trabajadores),
        Err(e) => {
            log::error!("Roster search failed: {:?}", e);
            HttpResponse::InternalServerError().json(crate::ErrorResponse::internal_error(
                "Error al buscar trabajadores",
            ))
        }
    }
}

/// Look up one worker by the numeric body of their RUT.
#[utoipa::path(
    get,
    path = "/api/trabajadores/search-by-rut",
    tag = "Trabajadores",
    params(RutQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Trabajador encontrado", body = TrabajadorResumen),
        (status = 400, description = "RUT malformado"),
        (status = 401, description = "No autorizado"),
        (status = 404, description = "Trabajador no encontrado")
    )
)]
pub async fn search_by_rut(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<RutQuery>,
) -> impl Responder {
    let ctx = match validate_request_token(&req) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    let body = query.rut.trim().replace('.', "");
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit()) {
        return HttpResponse::BadRequest().json(crate::ErrorResponse::bad_request(
            "El RUT debe contener solo dígitos, sin dígito verificador",
        ));
    }

    match state.find_trabajador_by_rut(ctx.empresa_id, &body).await {
        Ok(Some(trabajador)) => HttpResponse::Ok().json(trabajador),
        Ok(None) => HttpResponse::NotFound()
            .json(crate::ErrorResponse::not_found("Trabajador no encontrado")),
        Err(e) => {
            log::error!("RUT lookup failed: {:?}", e);
            HttpResponse::InternalServerError().json(crate::ErrorResponse::internal_error(
                "Error al buscar el trabajador",
            ))
        }
    }
}

/// Register a worker, resolving catalog names to ids.
#[utoipa::path(
    post,
    path = "/api/trabajadores/create_worker",
    tag = "Trabajadores",
    request_body = TrabajadorCreate,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Trabajador creado", body = TrabajadorCreatedResponse),
        (status = 400, description = "RUT inválido"),
        (status = 401, description = "No autorizado"),
        (status = 403, description = "Rol insuficiente"),
        (status = 404, description = "Referencia de catálogo no encontrada"),
        (status = 409, description = "Conflicto de datos")
    )
)]
pub async fn create_trabajador(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<TrabajadorCreate>,
) -> impl Responder {
    let ctx = match require_gestion(&req) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    if !rut::validate(&body.rut) {
        return HttpResponse::BadRequest().json(crate::ErrorResponse::bad_request(
            "RUT inválido: el dígito verificador no corresponde",
        ));
    }
    let (rut_body, dv) = match rut::split(&body.rut) {
        Some(parts) => parts,
        None => {
            return HttpResponse::BadRequest()
                .json(crate::ErrorResponse::bad_request("RUT malformado"));
        }
    };

    // Resolve catalog names. A miss names the missing entity so the caller
    // can fix the exact field.
    let afp = match state.find_afp(&body.afp).await {
        Ok(Some(afp)) => afp,
        Ok(None) => {
            return HttpResponse::NotFound().json(crate::ErrorResponse::not_found(&format!(
                "AFP '{}' no encontrada",
                body.afp
            )));
        }
        Err(e) => return catalog_lookup_error(e),
    };

    let territorial = match state.find_territorial(&body.region, &body.comuna).await {
        Ok(Some(t)) => t,
        Ok(None) => {
            return HttpResponse::NotFound().json(crate::ErrorResponse::not_found(&format!(
                "Comuna '{}' no encontrada en la región '{}'",
                body.comuna, body.region
            )));
        }
        Err(e) => return catalog_lookup_error(e),
    };

    let id_cargo = match &body.cargo {
        Some(nombre) => match state.find_cargo(ctx.empresa_id, nombre).await {
            Ok(Some(cargo)) => Some(cargo.id_cargo),
            Ok(None) => {
                return HttpResponse::NotFound().json(crate::ErrorResponse::not_found(&format!(
                    "Cargo '{}' no encontrado",
                    nombre
                )));
            }
            Err(e) => return catalog_lookup_error(e),
        },
        None => None,
    };

    let id_salud = match &body.salud {
        Some(nombre) => match state.find_salud(nombre).await {
            Ok(Some(salud)) => Some(salud.id_salud),
            Ok(None) => {
                return HttpResponse::NotFound().json(crate::ErrorResponse::not_found(&format!(
                    "Previsión de salud '{}' no encontrada",
                    nombre
                )));
            }
            Err(e) => return catalog_lookup_error(e),
        },
        None => None,
    };

    let nuevo = NuevoTrabajador {
        id_empresa: ctx.empresa_id,
        id_afp: afp.id_afp,
        id_territorial: territorial.id_territorial,
        id_cargo,
        id_salud,
        nombre: body.nombre.clone(),
        apellido_paterno: body.apellido_paterno.clone(),
        apellido_materno: body.apellido_materno.clone(),
        fecha_nacimiento: body.fecha_nacimiento,
        rut: rut_body,
        dv_rut: dv,
        nacionalidad: body.nacionalidad.clone(),
        direccion_real: body.direccion_real.clone(),
    };

    match state.create_trabajador(&nuevo).await {
        Ok(id_trabajador) => HttpResponse::Created().json(TrabajadorCreatedResponse {
            id_trabajador,
            mensaje: "Trabajador registrado".to_string(),
        }),
        Err(e) => {
            if let Some(kind) = classify_conflict(&e) {
                return HttpResponse::Conflict()
                    .json(crate::ErrorResponse::new("Conflict", kind.message()));
            }
            log::error!("Failed to create worker: {:?}", e);
            HttpResponse::InternalServerError().json(crate::ErrorResponse::internal_error(
                "Error al registrar el trabajador",
            ))
        }
    }
}

fn catalog_lookup_error(e: sqlx::Error) -> HttpResponse {
    log::error!("Catalog lookup failed: {:?}", e);
    HttpResponse::InternalServerError()
        .json(crate::ErrorResponse::internal_error("Error al consultar el catálogo"))
}

/// Configure worker routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/trabajadores")
            .route("/search", web::get().to(search_trabajadores))
            .route("/search-by-rut", web::get().to(search_by_rut))
            .route("/create_worker", web::post().to(create_trabajador)),
    );
}
