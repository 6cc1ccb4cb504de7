//! HTTP endpoints for document generation and the EPP/ODI catalogs.
//!
//! Generation handlers assemble the typed data record (merging company and
//! roster data with the request payload), run the renderer on the blocking
//! pool and stream the resulting PDF back as an attachment.

use actix_files::NamedFile;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use utoipa::ToSchema;

use super::common::{download_filename, today_spanish};
use super::model::{
    ContractData, DocumentData, EppData, EppItem, OdiData, OdiRow, TerminationData,
};
use super::{DocumentError, GeneratedDocument, Renderer};
use crate::auth::middleware::require_gestion;
use crate::db::{classify_conflict, AppState, Empresa, EppCatalogItem, OdiCatalogEntry};

/// EPP delivery receipt request. Subject fields come from the caller; the
/// company block comes from the authenticated account.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EppGenerateRequest {
    pub nombre: String,
    pub rut: String,
    pub cargo: String,
    pub elementos: Vec<EppItem>,
}

/// ODI hazard disclosure request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct OdiGenerateRequest {
    pub nombre: String,
    pub rut: String,
    pub cargo: String,
    pub filas: Vec<OdiRow>,
}

/// Employment contract request. The caller supplies both parties' identity
/// fields in full; only the company block comes from the authenticated
/// account.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ContratoGenerateRequest {
    pub ciudad_firma: String,
    pub fecha_contrato: String,
    pub representante_legal: String,
    pub rut_representante: String,
    pub domicilio_representante: String,
    pub nombre_trabajador: String,
    pub nacionalidad_trabajador: String,
    pub rut_trabajador: String,
    pub estado_civil_trabajador: String,
    pub fecha_nacimiento_trabajador: String,
    pub domicilio_trabajador: String,
    pub cargo_trabajador: String,
    pub lugar_trabajo: String,
    pub sueldo: String,
    pub jornada: String,
    pub descripcion_jornada: String,
    #[serde(default)]
    pub clausulas: Vec<String>,
}

impl ContratoGenerateRequest {
    fn into_document(self, empresa_nombre: String, empresa_rut: String) -> DocumentData {
        DocumentData::Contrato(ContractData {
            ciudad_firma: self.ciudad_firma,
            fecha_contrato: self.fecha_contrato,
            empresa_nombre,
            empresa_rut,
            representante_legal: self.representante_legal,
            rut_representante: self.rut_representante,
            domicilio_representante: self.domicilio_representante,
            nombre_trabajador: self.nombre_trabajador,
            nacionalidad_trabajador: self.nacionalidad_trabajador,
            rut_trabajador: self.rut_trabajador,
            estado_civil_trabajador: self.estado_civil_trabajador,
            fecha_nacimiento_trabajador: self.fecha_nacimiento_trabajador,
            domicilio_trabajador: self.domicilio_trabajador,
            cargo_trabajador: self.cargo_trabajador,
            lugar_trabajo: self.lugar_trabajo,
            sueldo: self.sueldo,
            jornada: self.jornada,
            descripcion_jornada: self.descripcion_jornada,
            clausulas: self.clausulas,
        })
    }
}

/// Termination notice request. The worker is resolved from the roster.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CartaAvisoGenerateRequest {
    pub rut_trabajador: String,
    pub ciudad: String,
    pub articulo_causal: String,
    pub descripcion_causal: String,
    pub justificacion: String,
    pub lugar_finiquito: String,
    pub fecha_finiquito: String,
}

/// New EPP catalog item.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EppItemCreate {
    pub epp: String,
    #[serde(default)]
    pub descripcion: Option<String>,
}

/// New ODI catalog entry.
#[derive(Debug, Deserialize, ToSchema)]
pub struct OdiEntryCreate {
    pub tarea: String,
    pub riesgo: String,
    pub consecuencias: String,
    pub precaucion: String,
}

async fn load_empresa(state: &AppState, empresa_id: i32) -> Result<Empresa, HttpResponse> {
    match state.get_empresa(empresa_id).await {
        Ok(Some(empresa)) => Ok(empresa),
        Ok(None) => Err(HttpResponse::NotFound()
            .json(crate::ErrorResponse::not_found("Empresa no encontrada"))),
        Err(e) => {
            log::error!("Failed to load company for document: {:?}", e);
            Err(HttpResponse::InternalServerError()
                .json(crate::ErrorResponse::internal_error("Error al generar el PDF")))
        }
    }
}

/// Run the renderer on the blocking pool and map failures to HTTP.
async fn render_and_stream(req: &HttpRequest, data: DocumentData) -> HttpResponse {
    let kind = data.kind();
    let rut = data.subject_rut().to_string();

    let generated = web::block(move || Renderer::default().generate(&data)).await;

    let generated: GeneratedDocument = match generated {
        Ok(Ok(doc)) => doc,
        Ok(Err(DocumentError::Invalid(msg))) => {
            return HttpResponse::BadRequest().json(crate::ErrorResponse::bad_request(&msg));
        }
        Ok(Err(e)) => {
            log::error!("PDF generation failed: {:?}", e);
            return HttpResponse::InternalServerError()
                .json(crate::ErrorResponse::internal_error("Error al generar el PDF"));
        }
        Err(e) => {
            log::error!("PDF generation task failed: {:?}", e);
            return HttpResponse::InternalServerError()
                .json(crate::ErrorResponse::internal_error("Error al generar el PDF"));
        }
    };

    let file = match NamedFile::open_async(&generated.path).await {
        Ok(f) => f,
        Err(e) => {
            log::error!("Generated PDF unreadable at {:?}: {:?}", generated.path, e);
            return HttpResponse::InternalServerError()
                .json(crate::ErrorResponse::internal_error("Error al generar el PDF"));
        }
    };

    file.set_content_disposition(ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(download_filename(kind, &rut))],
    })
    .into_response(req)
}

/// Generate the EPP delivery receipt PDF.
#[utoipa::path(
    post,
    path = "/api/epp/generate-pdf",
    tag = "Documentos",
    request_body = EppGenerateRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "PDF generado", content_type = "application/pdf"),
        (status = 400, description = "Datos inválidos"),
        (status = 401, description = "No autorizado"),
        (status = 404, description = "Empresa no encontrada")
    )
)]
pub async fn generate_epp_pdf(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<EppGenerateRequest>,
) -> impl Responder {
    let ctx = match require_gestion(&req) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    let empresa = match load_empresa(&state, ctx.empresa_id).await {
        Ok(e) => e,
        Err(resp) => return resp,
    };

    let body = body.into_inner();
    let data = DocumentData::EntregaEpp(EppData {
        nombre: body.nombre,
        rut: body.rut,
        cargo: body.cargo,
        empresa_nombre: empresa.razon_social.clone(),
        empresa_rut: empresa.rut_display(),
        elementos: body.elementos,
    });

    render_and_stream(&req, data).await
}

/// Generate the ODI hazard disclosure PDF.
#[utoipa::path(
    post,
    path = "/api/odi/generate-pdf",
    tag = "Documentos",
    request_body = OdiGenerateRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "PDF generado", content_type = "application/pdf"),
        (status = 400, description = "Datos inválidos"),
        (status = 401, description = "No autorizado"),
        (status = 404, description = "Empresa no encontrada")
    )
)]
pub async fn generate_odi_pdf(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<OdiGenerateRequest>,
) -> impl Responder {
    let ctx = match require_gestion(&req) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    let empresa = match load_empresa(&state, ctx.empresa_id).await {
        Ok(e) => e,
        Err(resp) => return resp,
    };

    let body = body.into_inner();
    let data = DocumentData::Odi(OdiData {
        nombre: body.nombre,
        rut: body.rut,
        cargo: body.cargo,
        empresa_nombre: empresa.razon_social.clone(),
        empresa_rut: empresa.rut_display(),
        filas: body.filas,
    });

    render_and_stream(&req, data).await
}

/// Generate the employment contract PDF.
#[utoipa::path(
    post,
    path = "/api/contrato/generate-pdf",
    tag = "Documentos",
    request_body = ContratoGenerateRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "PDF generado", content_type = "application/pdf"),
        (status = 400, description = "Datos inválidos"),
        (status = 401, description = "No autorizado"),
        (status = 404, description = "Empresa no encontrada")
    )
)]
pub async fn generate_contrato_pdf(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<ContratoGenerateRequest>,
) -> impl Responder {
    let ctx = match require_gestion(&req) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    let empresa = match load_empresa(&state, ctx.empresa_id).await {
        Ok(e) => e,
        Err(resp) => return resp,
    };

    let data = body
        .into_inner()
        .into_document(empresa.razon_social.clone(), empresa.rut_display());

    render_and_stream(&req, data).await
}

/// Generate the termination notice letter PDF for a roster worker.
#[utoipa::path(
    post,
    path = "/api/contrato/carta-aviso",
    tag = "Documentos",
    request_body = CartaAvisoGenerateRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "PDF generado", content_type = "application/pdf"),
        (status = 400, description = "Datos inválidos"),
        (status = 401, description = "No autorizado"),
        (status = 404, description = "Empresa o trabajador no encontrado")
    )
)]
pub async fn generate_carta_aviso_pdf(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<CartaAvisoGenerateRequest>,
) -> impl Responder {
    let ctx = match require_gestion(&req) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    let empresa = match load_empresa(&state, ctx.empresa_id).await {
        Ok(e) => e,
        Err(resp) => return resp,
    };

    let body = body.into_inner();
    let rut_body = match crate::rut::split(&body.rut_trabajador) {
        Some((b, _)) => b,
        None => {
            return HttpResponse::BadRequest()
                .json(crate::ErrorResponse::bad_request("RUT malformado"));
        }
    };

    let trabajador = match state.find_trabajador_by_rut(ctx.empresa_id, &rut_body).await {
        Ok(Some(t)) => t,
        Ok(None) => {
            return HttpResponse::NotFound()
                .json(crate::ErrorResponse::not_found("Trabajador no encontrado"));
        }
        Err(e) => {
            log::error!("Roster lookup for termination letter failed: {:?}", e);
            return HttpResponse::InternalServerError()
                .json(crate::ErrorResponse::internal_error("Error al generar el PDF"));
        }
    };

    let comuna = trabajador
        .comuna
        .clone()
        .unwrap_or_else(|| "Sin comuna".to_string());
    let domicilio = format!("{}, {}", trabajador.direccion_real, comuna);

    let data = DocumentData::CartaAviso(TerminationData {
        ciudad: body.ciudad,
        fecha: today_spanish(),
        empresa_nombre: empresa.razon_social.clone(),
        empresa_rut: empresa.rut_display(),
        nombre_trabajador: trabajador.nombre_completo(),
        rut_trabajador: trabajador.rut_display(),
        domicilio_trabajador: domicilio,
        articulo_causal: body.articulo_causal,
        descripcion_causal: body.descripcion_causal,
        justificacion: body.justificacion,
        lugar_finiquito: body.lugar_finiquito,
        fecha_finiquito: body.fecha_finiquito,
    });

    render_and_stream(&req, data).await
}

/// Add an item to the company's EPP catalog.
#[utoipa::path(
    post,
    path = "/api/epp/create",
    tag = "Catálogos",
    request_body = EppItemCreate,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "EPP creado", body = EppCatalogItem),
        (status = 401, description = "No autorizado"),
        (status = 409, description = "Nombre o descripción duplicada")
    )
)]
pub async fn create_epp_item(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<EppItemCreate>,
) -> impl Responder {
    let ctx = match require_gestion(&req) {
        Ok(c) => c,
        Err(e) => return e.error_response(),
    };

    match state
        .create_epp_item(ctx.empresa_id, &body.epp, body.descripcion.as_deref())
        .await
    {
        Ok(item) => HttpResponse::Created().json(item),
        Err(e) => {
            if let Some(kind) = classify_conflict(&e) {
                return HttpResponse::Conflict()
                    .json(crate::ErrorResponse::new("Conflict", kind.message()));
            }
            log::error!("Failed to create EPP catalog item: {:?}", e);
            HttpResponse::InternalServerError()
                .json(crate::ErrorResponse::internal_error("Error al crear el EPP"))
        }
    }
}

/// Add an entry to the ODI catalog.
#[utoipa::path(
    post,
    path = "/api/odi/create",
    tag = "Catálogos",
    request_body = OdiEntryCreate,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Entrada ODI creada", body = OdiCatalogEntry),
        (status = 401, description = "No autorizado"),
        (status = 409, description = "Tarea duplicada")
    )
)]
pub async fn create_odi_entry(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<OdiEntryCreate>,
) -> impl Responder {
    if let Err(e) = require_gestion(&req) {
        return e.error_response();
    }

    match state
        .create_odi_entry(&body.tarea, &body.riesgo, &body.consecuencias, &body.precaucion)
        .await
    {
        Ok(entry) => HttpResponse::Created().json(entry),
        Err(e) => {
            if let Some(kind) = classify_conflict(&e) {
                return HttpResponse::Conflict()
                    .json(crate::ErrorResponse::new("Conflict", kind.message()));
            }
            log::error!("Failed to create ODI catalog entry: {:?}", e);
            HttpResponse::InternalServerError().json(crate::ErrorResponse::internal_error(
                "Error al crear la entrada ODI",
            ))
        }
    }
}

/// Configure document and catalog routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/epp")
            .route("/create", web::post().to(create_epp_item))
            .route("/generate-pdf", web::post().to(generate_epp_pdf)),
    )
    .service(
        web::scope("/odi")
            .route("/create", web::post().to(create_odi_entry))
            .route("/generate-pdf", web::post().to(generate_odi_pdf)),
    )
    .service(
        web::scope("/contrato")
            .route("/generate-pdf", web::post().to(generate_contrato_pdf))
            .route("/carta-aviso", web::post().to(generate_carta_aviso_pdf)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_request_carries_caller_supplied_worker_identity() {
        let json = r#"{
            "ciudad_firma": "Santiago",
            "fecha_contrato": "25 de agosto de 2026",
            "representante_legal": "María López Fuentes",
            "rut_representante": "21402714-3",
            "domicilio_representante": "Av. Providencia 1234, Providencia",
            "nombre_trabajador": "Juan Pérez Soto",
            "nacionalidad_trabajador": "chilena",
            "rut_trabajador": "21402714-3",
            "estado_civil_trabajador": "soltero",
            "fecha_nacimiento_trabajador": "12-05-1992",
            "domicilio_trabajador": "Los Aromos 56, Maipú",
            "cargo_trabajador": "Maestro Carpintero",
            "lugar_trabajo": "Obra Cerro Alto, Las Condes",
            "sueldo": "$850.000",
            "jornada": "completa",
            "descripcion_jornada": "lunes a viernes de 08:00 a 18:00 horas"
        }"#;

        let request: ContratoGenerateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.nombre_trabajador, "Juan Pérez Soto");
        assert_eq!(request.clausulas, Vec::<String>::new());

        let data = request.into_document(
            "Constructora Andes SpA".to_string(),
            "76543210-K".to_string(),
        );
        match data {
            DocumentData::Contrato(c) => {
                // Identity fields come from the payload, untouched
                assert_eq!(c.nombre_trabajador, "Juan Pérez Soto");
                assert_eq!(c.nacionalidad_trabajador, "chilena");
                assert_eq!(c.fecha_nacimiento_trabajador, "12-05-1992");
                assert_eq!(c.domicilio_trabajador, "Los Aromos 56, Maipú");
                assert_eq!(c.cargo_trabajador, "Maestro Carpintero");
                assert_eq!(c.fecha_contrato, "25 de agosto de 2026");
                // Only the company block is filled in by the server
                assert_eq!(c.empresa_nombre, "Constructora Andes SpA");
                assert_eq!(c.empresa_rut, "76543210-K");
            }
            other => panic!("expected a contract, got {:?}", other),
        }
    }

    #[test]
    fn test_contract_request_rejects_missing_identity_fields() {
        let json = r#"{
            "ciudad_firma": "Santiago",
            "rut_trabajador": "21402714-3",
            "sueldo": "$850.000"
        }"#;
        let result: Result<ContratoGenerateRequest, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
