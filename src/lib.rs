use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod company;
pub mod db;
pub mod documents;
pub mod rut;
pub mod worker;

pub use crate::db::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

pub async fn run() -> std::io::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    #[derive(OpenApi)]
    #[openapi(
        paths(
            crate::auth::handlers::login,
            crate::auth::handlers::refresh_token,
            crate::auth::handlers::logout,
            crate::company::handlers::get_empresa,
            crate::company::handlers::update_empresa,
            crate::worker::handlers::search_trabajadores,
            crate::worker::handlers::search_by_rut,
            crate::worker::handlers::create_trabajador,
            crate::documents::handlers::create_epp_item,
            crate::documents::handlers::create_odi_entry,
            crate::documents::handlers::generate_epp_pdf,
            crate::documents::handlers::generate_odi_pdf,
            crate::documents::handlers::generate_contrato_pdf,
            crate::documents::handlers::generate_carta_aviso_pdf
        ),
        components(
            schemas(
                auth::model::LoginRequest,
                auth::model::TokenResponse,
                auth::model::RefreshRequest,
                company::models::EmpresaUpdateRequest,
                db::Empresa,
                db::TrabajadorResumen,
                db::EppCatalogItem,
                db::OdiCatalogEntry,
                worker::models::TrabajadorCreate,
                worker::models::TrabajadorCreatedResponse,
                documents::handlers::EppGenerateRequest,
                documents::handlers::OdiGenerateRequest,
                documents::handlers::ContratoGenerateRequest,
                documents::handlers::CartaAvisoGenerateRequest,
                documents::handlers::EppItemCreate,
                documents::handlers::OdiEntryCreate,
                documents::model::EppItem,
                documents::model::OdiRow,
                ErrorResponse,
            )
        ),
        tags(
            (name = "Autenticación", description = "Login y sesiones."),
            (name = "Empresa", description = "Datos de la empresa."),
            (name = "Trabajadores", description = "Registro y búsqueda de trabajadores."),
            (name = "Catálogos", description = "Catálogos EPP y ODI."),
            (name = "Documentos", description = "Generación de documentos PDF.")
        ),
        servers(
            (url = "http://127.0.0.1:8080", description = "Localhost server")
        )
    )]
    struct ApiDoc;

    dotenvy::dotenv().ok(); // Load .env file
    let app_state = match AppState::new().await {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!("Failed to connect to database. Please check your DATABASE_URL in .env and ensure the database is running. Error: {}", e);
            std::process::exit(1);
        }
    };

    let prometheus = PrometheusMetricsBuilder::new("gestion_laboral_server")
        .endpoint("/metrics")
        .build()
        .expect("Failed to create Prometheus metrics middleware");

    log::info!("Starting server at http://0.0.0.0:8080");

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = Cors::default()
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:8080")
            .allowed_origin("http://127.0.0.1:8080")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .service(
                web::scope("/api")
                    .configure(auth::handlers::config)
                    .configure(company::handlers::config)
                    .configure(worker::handlers::config)
                    .configure(documents::handlers::config),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .backlog(8192)
    .max_connections(25000)
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind(("0.0.0.0", 8080))?
    .run()
    .await
}
