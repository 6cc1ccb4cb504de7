use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Roster search filters. All partial, case-insensitive.
#[derive(Debug, Deserialize, IntoParams)]
pub struct TrabajadorSearchQuery {
    pub nombre: Option<String>,
    pub apellido_paterno: Option<String>,
    pub apellido_materno: Option<String>,
    pub cargo: Option<String>,
}

/// RUT lookup query. The body is digits only; the check digit is not part
/// of the stored key.
#[derive(Debug, Deserialize, IntoParams)]
pub struct RutQuery {
    pub rut: String,
}

/// New worker payload. Catalog references are given by name and resolved
/// to ids on insert; the RUT is given in display form with its check digit.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TrabajadorCreate {
    pub nombre: String,
    pub apellido_paterno: String,
    pub apellido_materno: String,
    pub fecha_nacimiento: NaiveDate,
    pub rut: String,
    pub nacionalidad: String,
    pub direccion_real: String,
    pub afp: String,
    pub region: String,
    pub comuna: String,
    pub cargo: Option<String>,
    pub salud: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrabajadorCreatedResponse {
    pub id_trabajador: i32,
    pub mensaje: String,
}
