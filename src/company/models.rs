use serde::Deserialize;
use utoipa::ToSchema;

/// Partial update of a company's editable fields. Omitted fields keep
/// their stored value; the RUT is immutable.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EmpresaUpdateRequest {
    pub razon_social: Option<String>,
    pub nombre_fantasia: Option<String>,
    pub giro: Option<String>,
    pub direccion_fisica: Option<String>,
    pub telefono: Option<String>,
    pub correo: Option<String>,
}
