//! Company record queries.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::AppState;
use crate::company::models::EmpresaUpdateRequest;

/// Company row. The RUT is stored as body + check digit in separate
/// columns and joined for display.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Empresa {
    pub id_empresa: i32,
    pub razon_social: String,
    pub nombre_fantasia: String,
    pub rut_empresa: String,
    pub dv_rut: String,
    pub giro: Option<String>,
    pub direccion_fisica: Option<String>,
    pub telefono: Option<String>,
    pub correo: Option<String>,
}

impl Empresa {
    /// Display form of the company RUT ("76543210-K").
    pub fn rut_display(&self) -> String {
        crate::rut::format_display(&self.rut_empresa, &self.dv_rut)
    }
}

impl AppState {
    pub async fn get_empresa(&self, empresa_id: i32) -> Result<Option<Empresa>, sqlx::Error> {
        sqlx::query_as::<_, Empresa>(
            "SELECT id_empresa, razon_social, nombre_fantasia, rut_empresa, dv_rut, giro, \
             direccion_fisica, telefono, correo FROM empresa WHERE id_empresa = $1",
        )
        .bind(empresa_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Update a company's editable fields. Returns `false` when the company
    /// does not exist.
    pub async fn update_empresa(
        &self,
        empresa_id: i32,
        data: &EmpresaUpdateRequest,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE empresa SET \
             razon_social = COALESCE($2, razon_social), \
             nombre_fantasia = COALESCE($3, nombre_fantasia), \
             giro = COALESCE($4, giro), \
             direccion_fisica = COALESCE($5, direccion_fisica), \
             telefono = COALESCE($6, telefono), \
             correo = COALESCE($7, correo) \
             WHERE id_empresa = $1",
        )
        .bind(empresa_id)
        .bind(data.razon_social.as_deref())
        .bind(data.nombre_fantasia.as_deref())
        .bind(data.giro.as_deref())
        .bind(data.direccion_fisica.as_deref())
        .bind(data.telefono.as_deref())
        .bind(data.correo.as_deref())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
