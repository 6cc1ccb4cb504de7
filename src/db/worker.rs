//! Worker roster queries: search, RUT lookup and transactional creation.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::QueryBuilder;
use utoipa::ToSchema;

use super::AppState;

/// Flattened roster row (trabajador + datos_trabajador + cargo).
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct TrabajadorResumen {
    pub id_trabajador: i32,
    pub nombre: String,
    pub apellido_paterno: String,
    pub apellido_materno: String,
    pub rut: String,
    pub dv_rut: String,
    pub nacionalidad: String,
    pub fecha_nacimiento: NaiveDate,
    pub direccion_real: String,
    pub cargo_nombre: Option<String>,
    pub comuna: Option<String>,
}

impl TrabajadorResumen {
    pub fn rut_display(&self) -> String {
        crate::rut::format_display(&self.rut, &self.dv_rut)
    }

    pub fn nombre_completo(&self) -> String {
        format!(
            "{} {} {}",
            self.nombre, self.apellido_paterno, self.apellido_materno
        )
    }
}

/// Resolved fields for inserting a worker. Catalog names have already been
/// looked up to ids by the handler.
#[derive(Debug, Clone)]
pub struct NuevoTrabajador {
    pub id_empresa: i32,
    pub id_afp: i32,
    pub id_territorial: i32,
    pub id_cargo: Option<i32>,
    pub id_salud: Option<i32>,
    pub nombre: String,
    pub apellido_paterno: String,
    pub apellido_materno: String,
    pub fecha_nacimiento: NaiveDate,
    pub rut: String,
    pub dv_rut: String,
    pub nacionalidad: String,
    pub direccion_real: String,
}

const SELECT_RESUMEN: &str = "SELECT dt.id_trabajador, dt.nombre, dt.apellido_paterno, \
    dt.apellido_materno, dt.rut, dt.dv_rut, dt.nacionalidad, dt.fecha_nacimiento, \
    dt.direccion_real, c.nombre AS cargo_nombre, terr.comuna \
    FROM datos_trabajador dt \
    JOIN trabajador t ON dt.id_trabajador = t.id_trabajador \
    LEFT JOIN cargo c ON t.id_cargo = c.id_cargo \
    LEFT JOIN territorial terr ON t.id_territorial = terr.id_territorial \
    WHERE t.id_empresa = ";

impl AppState {
    /// Search the company roster by optional name/surname/cargo filters
    /// (partial, case-insensitive).
    pub async fn search_trabajadores(
        &self,
        empresa_id: i32,
        nombre: Option<&str>,
        apellido_paterno: Option<&str>,
        apellido_materno: Option<&str>,
        cargo: Option<&str>,
    ) -> Result<Vec<TrabajadorResumen>, sqlx::Error> {
        let mut query = QueryBuilder::new(SELECT_RESUMEN);
        query.push_bind(empresa_id);

        if let Some(nombre) = nombre {
            query.push(" AND dt.nombre ILIKE ");
            query.push_bind(format!("%{}%", nombre));
        }
        if let Some(paterno) = apellido_paterno {
            query.push(" AND dt.apellido_paterno ILIKE ");
            query.push_bind(format!("%{}%", paterno));
        }
        if let Some(materno) = apellido_materno {
            query.push(" AND dt.apellido_materno ILIKE ");
            query.push_bind(format!("%{}%", materno));
        }
        if let Some(cargo) = cargo {
            query.push(" AND c.nombre ILIKE ");
            query.push_bind(format!("%{}%", cargo));
        }
        query.push(" ORDER BY dt.apellido_paterno, dt.nombre");

        query
            .build_query_as::<TrabajadorResumen>()
            .fetch_all(&self.pool)
            .await
    }

    /// Look up one worker by numeric RUT body within a company's roster.
    pub async fn find_trabajador_by_rut(
        &self,
        empresa_id: i32,
        rut_body: &str,
    ) -> Result<Option<TrabajadorResumen>, sqlx::Error> {
        let mut query = QueryBuilder::new(SELECT_RESUMEN);
        query.push_bind(empresa_id);
        query.push(" AND dt.rut = ");
        query.push_bind(rut_body);

        query
            .build_query_as::<TrabajadorResumen>()
            .fetch_optional(&self.pool)
            .await
    }

    /// Insert a worker and its personal-data record in one transaction.
    pub async fn create_trabajador(
        &self,
        nuevo: &NuevoTrabajador,
    ) -> Result<i32, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let id_trabajador: i32 = sqlx::query_scalar(
            "INSERT INTO trabajador (id_empresa, id_afp, id_territorial, id_cargo, id_salud) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id_trabajador",
        )
        .bind(nuevo.id_empresa)
        .bind(nuevo.id_afp)
        .bind(nuevo.id_territorial)
        .bind(nuevo.id_cargo)
        .bind(nuevo.id_salud)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO datos_trabajador (id_trabajador, nombre, apellido_paterno, \
             apellido_materno, fecha_nacimiento, rut, dv_rut, nacionalidad, direccion_real) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(id_trabajador)
        .bind(&nuevo.nombre)
        .bind(&nuevo.apellido_paterno)
        .bind(&nuevo.apellido_materno)
        .bind(nuevo.fecha_nacimiento)
        .bind(&nuevo.rut)
        .bind(&nuevo.dv_rut)
        .bind(&nuevo.nacionalidad)
        .bind(&nuevo.direccion_real)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(id_trabajador)
    }
}
