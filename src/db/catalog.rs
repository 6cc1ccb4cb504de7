//! Catalog lookups (cargo, AFP, salud, territorial) and the EPP/ODI
//! catalogs, plus structured conflict classification.
//!
//! Name lookups are case-insensitive exact matches; a miss is reported by
//! the caller as a not-found failure naming the missing entity.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Cargo {
    pub id_cargo: i32,
    pub id_empresa: i32,
    pub nombre: String,
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Afp {
    pub id_afp: i32,
    pub nombre: String,
    pub porcentaje_descuento: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Salud {
    pub id_salud: i32,
    pub nombre: String,
    /// true = isapre, false = Fonasa
    pub tipo: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Territorial {
    pub id_territorial: i32,
    pub region: String,
    pub provincia: Option<String>,
    pub comuna: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct EppCatalogItem {
    pub id_epp: i32,
    pub id_empresa: i32,
    pub epp: String,
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct OdiCatalogEntry {
    pub id_odi: i32,
    pub tarea: String,
    pub riesgo: String,
    pub consecuencias: String,
    pub precaucion: String,
}

/// Cause of a uniqueness/foreign-key conflict, classified from the
/// structured constraint name the database reports. Classification never
/// inspects error message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    EppNombreDuplicado,
    EppDescripcionDuplicada,
    OdiTareaDuplicada,
    EmpresaInexistente,
    Otro,
}

impl ConflictKind {
    pub fn message(self) -> &'static str {
        match self {
            ConflictKind::EppNombreDuplicado => "Ya existe un EPP con este nombre",
            ConflictKind::EppDescripcionDuplicada => "Ya existe un EPP con esta descripción",
            ConflictKind::OdiTareaDuplicada => "Ya existe una tarea ODI con este nombre",
            ConflictKind::EmpresaInexistente => "La empresa especificada no existe",
            ConflictKind::Otro => "Conflicto de datos",
        }
    }
}

/// Classify a sqlx error as a data conflict, if it is one.
pub fn classify_conflict(err: &sqlx::Error) -> Option<ConflictKind> {
    let db = err.as_database_error()?;
    match db.kind() {
        sqlx::error::ErrorKind::UniqueViolation | sqlx::error::ErrorKind::ForeignKeyViolation => {}
        _ => return None,
    }
    Some(match db.constraint() {
        Some("epp_nombre_unique") => ConflictKind::EppNombreDuplicado,
        Some("epp_descripcion_unique") => ConflictKind::EppDescripcionDuplicada,
        Some("odi_tarea_unique") => ConflictKind::OdiTareaDuplicada,
        Some("fk_epp_empresa") | Some("fk_trabajador_empresa") => ConflictKind::EmpresaInexistente,
        _ => ConflictKind::Otro,
    })
}

impl AppState {
    /// Find a cargo by name within a company (case-insensitive exact match).
    pub async fn find_cargo(
        &self,
        empresa_id: i32,
        nombre: &str,
    ) -> Result<Option<Cargo>, sqlx::Error> {
        sqlx::query_as::<_, Cargo>(
            "SELECT id_cargo, id_empresa, nombre, descripcion FROM cargo \
             WHERE id_empresa = $1 AND LOWER(nombre) = LOWER($2)",
        )
        .bind(empresa_id)
        .bind(nombre)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find an AFP by name, through the cache.
    pub async fn find_afp(&self, nombre: &str) -> Result<Option<Afp>, sqlx::Error> {
        let key = nombre.trim().to_lowercase();
        if let Some(hit) = self.afp_cache.get(&key).await {
            return Ok(Some(hit));
        }
        let row = sqlx::query_as::<_, Afp>(
            "SELECT id_afp, nombre, porcentaje_descuento FROM afp WHERE LOWER(nombre) = $1",
        )
        .bind(&key)
        .fetch_optional(&self.pool)
        .await?;
        if let Some(ref afp) = row {
            self.afp_cache.insert(key, afp.clone()).await;
        }
        Ok(row)
    }

    /// Find a health provider by name, through the cache.
    pub async fn find_salud(&self, nombre: &str) -> Result<Option<Salud>, sqlx::Error> {
        let key = nombre.trim().to_lowercase();
        if let Some(hit) = self.salud_cache.get(&key).await {
            return Ok(Some(hit));
        }
        let row = sqlx::query_as::<_, Salud>(
            "SELECT id_salud, nombre, tipo FROM salud WHERE LOWER(nombre) = $1",
        )
        .bind(&key)
        .fetch_optional(&self.pool)
        .await?;
        if let Some(ref salud) = row {
            self.salud_cache.insert(key, salud.clone()).await;
        }
        Ok(row)
    }

    /// Find a territorial entry by region and commune names.
    pub async fn find_territorial(
        &self,
        region: &str,
        comuna: &str,
    ) -> Result<Option<Territorial>, sqlx::Error> {
        sqlx::query_as::<_, Territorial>(
            "SELECT id_territorial, region, provincia, comuna FROM territorial \
             WHERE LOWER(region) = LOWER($1) AND LOWER(comuna) = LOWER($2)",
        )
        .bind(region)
        .bind(comuna)
        .fetch_optional(&self.pool)
        .await
    }

    /// Insert an EPP catalog item. Conflicts surface as sqlx errors and are
    /// classified by the handler via [`classify_conflict`].
    pub async fn create_epp_item(
        &self,
        empresa_id: i32,
        epp: &str,
        descripcion: Option<&str>,
    ) -> Result<EppCatalogItem, sqlx::Error> {
        sqlx::query_as::<_, EppCatalogItem>(
            "INSERT INTO epp (id_empresa, epp, descripcion) VALUES ($1, $2, $3) \
             RETURNING id_epp, id_empresa, epp, descripcion",
        )
        .bind(empresa_id)
        .bind(epp)
        .bind(descripcion)
        .fetch_one(&self.pool)
        .await
    }

    /// Insert an ODI catalog entry (task / risk / consequence / precaution).
    pub async fn create_odi_entry(
        &self,
        tarea: &str,
        riesgo: &str,
        consecuencias: &str,
        precaucion: &str,
    ) -> Result<OdiCatalogEntry, sqlx::Error> {
        sqlx::query_as::<_, OdiCatalogEntry>(
            "INSERT INTO odi (tarea, riesgo, consecuencias, precaucion) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id_odi, tarea, riesgo, consecuencias, precaucion",
        )
        .bind(tarea)
        .bind(riesgo)
        .bind(consecuencias)
        .bind(precaucion)
        .fetch_one(&self.pool)
        .await
    }
}
