//! Typed data records for each document kind.
//!
//! Request payloads arrive as flat JSON; these records are the normalized
//! field set each layout template expects. Company fields (name, RUT) are
//! merged in by the handlers before building.

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use super::layout::{Block, StyleSheet};
use super::render::{FooterSpec, SignatureParty};
use super::DocumentKind;

/// One EPP line item. Quantity and delivery date are optional; a missing
/// value renders as an empty cell.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EppItem {
    pub elemento_proteccion: String,
    #[serde(default)]
    pub cantidad: Option<u32>,
    #[serde(default)]
    pub fecha_entrega: Option<NaiveDate>,
}

/// One ODI hazard row, attached to a task.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OdiRow {
    pub tarea: String,
    pub riesgo: String,
    pub consecuencias: String,
    pub precaucion: String,
}

/// Data bag for the EPP delivery receipt.
#[derive(Debug, Clone)]
pub struct EppData {
    pub nombre: String,
    pub rut: String,
    pub cargo: String,
    pub empresa_nombre: String,
    pub empresa_rut: String,
    pub elementos: Vec<EppItem>,
}

/// Data bag for the ODI hazard disclosure.
#[derive(Debug, Clone)]
pub struct OdiData {
    pub nombre: String,
    pub rut: String,
    pub cargo: String,
    pub empresa_nombre: String,
    pub empresa_rut: String,
    pub filas: Vec<OdiRow>,
}

/// Data bag for the employment contract.
#[derive(Debug, Clone)]
pub struct ContractData {
    pub ciudad_firma: String,
    pub fecha_contrato: String,
    pub empresa_nombre: String,
    pub empresa_rut: String,
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
    /// Extra clause texts supplied by the caller, appended after the fixed
    /// terms and numbered consecutively.
    pub clausulas: Vec<String>,
}

/// Data bag for the termination notice letter.
#[derive(Debug, Clone)]
pub struct TerminationData {
    pub ciudad: String,
    pub fecha: String,
    pub empresa_nombre: String,
    pub empresa_rut: String,
    pub nombre_trabajador: String,
    pub rut_trabajador: String,
    pub domicilio_trabajador: String,
    /// Legal article backing the cause (e.g. "Art. 161 inciso 1").
    pub articulo_causal: String,
    pub descripcion_causal: String,
    pub justificacion: String,
    pub lugar_finiquito: String,
    pub fecha_finiquito: String,
}

/// Tagged union over the four document kinds. A missing field here is a
/// compile error instead of a runtime KeyError at render time.
#[derive(Debug, Clone)]
pub enum DocumentData {
    Contrato(ContractData),
    CartaAviso(TerminationData),
    EntregaEpp(EppData),
    Odi(OdiData),
}

impl DocumentData {
    pub fn kind(&self) -> DocumentKind {
        match self {
            DocumentData::Contrato(_) => DocumentKind::Contrato,
            DocumentData::CartaAviso(_) => DocumentKind::CartaAviso,
            DocumentData::EntregaEpp(_) => DocumentKind::EntregaEpp,
            DocumentData::Odi(_) => DocumentKind::Odi,
        }
    }

    /// RUT of the document's subject (the worker), used in filenames.
    pub fn subject_rut(&self) -> &str {
        match self {
            DocumentData::Contrato(d) => &d.rut_trabajador,
            DocumentData::CartaAviso(d) => &d.rut_trabajador,
            DocumentData::EntregaEpp(d) => &d.rut,
            DocumentData::Odi(d) => &d.rut,
        }
    }

    /// Field-level validation, run before any lookup or rendering.
    pub fn validate(&self) -> Result<(), super::DocumentError> {
        match self {
            DocumentData::Contrato(d) => super::contract::validate(d),
            DocumentData::CartaAviso(d) => super::termination::validate(d),
            DocumentData::EntregaEpp(d) => super::epp::validate(d),
            DocumentData::Odi(d) => super::odi::validate(d),
        }
    }

    /// Build the ordered block sequence for this document.
    pub fn build_blocks(&self, styles: &StyleSheet) -> Vec<Block> {
        match self {
            DocumentData::Contrato(d) => super::contract::build_blocks(d, styles),
            DocumentData::CartaAviso(d) => super::termination::build_blocks(d, styles),
            DocumentData::EntregaEpp(d) => super::epp::build_blocks(d, styles),
            DocumentData::Odi(d) => super::odi::build_blocks(d, styles),
        }
    }

    /// Signature footer drawn at a fixed position on every page: company on
    /// the left, worker on the right.
    pub fn footer(&self) -> FooterSpec {
        let (empresa_nombre, empresa_rut, nombre, rut) = match self {
            DocumentData::Contrato(d) => (
                &d.empresa_nombre,
                &d.empresa_rut,
                &d.nombre_trabajador,
                &d.rut_trabajador,
            ),
            DocumentData::CartaAviso(d) => (
                &d.empresa_nombre,
                &d.empresa_rut,
                &d.nombre_trabajador,
                &d.rut_trabajador,
            ),
            DocumentData::EntregaEpp(d) => (&d.empresa_nombre, &d.empresa_rut, &d.nombre, &d.rut),
            DocumentData::Odi(d) => (&d.empresa_nombre, &d.empresa_rut, &d.nombre, &d.rut),
        };
        FooterSpec {
            empleador: SignatureParty {
                nombre: empresa_nombre.clone(),
                rut: empresa_rut.clone(),
                rol: "EMPLEADOR".to_string(),
            },
            trabajador: SignatureParty {
                nombre: nombre.clone(),
                rut: rut.clone(),
                rol: "TRABAJADOR".to_string(),
            },
        }
    }

    /// Document title used as PDF metadata.
    pub fn title(&self) -> &'static str {
        match self {
            DocumentData::Contrato(_) => "Contrato de Trabajo",
            DocumentData::CartaAviso(_) => "Carta de Aviso de Término de Contrato",
            DocumentData::EntregaEpp(_) => "Registro de Entrega de EPP",
            DocumentData::Odi(_) => "Obligación de Informar",
        }
    }
}
