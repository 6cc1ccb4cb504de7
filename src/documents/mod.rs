//! Document generation core.
//!
//! Each document kind (contract, termination letter, EPP delivery receipt,
//! ODI hazard disclosure) maps its typed data record to an ordered sequence
//! of layout [`layout::Block`]s, which the [`render`] module paginates onto
//! A4 pages and writes as a PDF under the output directory.

pub mod common;
pub mod contract;
pub mod epp;
pub mod handlers;
pub mod layout;
pub mod model;
pub mod odi;
pub mod render;
pub mod termination;
pub mod validation;

pub use model::{ContractData, DocumentData, EppData, OdiData, TerminationData};
pub use render::Renderer;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or rendering a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Caller-fixable input problem, detected before any lookup or rendering.
    /// Entity lookups happen in the handlers, so missing-entity cases never
    /// reach this enum.
    #[error("validación fallida: {0}")]
    Invalid(String),
    #[error("failed to create output directory: {0}")]
    OutputDir(#[source] std::io::Error),
    #[error("failed to write PDF file: {0}")]
    WritePdf(#[source] std::io::Error),
    #[error("PDF assembly failed: {0}")]
    Assembly(String),
    /// The artifact was not on disk after the build call returned.
    #[error("generated file missing after render: {0}")]
    ArtifactMissing(PathBuf),
}

/// Result of a successful document generation.
#[derive(Debug)]
pub struct GeneratedDocument {
    /// Path the PDF was persisted to (unique per call).
    pub path: PathBuf,
    /// Suggested download filename, embeds the subject's RUT.
    pub filename: String,
}

/// Closed set of document kinds this service produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Contrato,
    CartaAviso,
    EntregaEpp,
    Odi,
}

impl DocumentKind {
    /// Filename prefix for the generated artifact.
    pub fn file_prefix(self) -> &'static str {
        match self {
            DocumentKind::Contrato => "contrato",
            DocumentKind::CartaAviso => "carta_aviso",
            DocumentKind::EntregaEpp => "entrega_epp",
            DocumentKind::Odi => "odi",
        }
    }
}
