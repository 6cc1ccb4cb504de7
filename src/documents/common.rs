//! Shared helpers for document generation: Spanish dates, output directory
//! handling and unique artifact paths.

use chrono::{Datelike, Local, NaiveDate};
use std::env;
use std::path::{Path, PathBuf};

use super::{DocumentError, DocumentKind};

const DEFAULT_OUTPUT_DIR: &str = "generated_pdfs";

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Format a date in Spanish long form (e.g. "25 de agosto de 2026").
pub fn spanish_long_date(date: NaiveDate) -> String {
    let month = MONTHS[(date.month0() as usize).min(MONTHS.len() - 1)];
    format!("{} de {} de {}", date.day(), month, date.year())
}

/// Today's date in Spanish long form.
pub fn today_spanish() -> String {
    spanish_long_date(Local::now().date_naive())
}

/// Short date used inside table cells ("07-03-2026").
pub fn short_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Resolve the directory generated PDFs are written to, creating it if
/// absent. Creation is idempotent, so concurrent generations need no
/// coordination here.
pub fn output_dir() -> Result<PathBuf, DocumentError> {
    let dir = env::var("PDF_OUTPUT_DIR").unwrap_or_else(|_| DEFAULT_OUTPUT_DIR.to_string());
    let path = PathBuf::from(dir);
    std::fs::create_dir_all(&path).map_err(DocumentError::OutputDir)?;
    Ok(path)
}

/// Build a unique output path: `<prefix>_<rut>_<YYYYmmdd_HHMMSS>.pdf`.
///
/// Timestamp granularity is one second, so two generations for the same
/// subject within the same second would collide; instead of overwriting, a
/// numeric suffix is probed until the name is free.
pub fn unique_output_path(dir: &Path, kind: DocumentKind, rut: &str) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let safe_rut = sanitize_filename::sanitize(rut);
    let base = format!("{}_{}_{}", kind.file_prefix(), safe_rut, timestamp);
    probe_free_path(dir, &base)
}

fn probe_free_path(dir: &Path, base: &str) -> PathBuf {
    let candidate = dir.join(format!("{}.pdf", base));
    if !candidate.exists() {
        return candidate;
    }
    let mut n = 1u32;
    loop {
        let candidate = dir.join(format!("{}_{}.pdf", base, n));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Suggested download filename returned to the client.
pub fn download_filename(kind: DocumentKind, rut: &str) -> String {
    format!("{}_{}.pdf", kind.file_prefix(), sanitize_filename::sanitize(rut))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spanish_long_date() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
        assert_eq!(spanish_long_date(date), "25 de agosto de 2026");
        let enero = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(spanish_long_date(enero), "1 de enero de 2025");
    }

    #[test]
    fn test_short_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(short_date(date), "07-03-2026");
    }

    #[test]
    fn test_download_filename_embeds_rut() {
        let name = download_filename(DocumentKind::EntregaEpp, "21402714-3");
        assert_eq!(name, "entrega_epp_21402714-3.pdf");
    }

    #[test]
    fn test_probe_free_path_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let first = probe_free_path(dir.path(), "contrato_21402714-3_20260825_120000");
        std::fs::write(&first, b"x").unwrap();
        let second = probe_free_path(dir.path(), "contrato_21402714-3_20260825_120000");
        assert_ne!(first, second);
        assert!(second
            .file_name()
            .unwrap()
            .to_string_lossy()
            .ends_with("_1.pdf"));
        std::fs::write(&second, b"x").unwrap();
        let third = probe_free_path(dir.path(), "contrato_21402714-3_20260825_120000");
        assert!(third
            .file_name()
            .unwrap()
            .to_string_lossy()
            .ends_with("_2.pdf"));
    }
}
