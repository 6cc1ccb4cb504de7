//! Template for the termination notice letter (carta de aviso).
//!
//! City/date, addressee fields for the worker, the invoked cause with its
//! legal article and justification, and the settlement (finiquito) logistics.

use super::layout::{escape_markup, Block, StyleSheet};
use super::model::TerminationData;
use super::validation::{validate_required, validate_rut, ValidationErrors};
use super::DocumentError;

pub fn validate(data: &TerminationData) -> Result<(), DocumentError> {
    let mut errors = ValidationErrors::new();
    validate_required(&data.ciudad, "ciudad", "Ciudad", &mut errors);
    validate_required(&data.fecha, "fecha", "Fecha", &mut errors);
    validate_required(
        &data.nombre_trabajador,
        "nombre_trabajador",
        "Nombre del trabajador",
        &mut errors,
    );
    validate_rut(&data.rut_trabajador, "rut_trabajador", &mut errors);
    validate_required(
        &data.articulo_causal,
        "articulo_causal",
        "Artículo de la causal",
        &mut errors,
    );
    validate_required(
        &data.descripcion_causal,
        "descripcion_causal",
        "Descripción de la causal",
        &mut errors,
    );
    errors.into_result()
}

pub fn build_blocks(data: &TerminationData, styles: &StyleSheet) -> Vec<Block> {
    vec![
        Block::Title("CARTA DE AVISO DE TÉRMINO DE CONTRATO".to_string()),
        Block::paragraph(
            format!(
                "En {}, a {}.",
                escape_markup(&data.ciudad),
                escape_markup(&data.fecha)
            ),
            styles.header,
        ),
        Block::Spacer(4.2),
        Block::key_value("SEÑOR(A)", &data.nombre_trabajador),
        Block::key_value("RUT", &data.rut_trabajador),
        Block::key_value("DOMICILIO", &data.domicilio_trabajador),
        Block::Spacer(5.3),
        Block::paragraph(
            format!(
                "De nuestra consideración: comunicamos a usted que <b>{empresa}</b>, RUT \
                 {empresa_rut}, ha resuelto poner término a su contrato de trabajo a contar de \
                 esta fecha, invocando la causal establecida en el {articulo} del Código del \
                 Trabajo, esto es, {descripcion}.",
                empresa = escape_markup(&data.empresa_nombre),
                empresa_rut = escape_markup(&data.empresa_rut),
                articulo = escape_markup(&data.articulo_causal),
                descripcion = escape_markup(&data.descripcion_causal),
            ),
            styles.legal,
        ),
        Block::paragraph(
            format!(
                "Los hechos en que se funda la causal invocada son los siguientes: {}",
                escape_markup(&data.justificacion)
            ),
            styles.legal,
        ),
        Block::paragraph(
            format!(
                "El finiquito correspondiente se encontrará a su disposición en {}, a partir \
                 del {}, donde podrá concurrir a suscribirlo y a percibir los haberes que \
                 procedan.",
                escape_markup(&data.lugar_finiquito),
                escape_markup(&data.fecha_finiquito),
            ),
            styles.legal,
        ),
        Block::Spacer(2.0),
        Block::paragraph("Saluda atentamente a usted,", styles.cert),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TerminationData {
        TerminationData {
            ciudad: "Valparaíso".to_string(),
            fecha: "25 de agosto de 2026".to_string(),
            empresa_nombre: "Constructora Andes SpA".to_string(),
            empresa_rut: "76543210-K".to_string(),
            nombre_trabajador: "Juan Pérez Soto".to_string(),
            rut_trabajador: "21402714-3".to_string(),
            domicilio_trabajador: "Los Aromos 56, Maipú".to_string(),
            articulo_causal: "artículo 161 inciso primero".to_string(),
            descripcion_causal: "necesidades de la empresa".to_string(),
            justificacion: "término de la obra para la cual fue contratado".to_string(),
            lugar_finiquito: "notaría de Valparaíso, Prat 500".to_string(),
            fecha_finiquito: "5 de septiembre de 2026".to_string(),
        }
    }

    #[test]
    fn test_block_order_title_fields_narrative() {
        let blocks = build_blocks(&sample(), &StyleSheet::default());
        assert!(matches!(&blocks[0], Block::Title(t) if t.contains("TÉRMINO")));
        assert!(matches!(&blocks[3], Block::KeyValueLine { label, .. } if label == "SEÑOR(A)"));
        let narrative: Vec<&str> = blocks
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(narrative.iter().any(|t| t.contains("artículo 161")));
        assert!(narrative.iter().any(|t| t.contains("finiquito")));
    }

    #[test]
    fn test_cause_and_justification_present() {
        let blocks = build_blocks(&sample(), &StyleSheet::default());
        let all_text: String = blocks
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n");
        assert!(all_text.contains("necesidades de la empresa"));
        assert!(all_text.contains("término de la obra"));
    }

    #[test]
    fn test_validation_requires_cause_article() {
        let mut data = sample();
        data.articulo_causal = String::new();
        let err = validate(&data).unwrap_err();
        assert!(err.to_string().contains("articulo_causal"));
    }
}
