//! Template for the EPP delivery receipt.
//!
//! Title (two lines), header fields, the Ley 16.744 legal paragraph, the
//! delivery table and the reception certification. The signature footer is
//! drawn by the renderer, not flowed here.

use super::common::{short_date, today_spanish};
use super::layout::{escape_markup, Block, Column, StyleSheet, TableBlock};
use super::model::EppData;
use super::validation::{validate_non_empty, validate_required, validate_rut, ValidationErrors};
use super::DocumentError;

const LEGAL_TEXT: &str = "Con el propósito de promover y mantener el nivel de seguridad y \
cumplimiento en lo establecido en la Ley Nº 16.744.- y sus Decretos Reglamentarios en lo \
relacionado al suministro de equipos de protección personal, por intermedio de la presente, \
se deja constancia de la provisión u entrega de los siguientes elementos de protección personal:";

const CERT_TEXT: &str = "Certifico haber recibido los elementos de protección personal, como \
así también instrucciones para su correcto uso y reconozco la OBLIGACIÓN DE USAR, conservar \
y cuidar los mismos, e informar del deterioro o extravío, conforme a lo indicado anteriormente.";

pub fn validate(data: &EppData) -> Result<(), DocumentError> {
    let mut errors = ValidationErrors::new();
    validate_required(&data.nombre, "nombre", "Nombre", &mut errors);
    validate_rut(&data.rut, "rut", &mut errors);
    validate_required(&data.cargo, "cargo", "Cargo", &mut errors);
    validate_non_empty(&data.elementos, "elementos", "Elementos", &mut errors);
    for (i, item) in data.elementos.iter().enumerate() {
        validate_required(
            &item.elemento_proteccion,
            &format!("elementos[{}].elemento_proteccion", i),
            "Elemento de protección",
            &mut errors,
        );
    }
    errors.into_result()
}

pub fn build_blocks(data: &EppData, styles: &StyleSheet) -> Vec<Block> {
    let mut blocks = vec![
        Block::Title("REGISTRO DE ENTREGA".to_string()),
        Block::Title("ELEMENTOS DE PROTECCIÓN PERSONAL".to_string()),
        Block::key_value("NOMBRE", &data.nombre),
        Block::key_value("RUT", &data.rut),
        Block::key_value("CARGO", &data.cargo),
        Block::key_value("FECHA", &today_spanish()),
        Block::Spacer(5.3),
        Block::paragraph(LEGAL_TEXT, styles.legal),
        Block::Spacer(4.2),
    ];

    blocks.push(Block::Table(delivery_table(data)));
    blocks.push(Block::Spacer(7.0));
    blocks.push(Block::paragraph(CERT_TEXT, styles.cert));

    blocks
}

/// Columns: index, element, quantity, delivery date. Missing quantity or
/// date is an empty cell, not a placeholder string.
fn delivery_table(data: &EppData) -> TableBlock {
    let columns = vec![
        Column::new("N°", 0.08),
        Column::new("ELEMENTO DE PROTECCIÓN PERSONAL", 0.54),
        Column::new("CANTIDAD", 0.15),
        Column::new("FECHA DE ENTREGA", 0.23),
    ];

    let rows = data
        .elementos
        .iter()
        .enumerate()
        .map(|(i, item)| {
            vec![
                (i + 1).to_string(),
                escape_markup(&item.elemento_proteccion),
                item.cantidad.map(|c| c.to_string()).unwrap_or_default(),
                item.fecha_entrega.map(short_date).unwrap_or_default(),
            ]
        })
        .collect();

    TableBlock { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::model::EppItem;
    use chrono::NaiveDate;

    fn sample(elementos: Vec<EppItem>) -> EppData {
        EppData {
            nombre: "Juan Pérez Soto".to_string(),
            rut: "21402714-3".to_string(),
            cargo: "Maestro Carpintero".to_string(),
            empresa_nombre: "Constructora Andes SpA".to_string(),
            empresa_rut: "76543210-K".to_string(),
            elementos,
        }
    }

    fn item(nombre: &str) -> EppItem {
        EppItem {
            elemento_proteccion: nombre.to_string(),
            cantidad: None,
            fecha_entrega: None,
        }
    }

    #[test]
    fn test_table_has_n_rows_plus_header() {
        let data = sample(vec![item("Casco"), item("Guantes"), item("Zapatos")]);
        let table = delivery_table(&data);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.columns.len(), 4);
        assert_eq!(table.columns[0].header, "N°");
        assert_eq!(table.columns[3].header, "FECHA DE ENTREGA");
    }

    #[test]
    fn test_missing_quantity_and_date_are_empty_cells() {
        let data = sample(vec![item("Casco")]);
        let table = delivery_table(&data);
        assert_eq!(table.rows[0][2], "");
        assert_eq!(table.rows[0][3], "");
    }

    #[test]
    fn test_present_quantity_and_date_render() {
        let mut it = item("Arnés");
        it.cantidad = Some(2);
        it.fecha_entrega = NaiveDate::from_ymd_opt(2026, 3, 7);
        let data = sample(vec![it]);
        let table = delivery_table(&data);
        assert_eq!(table.rows[0][0], "1");
        assert_eq!(table.rows[0][2], "2");
        assert_eq!(table.rows[0][3], "07-03-2026");
    }

    #[test]
    fn test_cell_text_escaped() {
        let data = sample(vec![item("Guantes <nitrilo> & cuero")]);
        let table = delivery_table(&data);
        assert_eq!(table.rows[0][1], "Guantes &lt;nitrilo&gt; &amp; cuero");
    }

    #[test]
    fn test_block_order() {
        let data = sample(vec![item("Casco")]);
        let blocks = build_blocks(&data, &StyleSheet::default());
        assert!(matches!(blocks[0], Block::Title(_)));
        assert!(matches!(blocks[1], Block::Title(_)));
        assert!(matches!(blocks[2], Block::KeyValueLine { .. }));
        assert!(blocks.iter().any(|b| matches!(b, Block::Table(_))));
        // certification comes after the table
        let table_idx = blocks
            .iter()
            .position(|b| matches!(b, Block::Table(_)))
            .unwrap();
        assert!(blocks[table_idx + 2..]
            .iter()
            .any(|b| matches!(b, Block::Paragraph { .. })));
    }

    #[test]
    fn test_validation_rejects_bad_rut_and_empty_items() {
        let mut data = sample(vec![]);
        data.rut = "21402714-4".to_string();
        let err = validate(&data).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("rut"));
        assert!(msg.contains("elementos"));
    }
}
