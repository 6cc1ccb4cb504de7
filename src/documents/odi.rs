//! Template for the ODI hazard disclosure (Obligación de Informar, D.S. 40).
//!
//! Hazard rows are grouped by task. Groups are emitted in lexicographic
//! ascending task order; rows keep their input order within a group. Each
//! group gets a "TAREA: <name>" heading and its own risk table, whose header
//! row the renderer repeats when the table splits across pages.

use super::common::today_spanish;
use super::layout::{escape_markup, Block, Column, StyleSheet, TableBlock};
use super::model::{OdiData, OdiRow};
use super::validation::{validate_non_empty, validate_required, validate_rut, ValidationErrors};
use super::DocumentError;

const LEGAL_TEXT_1: &str = "En cumplimiento de lo dispuesto en el artículo 21 del Decreto \
Supremo Nº 40, que obliga a los empleadores a informar oportuna y convenientemente a todos \
sus trabajadores acerca de los riesgos que entrañan sus labores, de las medidas preventivas \
y de los métodos de trabajo correctos, se deja constancia de la siguiente instrucción.";

const LEGAL_TEXT_2: &str = "Los riesgos inherentes a las tareas que desempeñará el trabajador, \
sus consecuencias posibles y las medidas de prevención correspondientes se detallan a \
continuación, agrupados por tarea:";

const CERT_TEXT: &str = "Declaro haber sido informado acerca de los riesgos asociados a las \
tareas que desempeñaré, sus consecuencias y las medidas preventivas indicadas, comprometiéndome \
a respetarlas y a consultar ante cualquier duda sobre su aplicación.";

pub fn validate(data: &OdiData) -> Result<(), DocumentError> {
    let mut errors = ValidationErrors::new();
    validate_required(&data.nombre, "nombre", "Nombre", &mut errors);
    validate_rut(&data.rut, "rut", &mut errors);
    validate_required(&data.cargo, "cargo", "Cargo", &mut errors);
    validate_non_empty(&data.filas, "filas", "Filas de riesgo", &mut errors);
    for (i, fila) in data.filas.iter().enumerate() {
        validate_required(&fila.tarea, &format!("filas[{}].tarea", i), "Tarea", &mut errors);
        validate_required(
            &fila.riesgo,
            &format!("filas[{}].riesgo", i),
            "Riesgo",
            &mut errors,
        );
    }
    errors.into_result()
}

pub fn build_blocks(data: &OdiData, styles: &StyleSheet) -> Vec<Block> {
    let mut blocks = vec![
        Block::Title("OBLIGACIÓN DE INFORMAR (D.S. 40)".to_string()),
        Block::key_value("NOMBRE", &data.nombre),
        Block::key_value("RUT", &data.rut),
        Block::key_value("CARGO", &data.cargo),
        Block::key_value("FECHA", &today_spanish()),
        Block::Spacer(5.3),
        Block::paragraph(LEGAL_TEXT_1, styles.legal),
        Block::paragraph(LEGAL_TEXT_2, styles.legal),
        Block::Spacer(2.0),
    ];

    for (tarea, filas) in group_by_task(&data.filas) {
        blocks.push(Block::paragraph(
            format!("TAREA: {}", escape_markup(&tarea)),
            styles.task_heading,
        ));
        blocks.push(Block::Table(task_table(&filas)));
        blocks.push(Block::Spacer(4.2));
    }

    blocks.push(Block::paragraph(CERT_TEXT, styles.cert));
    blocks
}

/// Group rows by exact task-name equality, groups ordered lexicographically
/// ascending, rows inside a group in input order.
fn group_by_task(filas: &[OdiRow]) -> Vec<(String, Vec<&OdiRow>)> {
    let mut groups: Vec<(String, Vec<&OdiRow>)> = Vec::new();
    for fila in filas {
        match groups.iter_mut().find(|(t, _)| *t == fila.tarea) {
            Some((_, rows)) => rows.push(fila),
            None => groups.push((fila.tarea.clone(), vec![fila])),
        }
    }
    groups.sort_by(|(a, _), (b, _)| a.cmp(b));
    groups
}

fn task_table(filas: &[&OdiRow]) -> TableBlock {
    let columns = vec![
        Column::new("RIESGO", 0.30),
        Column::new("CONSECUENCIA", 0.33),
        Column::new("PRECAUCIÓN", 0.37),
    ];

    let rows = filas
        .iter()
        .map(|f| {
            vec![
                escape_markup(&f.riesgo),
                escape_markup(&f.consecuencias),
                escape_markup(&f.precaucion),
            ]
        })
        .collect();

    TableBlock { columns, rows }
}
