use gestion_laboral_server::documents::layout::{Block, StyleSheet};
use gestion_laboral_server::documents::model::{EppItem, OdiRow};
use gestion_laboral_server::documents::{ContractData, DocumentData, EppData, OdiData};

fn epp_data(items: Vec<EppItem>) -> DocumentData {
    DocumentData::EntregaEpp(EppData {
        nombre: "Juan Pérez Soto".to_string(),
        rut: "21402714-3".to_string(),
        cargo: "Soldador".to_string(),
        empresa_nombre: "Constructora Andes SpA".to_string(),
        empresa_rut: "76543210-K".to_string(),
        elementos: items,
    })
}

fn odi_data(filas: Vec<OdiRow>) -> DocumentData {
    DocumentData::Odi(OdiData {
        nombre: "Juan Pérez Soto".to_string(),
        rut: "21402714-3".to_string(),
        cargo: "Soldador".to_string(),
        empresa_nombre: "Constructora Andes SpA".to_string(),
        empresa_rut: "76543210-K".to_string(),
        filas,
    })
}

fn odi_row(tarea: &str, riesgo: &str) -> OdiRow {
    OdiRow {
        tarea: tarea.to_string(),
        riesgo: riesgo.to_string(),
        consecuencias: "Lesiones".to_string(),
        precaucion: "Usar EPP".to_string(),
    }
}

fn contract_data(clausulas: Vec<String>) -> DocumentData {
    DocumentData::Contrato(ContractData {
        ciudad_firma: "Santiago".to_string(),
        fecha_contrato: "25 de agosto de 2026".to_string(),
        empresa_nombre: "Constructora Andes SpA".to_string(),
        empresa_rut: "76543210-K".to_string(),
        representante_legal: "María López Díaz".to_string(),
        rut_representante: "21402714-3".to_string(),
        domicilio_representante: "Av. Providencia 1234, Providencia".to_string(),
        nombre_trabajador: "Juan Pérez Soto".to_string(),
        nacionalidad_trabajador: "chilena".to_string(),
        rut_trabajador: "21402714-3".to_string(),
        estado_civil_trabajador: "soltero".to_string(),
        fecha_nacimiento_trabajador: "07-03-1990".to_string(),
        domicilio_trabajador: "Calle Los Aromos 55, Maipú".to_string(),
        cargo_trabajador: "Soldador".to_string(),
        lugar_trabajo: "Obra Parque Central".to_string(),
        sueldo: "$850.000".to_string(),
        jornada: "45 horas semanales".to_string(),
        descripcion_jornada: "lunes a viernes de 08:00 a 18:00".to_string(),
        clausulas,
    })
}

fn tables(blocks: &[Block]) -> Vec<&gestion_laboral_server::documents::layout::TableBlock> {
    blocks
        .iter()
        .filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
        .collect()
}

#[test]
fn test_epp_table_has_one_row_per_item() {
    let items = vec![
        EppItem {
            elemento_proteccion: "Casco".to_string(),
            cantidad: Some(1),
            fecha_entrega: None,
        },
        EppItem {
            elemento_proteccion: "Guantes".to_string(),
            cantidad: None,
            fecha_entrega: None,
        },
    ];
    let blocks = epp_data(items).build_blocks(&StyleSheet::default());

    let tables = tables(&blocks);
    assert_eq!(tables.len(), 1);
    let table = tables[0];
    assert_eq!(table.columns.len(), 4);
    assert_eq!(table.rows.len(), 2);
    // Missing quantity renders as an empty cell, never "None"
    assert_eq!(table.rows[1][2], "");
    assert_eq!(table.rows[0][0], "1");
    assert_eq!(table.rows[1][0], "2");
}

#[test]
fn test_epp_validation_rejects_empty_items() {
    let err = epp_data(vec![]).validate().unwrap_err();
    assert!(err.to_string().contains("validación fallida"));
}

#[test]
fn test_odi_groups_tasks_in_lexicographic_order() {
    let filas = vec![
        odi_row("Soldadura", "Proyección de partículas"),
        odi_row("Altura", "Caída a distinto nivel"),
        odi_row("Soldadura", "Radiación UV"),
    ];
    let blocks = odi_data(filas).build_blocks(&StyleSheet::default());

    // One heading + one table per distinct task, tasks sorted ascending
    let headings: Vec<&str> = blocks
        .iter()
        .filter_map(|b| match b {
            Block::Paragraph { text, .. } if text.contains("TAREA:") => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(headings.len(), 2);
    assert!(headings[0].contains("Altura"));
    assert!(headings[1].contains("Soldadura"));

    let tables = tables(&blocks);
    assert_eq!(tables.len(), 2);
    // Within "Soldadura", rows keep their input order
    assert_eq!(tables[1].rows[0][0], "Proyección de partículas");
    assert_eq!(tables[1].rows[1][0], "Radiación UV");
}

#[test]
fn test_odi_grouping_is_exact_match() {
    let filas = vec![odi_row("Soldadura", "a"), odi_row("soldadura", "b")];
    let blocks = odi_data(filas).build_blocks(&StyleSheet::default());
    assert_eq!(tables(&blocks).len(), 2);
}

#[test]
fn test_contract_numbers_caller_clauses_after_fixed_ones() {
    let blocks = contract_data(vec!["El trabajador guardará confidencialidad.".to_string()])
        .build_blocks(&StyleSheet::default());

    let clause_texts: Vec<&str> = blocks
        .iter()
        .filter_map(|b| match b {
            Block::Paragraph { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();

    assert!(clause_texts.iter().any(|t| t.contains("PRIMERO")));
    // Three fixed clauses, so the first caller clause is the fourth
    assert!(clause_texts
        .iter()
        .any(|t| t.contains("CUARTO") && t.contains("confidencialidad")));
}

#[test]
fn test_footer_names_both_parties() {
    let footer = contract_data(vec![]).footer();
    assert_eq!(footer.empleador.rol, "EMPLEADOR");
    assert_eq!(footer.trabajador.rol, "TRABAJADOR");
    assert_eq!(footer.empleador.nombre, "Constructora Andes SpA");
    assert_eq!(footer.trabajador.rut, "21402714-3");
}
