//! Template for the employment contract.
//!
//! Title, city/date line, a preamble identifying both parties, the fixed
//! terms clauses (role, workplace, salary, schedule), any caller-supplied
//! extra clauses numbered consecutively, and a closing paragraph.

use super::layout::{escape_markup, Block, StyleSheet};
use super::model::ContractData;
use super::validation::{validate_required, validate_rut, ValidationErrors};
use super::DocumentError;

const ORDINALS: [&str; 12] = [
    "PRIMERO", "SEGUNDO", "TERCERO", "CUARTO", "QUINTO", "SEXTO", "SÉPTIMO", "OCTAVO",
    "NOVENO", "DÉCIMO", "UNDÉCIMO", "DUODÉCIMO",
];

pub fn validate(data: &ContractData) -> Result<(), DocumentError> {
    let mut errors = ValidationErrors::new();
    validate_required(&data.ciudad_firma, "ciudad_firma", "Ciudad de firma", &mut errors);
    validate_required(&data.fecha_contrato, "fecha_contrato", "Fecha de contrato", &mut errors);
    validate_required(
        &data.representante_legal,
        "representante_legal",
        "Representante legal",
        &mut errors,
    );
    validate_rut(&data.rut_representante, "rut_representante", &mut errors);
    validate_required(
        &data.nombre_trabajador,
        "nombre_trabajador",
        "Nombre del trabajador",
        &mut errors,
    );
    validate_rut(&data.rut_trabajador, "rut_trabajador", &mut errors);
    validate_required(&data.cargo_trabajador, "cargo_trabajador", "Cargo", &mut errors);
    validate_required(&data.sueldo, "sueldo", "Sueldo", &mut errors);
    errors.into_result()
}

pub fn build_blocks(data: &ContractData, styles: &StyleSheet) -> Vec<Block> {
    let mut blocks = vec![
        Block::Title("CONTRATO DE TRABAJO".to_string()),
        Block::paragraph(
            format!(
                "En {}, a {}.",
                escape_markup(&data.ciudad_firma),
                escape_markup(&data.fecha_contrato)
            ),
            styles.header,
        ),
        Block::Spacer(4.2),
        Block::paragraph(preamble(data), styles.legal),
        Block::Spacer(2.0),
    ];

    let mut ordinal = 0usize;
    for clause in fixed_clauses(data)
        .into_iter()
        .chain(data.clausulas.iter().map(|c| escape_markup(c)))
    {
        blocks.push(Block::paragraph(
            format!("<b>{}:</b> {}", ordinal_label(ordinal), clause),
            styles.clause,
        ));
        ordinal += 1;
    }

    blocks.push(Block::Spacer(2.0));
    blocks.push(Block::paragraph(
        "Para constancia, las partes firman el presente contrato en dos ejemplares del mismo \
         tenor y fecha, quedando uno en poder de cada una de ellas.",
        styles.cert,
    ));

    blocks
}

fn preamble(data: &ContractData) -> String {
    format!(
        "Entre <b>{empresa}</b>, RUT {empresa_rut}, representada legalmente por don(ña) \
         {representante}, RUT {rut_rep}, domiciliado(a) en {dom_rep}, en adelante \"el empleador\", \
         y don(ña) <b>{trabajador}</b>, RUT {rut_tra}, de nacionalidad {nacionalidad}, nacido(a) \
         el {nacimiento}, estado civil {estado_civil}, domiciliado(a) en {dom_tra}, en adelante \
         \"el trabajador\", se ha convenido el siguiente contrato de trabajo:",
        empresa = escape_markup(&data.empresa_nombre),
        empresa_rut = escape_markup(&data.empresa_rut),
        representante = escape_markup(&data.representante_legal),
        rut_rep = escape_markup(&data.rut_representante),
        dom_rep = escape_markup(&data.domicilio_representante),
        trabajador = escape_markup(&data.nombre_trabajador),
        rut_tra = escape_markup(&data.rut_trabajador),
        nacionalidad = escape_markup(&data.nacionalidad_trabajador),
        nacimiento = escape_markup(&data.fecha_nacimiento_trabajador),
        estado_civil = escape_markup(&data.estado_civil_trabajador),
        dom_tra = escape_markup(&data.domicilio_trabajador),
    )
}

fn fixed_clauses(data: &ContractData) -> Vec<String> {
    vec![
        format!(
            "El trabajador se obliga a desempeñar el cargo de {} en {}, ubicado en {}.",
            escape_markup(&data.cargo_trabajador),
            escape_markup(&data.empresa_nombre),
            escape_markup(&data.lugar_trabajo),
        ),
        format!(
            "El empleador pagará al trabajador una remuneración mensual de {}, pagadera por \
             períodos vencidos el último día hábil de cada mes.",
            escape_markup(&data.sueldo),
        ),
        format!(
            "La jornada de trabajo será de tipo {}: {}.",
            escape_markup(&data.jornada),
            escape_markup(&data.descripcion_jornada),
        ),
    ]
}

fn ordinal_label(index: usize) -> String {
    ORDINALS
        .get(index)
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("CLÁUSULA {}", index + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ContractData {
        ContractData {
            ciudad_firma: "Santiago".to_string(),
            fecha_contrato: "25 de agosto de 2026".to_string(),
            empresa_nombre: "Constructora Andes SpA".to_string(),
            empresa_rut: "76543210-K".to_string(),
            representante_legal: "María López Fuentes".to_string(),
            rut_representante: "21402714-3".to_string(),
            domicilio_representante: "Av. Providencia 1234, Providencia".to_string(),
            nombre_trabajador: "Juan Pérez Soto".to_string(),
            nacionalidad_trabajador: "chilena".to_string(),
            rut_trabajador: "21402714-3".to_string(),
            estado_civil_trabajador: "soltero".to_string(),
            fecha_nacimiento_trabajador: "12 de mayo de 1992".to_string(),
            domicilio_trabajador: "Los Aromos 56, Maipú".to_string(),
            cargo_trabajador: "Maestro Carpintero".to_string(),
            lugar_trabajo: "Obra Cerro Alto, Las Condes".to_string(),
            sueldo: "$850.000".to_string(),
            jornada: "completa".to_string(),
            descripcion_jornada: "lunes a viernes de 08:00 a 18:00 horas".to_string(),
            clausulas: vec![],
        }
    }

    #[test]
    fn test_starts_with_title_and_city_date() {
        let blocks = build_blocks(&sample(), &StyleSheet::default());
        assert!(matches!(&blocks[0], Block::Title(t) if t == "CONTRATO DE TRABAJO"));
        assert!(
            matches!(&blocks[1], Block::Paragraph { text, .. } if text.contains("Santiago"))
        );
    }

    #[test]
    fn test_extra_clauses_numbered_after_fixed_ones() {
        let mut data = sample();
        data.clausulas = vec!["Cláusula de confidencialidad.".to_string()];
        let blocks = build_blocks(&data, &StyleSheet::default());
        let clause_texts: Vec<&str> = blocks
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph { text, .. } if text.starts_with("<b>") => Some(text.as_str()),
                _ => None,
            })
            .collect();
        // three fixed clauses + one extra
        assert_eq!(clause_texts.len(), 4);
        assert!(clause_texts[0].starts_with("<b>PRIMERO:</b>"));
        assert!(clause_texts[3].starts_with("<b>CUARTO:</b>"));
        assert!(clause_texts[3].contains("confidencialidad"));
    }

    #[test]
    fn test_preamble_identifies_both_parties() {
        let text = preamble(&sample());
        assert!(text.contains("Constructora Andes SpA"));
        assert!(text.contains("76543210-K"));
        assert!(text.contains("Juan Pérez Soto"));
        assert!(text.contains("chilena"));
    }

    #[test]
    fn test_ordinal_overflow_falls_back_to_number() {
        assert_eq!(ordinal_label(0), "PRIMERO");
        assert_eq!(ordinal_label(11), "DUODÉCIMO");
        assert_eq!(ordinal_label(12), "CLÁUSULA 13");
    }

    #[test]
    fn test_validation_flags_bad_representative_rut() {
        let mut data = sample();
        data.rut_representante = "11111111-9".to_string();
        let err = validate(&data).unwrap_err();
        assert!(err.to_string().contains("rut_representante"));
    }
}
