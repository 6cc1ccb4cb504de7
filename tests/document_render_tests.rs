use gestion_laboral_server::documents::layout::{Block, StyleSheet};
use gestion_laboral_server::documents::model::EppItem;
use gestion_laboral_server::documents::render::{FooterSpec, SignatureParty};
use gestion_laboral_server::documents::{DocumentData, EppData, Renderer};

fn footer() -> FooterSpec {
    FooterSpec {
        empleador: SignatureParty {
            nombre: "Constructora Andes SpA".to_string(),
            rut: "76543210-K".to_string(),
            rol: "EMPLEADOR".to_string(),
        },
        trabajador: SignatureParty {
            nombre: "Juan Pérez Soto".to_string(),
            rut: "21402714-3".to_string(),
            rol: "TRABAJADOR".to_string(),
        },
    }
}

fn epp_data(n_items: usize) -> DocumentData {
    let elementos = (0..n_items)
        .map(|i| EppItem {
            elemento_proteccion: format!("Elemento de protección número {}", i + 1),
            cantidad: Some(1),
            fecha_entrega: None,
        })
        .collect();
    DocumentData::EntregaEpp(EppData {
        nombre: "Juan Pérez Soto".to_string(),
        rut: "21402714-3".to_string(),
        cargo: "Soldador".to_string(),
        empresa_nombre: "Constructora Andes SpA".to_string(),
        empresa_rut: "76543210-K".to_string(),
        elementos,
    })
}

#[test]
fn test_render_to_file_writes_a_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("salida.pdf");

    let blocks = epp_data(3).build_blocks(&StyleSheet::default());
    Renderer::new()
        .render_to_file("Registro de Entrega de EPP", &blocks, &footer(), &path)
        .unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert!(bytes.len() > 1000);
}

#[test]
fn test_long_table_produces_larger_document() {
    // 80 rows cannot fit on one A4 page, so the paginated output must be
    // substantially larger than the single-page one.
    let dir = tempfile::tempdir().unwrap();
    let short_path = dir.path().join("corto.pdf");
    let long_path = dir.path().join("largo.pdf");

    let renderer = Renderer::new();
    let styles = StyleSheet::default();

    renderer
        .render_to_file(
            "Registro de Entrega de EPP",
            &epp_data(2).build_blocks(&styles),
            &footer(),
            &short_path,
        )
        .unwrap();
    renderer
        .render_to_file(
            "Registro de Entrega de EPP",
            &epp_data(80).build_blocks(&styles),
            &footer(),
            &long_path,
        )
        .unwrap();

    let short_len = std::fs::metadata(&short_path).unwrap().len();
    let long_len = std::fs::metadata(&long_path).unwrap().len();
    assert!(long_len > short_len);

    // Multiple /Page objects indicate the table actually split
    let bytes = std::fs::read(&long_path).unwrap();
    let text = String::from_utf8_lossy(&bytes);
    let pages = text.matches("/Type /Page").count();
    assert!(pages > 1, "expected a multi-page document, got {}", pages);
}

#[test]
fn test_empty_paragraph_does_not_panic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vacio.pdf");

    let styles = StyleSheet::default();
    let blocks = vec![
        Block::Title("DOCUMENTO".to_string()),
        Block::paragraph("", styles.legal),
        Block::Spacer(3.0),
    ];

    Renderer::new()
        .render_to_file("Documento", &blocks, &footer(), &path)
        .unwrap();
    assert!(path.exists());
}

#[test]
fn test_generate_writes_unique_artifacts() {
    // All generate() calls live in this one test because they share the
    // PDF_OUTPUT_DIR environment variable.
    let dir = tempfile::tempdir().unwrap();
    unsafe {
        std::env::set_var("PDF_OUTPUT_DIR", dir.path());
    }

    let renderer = Renderer::new();
    let first = renderer.generate(&epp_data(2)).unwrap();
    let second = renderer.generate(&epp_data(2)).unwrap();

    assert!(first.path.exists());
    assert!(second.path.exists());
    assert_ne!(first.path, second.path);
    assert_eq!(first.filename, "entrega_epp_21402714-3.pdf");

    let name = first.path.file_name().unwrap().to_string_lossy();
    assert!(name.starts_with("entrega_epp_21402714-3_"));
    assert!(name.ends_with(".pdf"));

    // Invalid data is rejected before anything touches the filesystem
    let invalid = epp_data(0);
    assert!(renderer.generate(&invalid).is_err());
}
