#[cfg(test)]
mod error_handling_tests {
    use gestion_laboral_server::documents::DocumentError;
    use gestion_laboral_server::ErrorResponse;
    use serde_json::json;

    #[test]
    fn test_error_response_structure() {
        let error_response = ErrorResponse::bad_request("RUT inválido");
        assert_eq!(error_response.error, "BadRequest");
        assert!(error_response.message.contains("RUT"));
    }

    #[test]
    fn test_error_response_serialization() {
        let not_found_error = ErrorResponse::not_found("Trabajador no encontrado");
        let bad_request_error = ErrorResponse::bad_request("Datos inválidos");
        let internal_error = ErrorResponse::internal_error("Error al generar el PDF");

        let not_found_json = serde_json::to_string(&not_found_error);
        assert!(not_found_json.is_ok());

        let bad_request_json = serde_json::to_string(&bad_request_error);
        assert!(bad_request_json.is_ok());

        let internal_json = serde_json::to_string(&internal_error);
        assert!(internal_json.is_ok());

        let deserialized: Result<ErrorResponse, _> =
            serde_json::from_str(&bad_request_json.unwrap());
        assert!(deserialized.is_ok());
    }

    #[test]
    fn test_validation_error_display_carries_field_detail() {
        let err = DocumentError::Invalid("[rut] RUT inválido".to_string());
        let msg = err.to_string();
        assert!(msg.starts_with("validación fallida"));
        assert!(msg.contains("[rut]"));
    }

    #[test]
    fn test_malformed_json_requests() {
        let malformed_json = "{ malformed json ";

        let result: Result<serde_json::Value, _> = serde_json::from_str(malformed_json);
        assert!(result.is_err());
    }

    #[test]
    fn test_null_values_in_json_simulation() {
        // Optional EPP item fields may be absent entirely
        let item = json!({
            "elemento_proteccion": "Casco de seguridad"
        });

        let parsed: Result<gestion_laboral_server::documents::model::EppItem, _> =
            serde_json::from_value(item);
        let parsed = parsed.expect("optional fields must default");
        assert!(parsed.cantidad.is_none());
        assert!(parsed.fecha_entrega.is_none());
    }

    #[test]
    fn test_special_characters_in_inputs() {
        let escaped = gestion_laboral_server::documents::layout::escape_markup(
            "Guantes <nitrilo> & antiparras",
        );
        assert!(!escaped.contains('<'));
        assert!(!escaped.contains('>'));
        assert!(escaped.contains("&amp;"));
    }
}
