//! Unit tests for authentication module

#[cfg(test)]
mod tests {
    use crate::auth::jwt::{generate_access_token, generate_refresh_token, validate_token};
    use crate::auth::model::{AuthContext, Claims, LoginRequest, TokenResponse};

    #[test]
    fn test_generate_and_validate_access_token() {
        let token = generate_access_token(42, 7, 1).expect("Failed to generate access token");

        let claims = validate_token(&token).expect("Failed to validate token");

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.empresa_id, "7");
        assert_eq!(claims.rol, "1");
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn test_token_contains_correct_claims() {
        let token = generate_access_token(5, 3, 2).expect("Failed to generate token");

        let claims = validate_token(&token).expect("Failed to validate token");

        assert!(!claims.sub.is_empty());
        assert!(!claims.empresa_id.is_empty());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_invalid_token_returns_error() {
        let result = validate_token("invalid.token.here");
        assert!(result.is_err());
    }

    #[test]
    fn test_refresh_token_is_opaque_and_unique() {
        let a = generate_refresh_token();
        let b = generate_refresh_token();

        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
        // Not a JWT, so it must not decode as one
        assert!(validate_token(&a).is_err());
    }

    #[test]
    fn test_claims_clone() {
        let claims = Claims {
            sub: "42".to_string(),
            empresa_id: "7".to_string(),
            rol: "1".to_string(),
            exp: 12345,
            iat: 12340,
            token_type: "access".to_string(),
        };

        let cloned = claims.clone();

        assert_eq!(claims.sub, cloned.sub);
        assert_eq!(claims.empresa_id, cloned.empresa_id);
        assert_eq!(claims.rol, cloned.rol);
        assert_eq!(claims.exp, cloned.exp);
        assert_eq!(claims.token_type, cloned.token_type);
    }

    #[test]
    fn test_login_request_deserialize() {
        let json = r#"{"email": "contacto@empresa.cl", "password": "secreto123"}"#;
        let request: LoginRequest = serde_json::from_str(json).expect("Failed to deserialize");

        assert_eq!(request.email, "contacto@empresa.cl");
        assert_eq!(request.password, "secreto123");
    }

    #[test]
    fn test_token_response_serialize() {
        let response = TokenResponse {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 1800,
            usuario_id: 42,
            empresa_id: 7,
            rol: 1,
        };

        let json = serde_json::to_string(&response).expect("Failed to serialize");

        assert!(json.contains("access_token"));
        assert!(json.contains("refresh_token"));
        assert!(json.contains("expires_in"));
        assert!(json.contains("empresa_id"));
    }

    #[test]
    fn test_role_gate() {
        let admin = AuthContext {
            usuario_id: 1,
            empresa_id: 1,
            rol: 1,
        };
        let contador = AuthContext { rol: 2, ..admin };
        let consulta = AuthContext { rol: 3, ..admin };

        assert!(admin.puede_gestionar());
        assert!(contador.puede_gestionar());
        assert!(!consulta.puede_gestionar());
    }
}
