//! Login account and refresh-session queries.

use chrono::{DateTime, Utc};

use super::AppState;
use crate::auth::model::{CuentaLogin, Sesion};

impl AppState {
    /// Look up a login account by email.
    pub async fn get_cuenta_by_correo(
        &self,
        correo: &str,
    ) -> Result<Option<CuentaLogin>, sqlx::Error> {
        sqlx::query_as::<_, CuentaLogin>(
            "SELECT lu.id_login, lu.id_usuario, lu.correo, lu.password_hash, \
             lu.email_verificado_at, lu.tipo_usuario, u.id_empresa \
             FROM login_usuario lu \
             JOIN usuario u ON lu.id_usuario = u.id_usuario \
             WHERE LOWER(lu.correo) = LOWER($1)",
        )
        .bind(correo)
        .fetch_optional(&self.pool)
        .await
    }

    /// Record a refresh session for an account.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_sesion(
        &self,
        id_login: i32,
        token_refresh: &str,
        limite: DateTime<Utc>,
        user_agent: Option<&str>,
        ip: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO sesiones (id_login, token_refresh, fecha_sesion, limite_sesion, \
             user_agent, ip) VALUES ($1, $2, NOW(), $3, $4, $5)",
        )
        .bind(id_login)
        .bind(token_refresh)
        .bind(limite)
        .bind(user_agent)
        .bind(ip)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Find a live (non-revoked, unexpired) session by its refresh token,
    /// joined with its account.
    pub async fn get_sesion_by_token(
        &self,
        token_refresh: &str,
    ) -> Result<Option<Sesion>, sqlx::Error> {
        sqlx::query_as::<_, Sesion>(
            "SELECT s.id_sesion, s.id_login, s.token_refresh, s.limite_sesion, s.revoked_at, \
             lu.id_usuario, lu.tipo_usuario, u.id_empresa \
             FROM sesiones s \
             JOIN login_usuario lu ON s.id_login = lu.id_login \
             JOIN usuario u ON lu.id_usuario = u.id_usuario \
             WHERE s.token_refresh = $1 AND s.revoked_at IS NULL AND s.limite_sesion > NOW()",
        )
        .bind(token_refresh)
        .fetch_optional(&self.pool)
        .await
    }

    /// Revoke a session (logout).
    pub async fn revoke_sesion(&self, token_refresh: &str) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE sesiones SET revoked_at = NOW() WHERE token_refresh = $1")
                .bind(token_refresh)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
