//! Configuração de variáveis de ambiente
//!
//! Este módulo lê a configuração do serviço a partir do ambiente
//! (carregado de `.env` via `dotenvy` no `main`).

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Ordem de busca da URL do banco
pub const DATABASE_URL_VARS: [&str; 3] = ["DATABASE_URL", "SUPABASE_DB_URL", "VITE_SUPABASE_DB_URL"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("nenhuma URL de banco configurada (defina {})", DATABASE_URL_VARS.join(", "))]
    MissingDatabaseUrl,

    #[error("valor inválido para {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

/// Configuração do ambiente
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub cron_secret: Option<String>,
    /// Registrar a receita da locação no livro-caixa ao criar
    pub ledger_on_create: bool,
    pub ledger_retry_attempts: u32,
    pub ledger_retry_backoff: Duration,
    /// Intervalo da finalização automática; `None` desliga o job
    pub finalize_interval: Option<Duration>,
    pub request_timeout: Duration,
}

impl EnvironmentConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Lê a configuração de uma fonte arbitrária de variáveis
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = DATABASE_URL_VARS
            .iter()
            .find_map(|key| get(*key))
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        let finalize_secs: u64 = parse_or(&get, "FINALIZE_INTERVAL_SECS", 3600)?;

        Ok(Self {
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&get, "PORT", 3000)?,
            database_url,
            cron_secret: get("CRON_SECRET"),
            ledger_on_create: parse_bool_or(&get, "LEDGER_ON_CREATE", true)?,
            ledger_retry_attempts: parse_or(&get, "LEDGER_RETRY_ATTEMPTS", 3)?,
            ledger_retry_backoff: Duration::from_millis(parse_or(
                &get,
                "LEDGER_RETRY_BACKOFF_MS",
                200,
            )?),
            finalize_interval: (finalize_secs > 0).then(|| Duration::from_secs(finalize_secs)),
            request_timeout: Duration::from_secs(parse_or(&get, "REQUEST_TIMEOUT_SECS", 30)?),
        })
    }

    /// Verificar se estamos em modo desenvolvimento
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar se estamos em modo produção
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Endereço de escuta do servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T, G>(get: &G, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        None => Ok(default),
    }
}

fn parse_bool_or<G>(get: &G, var: &'static str, default: bool) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        Some(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" | "sim" => Ok(true),
            "0" | "false" | "no" | "off" | "nao" | "não" => Ok(false),
            _ => Err(ConfigError::InvalidValue { var, value }),
        },
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<EnvironmentConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvironmentConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[("DATABASE_URL", "postgres://localhost/locadora")]).unwrap();
        assert_eq!(cfg.port, 3000);
        assert!(cfg.ledger_on_create);
        assert_eq!(cfg.ledger_retry_attempts, 3);
        assert_eq!(cfg.finalize_interval, Some(Duration::from_secs(3600)));
        assert!(cfg.cron_secret.is_none());
        assert!(cfg.is_development());
    }

    #[test]
    fn test_database_url_fallback() {
        let cfg = config(&[
            ("DATABASE_URL", ""),
            ("VITE_SUPABASE_DB_URL", "postgres://vite/db"),
        ])
        .unwrap();
        assert_eq!(cfg.database_url, "postgres://vite/db");

        let cfg = config(&[
            ("SUPABASE_DB_URL", "postgres://supabase/db"),
            ("VITE_SUPABASE_DB_URL", "postgres://vite/db"),
        ])
        .unwrap();
        assert_eq!(cfg.database_url, "postgres://supabase/db");

        assert!(matches!(config(&[]), Err(ConfigError::MissingDatabaseUrl)));
    }

    #[test]
    fn test_valores_invalidos_e_job_desligado() {
        let cfg = config(&[
            ("DATABASE_URL", "postgres://localhost/db"),
            ("FINALIZE_INTERVAL_SECS", "0"),
            ("LEDGER_ON_CREATE", "false"),
        ])
        .unwrap();
        assert!(cfg.finalize_interval.is_none());
        assert!(!cfg.ledger_on_create);

        let err = config(&[("DATABASE_URL", "postgres://localhost/db"), ("PORT", "abc")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: "PORT", .. }));
    }
}
