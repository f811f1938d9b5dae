//! Configuração do projeto
//!
//! Variáveis de ambiente e configuração do pool de banco de dados.

pub mod database;
pub mod environment;

pub use database::DatabaseConfig;
pub use environment::{ConfigError, EnvironmentConfig};
