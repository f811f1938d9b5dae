//! Conexão com o PostgreSQL
//!
//! Cria o pool a partir da configuração e aplica as migrações de
//! `migrations/` na inicialização.

use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;

pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        info!("🗄️ Conectando ao banco: {}", mask_database_url(&config.url));
        let pool = config.create_pool().await?;
        info!("✅ Banco de dados conectado");
        Ok(Self { pool })
    }

    /// Aplica as migrações pendentes
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("✅ Migrações aplicadas");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Mascara usuário e senha da URL do banco para os logs
pub fn mask_database_url(url: &str) -> String {
    let Some(at_pos) = url.rfind('@') else {
        return url.to_string();
    };
    let prefix_end = url.find("://").map(|p| p + 3).unwrap_or(0);
    if prefix_end > at_pos {
        return url.to_string();
    }
    format!("{}***:***@{}", &url[..prefix_end], &url[at_pos + 1..])
}
