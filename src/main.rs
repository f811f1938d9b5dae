use std::net::SocketAddr;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use locadora_backend::background::finalizar_locacoes;
use locadora_backend::build_router;
use locadora_backend::config::{DatabaseConfig, EnvironmentConfig};
use locadora_backend::database::DatabaseConnection;
use locadora_backend::repositories::PgStore;
use locadora_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Carregar variáveis de ambiente
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "locadora_backend=debug,tower_http=info".into()),
        )
        .init();

    info!("🚗 Locadora - Gestão de Locações");
    info!("================================");

    let config = EnvironmentConfig::from_env()?;

    let db = match DatabaseConnection::connect(&DatabaseConfig::new(&config.database_url)).await {
        Ok(db) => db,
        Err(e) => {
            error!("❌ Erro conectando ao banco de dados: {}", e);
            return Err(anyhow::anyhow!("Erro de banco de dados: {}", e));
        }
    };
    db.run_migrations().await?;

    let state = AppState::new(PgStore::new(db.pool().clone()), config.clone());
    let cancel = CancellationToken::new();

    let job_handle = match config.finalize_interval {
        Some(intervalo) => Some(tokio::spawn(finalizar_locacoes::run(
            state.locacao_service(),
            intervalo,
            cancel.clone(),
        ))),
        None => {
            info!("⏰ Finalização automática desativada (FINALIZE_INTERVAL_SECS=0)");
            None
        }
    };

    let app = build_router(state);
    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando em http://{}", addr);
    info!("🔍 Endpoints disponíveis:");
    info!("   GET    /health - Health check");
    info!("📄 Locações:");
    info!("   GET    /api/locacoes?status=&search= - Listar locações");
    info!("   POST   /api/locacoes - Criar locação");
    info!("   GET    /api/locacoes/:id - Obter locação");
    info!("   PUT    /api/locacoes/:id - Atualizar locação");
    info!("   DELETE /api/locacoes/:id - Excluir locação");
    info!("   GET    /api/locacoes/:id/contrato-data - Dados do contrato");
    info!("📋 Vistorias:");
    info!("   GET    /api/vistorias - Listar vistorias");
    info!("   POST   /api/vistorias - Registrar vistoria");
    info!("   GET    /api/vistorias/:id - Obter vistoria");
    info!("   PUT    /api/vistorias/:id - Atualizar vistoria");
    info!("   DELETE /api/vistorias/:id - Excluir vistoria");
    info!("💰 Movimentações:");
    info!("   GET    /api/movimentacoes?locacao_id= - Listar movimentações");
    info!("   POST   /api/movimentacoes - Lançar movimentação avulsa");
    info!("   GET    /api/movimentacoes/:id - Obter movimentação");
    info!("   PUT    /api/movimentacoes/:id - Atualizar movimentação");
    info!("   DELETE /api/movimentacoes/:id - Excluir movimentação");
    info!("⏰ Cron:");
    info!("   POST   /api/cron/finalize-locacoes - Finalizar locações vencidas");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal(cancel.clone()));

    if let Err(e) = server.await {
        error!("❌ Servidor terminou com erro: {}", e);
    }

    cancel.cancel();
    if let Some(handle) = job_handle {
        if let Err(e) = handle.await {
            error!("❌ Job de finalização terminou com erro: {}", e);
        }
    }

    info!("👋 Servidor encerrado");
    Ok(())
}

/// Sinal de desligamento graceful; também cancela os jobs em segundo plano
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ Falha ao instalar handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ Falha ao instalar handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Sinal Ctrl+C recebido, desligando servidor...");
        },
        _ = terminate => {
            info!("🛑 Sinal SIGTERM recebido, desligando servidor...");
        },
    }

    cancel.cancel();
}
