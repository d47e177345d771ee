//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use kyc_onboarding::{build_router, config::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Inicializa o logger (RUST_LOG sobrescreve o filtro padrão)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kyc_onboarding=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()?;
    let addr = app_state.settings.addr.clone();

    // Sessões abandonadas (e seus anexos pendentes) não ficam para sempre na memória
    app_state
        .sessions
        .clone()
        .spawn_sweeper(app_state.settings.session_ttl, app_state.settings.session_sweep_interval());

    let app = build_router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
