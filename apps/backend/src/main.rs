use actix_web::{web, App, HttpServer};
use tombola_backend::middleware::{cors_middleware, RequestTrace, StructuredLogger, TraceSpan};
use tombola_backend::{build_state, routes, telemetry, AppError, AppState, ServerConfig};
use tracing::{error, info};

/// Everything that can fail before the socket is bound.
fn prepare() -> Result<(ServerConfig, AppState), AppError> {
    let config = ServerConfig::from_env()?;
    let state = build_state()
        .with_seed_file(config.seed_file.clone())
        .build()?;
    Ok((config, state))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let (config, state) = prepare().unwrap_or_else(|e| {
        error!(error = %e, "backend failed to start");
        std::process::exit(1);
    });

    info!(
        host = %config.host,
        port = config.port,
        games = state.games.store().len(),
        origins = config.cors_origins.len(),
        "tombola backend listening"
    );

    let state = web::Data::new(state);
    let origins = config.cors_origins;

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&origins))
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
