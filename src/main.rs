use std::future::IntoFuture;
use std::sync::Arc;

use squiggle_mcp::{
    build_app,
    config::Config,
    evaluator::SquiggleCliEvaluator,
    logging,
    mcp::stdio,
    AppState,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    let evaluator = Arc::new(SquiggleCliEvaluator::new(config.evaluator_program.clone()));
    let state = AppState::new(evaluator);

    let transport = std::env::args().nth(1).unwrap_or_else(|| "stdio".to_string());
    match transport.as_str() {
        "stdio" => {
            info!(evaluator = %config.evaluator_program, "stdio host starting");
            stdio::serve(state).await?;
        }
        "http" => {
            let app = build_app(state);
            let listener =
                tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;

            info!(
                host = %config.host,
                port = config.port,
                evaluator = %config.evaluator_program,
                "server starting"
            );

            // An interrupt terminates immediately; in-flight requests are not
            // drained.
            tokio::select! {
                served = axum::serve(listener, app.into_make_service()).into_future() => served?,
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupt received, exiting");
                }
            }
        }
        other => {
            return Err(format!("unknown transport '{other}', expected 'stdio' or 'http'").into());
        }
    }

    Ok(())
}
