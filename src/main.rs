use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, config_from_env, router};
use clinic_core::ClinicServices;

/// Main entry point for the clinic application
///
/// Loads `.env`, builds the clinic services and serves the REST API with Swagger UI.
///
/// # Environment Variables
/// - `CLINIC_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `CLINIC_DATA_DIR`: Directory for YAML data files (default: in-memory demo data)
/// - `CLINIC_DOCTOR_ID` / `CLINIC_DOCTOR_NAME`: Acting doctor
/// - `CLINIC_REJECT_DOUBLE_BOOKING`: Refuse overlapping appointments
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic=info".parse()?)
                .add_directive("clinic_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("CLINIC_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = Arc::new(config_from_env()?);
    if cfg.reject_double_booking() {
        tracing::info!("++ Double booking is rejected");
    }
    let services = ClinicServices::open(cfg)?;

    tracing::info!("++ Starting clinic REST on {}", rest_addr);

    let app = router(AppState { services });
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
