use actix_web::{web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use sv_api::app::{configure_routes, not_found};
use sv_api::middleware::{AccessVerifier, AuthGate};
use sv_api::routes::AppState;
use sv_core::services::auth::AuthService;
use sv_core::services::clock::SystemClock;
use sv_core::services::credentials::CredentialVerifier;
use sv_core::services::otp::OtpLedger;
use sv_core::services::sms::SmsSender;
use sv_core::services::token::{JwtCodec, TokenService, TokenServiceConfig};
use sv_infra::database::connection::create_pool;
use sv_infra::database::mysql::{MySqlTokenRepository, MySqlUserRepository};
use sv_infra::sms::{MockSms, SmsRuClient, SmsRuConfig};
use sv_shared::config::{AppConfig, SmsProviderKind};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    let bind_address = config.server.bind_address();

    let pool = create_pool(&config.database)
        .await
        .context("failed to connect to the database")?;

    let users = Arc::new(MySqlUserRepository::new(pool.clone()));
    let tokens = Arc::new(MySqlTokenRepository::new(pool));

    let token_service = Arc::new(TokenService::new(
        tokens,
        users.clone(),
        JwtCodec::new(&config.auth.access_secret, &config.auth.refresh_secret),
        TokenServiceConfig {
            access_ttl_minutes: config.auth.access_ttl_minutes,
            refresh_ttl_days: config.auth.refresh_ttl_days,
            refresh_token_salt: config.auth.refresh_token_salt.clone(),
        },
    ));

    let sms: Arc<dyn SmsSender> = match config.sms.provider {
        SmsProviderKind::Mock => {
            tracing::warn!("Using the mock SMS provider; no real messages will be sent");
            Arc::new(MockSms::new())
        }
        SmsProviderKind::SmsRu => {
            let api_key = config
                .sms
                .smsru_api_key
                .clone()
                .context("SMSRU_API_KEY is required for the smsru provider")?;
            Arc::new(SmsRuClient::new(SmsRuConfig::new(api_key))?)
        }
    };

    let auth_service = Arc::new(AuthService::new(
        users.clone(),
        Arc::new(OtpLedger::new(Arc::new(SystemClock))),
        token_service.clone(),
        CredentialVerifier::new(users, config.auth.admin_default_password.clone()),
        sms,
    ));

    let state = web::Data::new(AppState { auth_service });
    let verifier: Arc<dyn AccessVerifier> = token_service;

    tracing::info!(%bind_address, "Starting Savora API server");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(TracingLogger::default())
            .wrap(sv_api::middleware::cors::create_cors())
            .wrap(AuthGate::new(verifier.clone()))
            .configure(configure_routes::<MySqlUserRepository, MySqlTokenRepository, JwtCodec>)
            .default_service(web::route().to(not_found))
    })
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}
