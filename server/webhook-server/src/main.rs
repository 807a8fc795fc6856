//! Binary entrypoint for the webhook server.

use std::net::SocketAddr;
use std::sync::Arc;

use test_harness::Harness;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use webhook_server::github::GithubClient;
use webhook_server::notify::MailerSendNotifier;
use webhook_server::{synth, AppState, Config, Pipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  let _ = dotenvy::dotenv();
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      EnvFilter::new("webhook_server=info,test_harness=info,tower_http=info,warn")
    }))
    .with_target(false)
    .init();

  let config = Config::from_env();
  let harness = Harness::new(config.harness.clone());

  // Java runs fail fast with "Toolchain unavailable" until this succeeds.
  let provisioner = harness.clone();
  tokio::spawn(async move {
    if let Err(e) = provisioner.provision().await {
      warn!(error = %e, "toolchain provisioning failed; Java files will fail");
    }
  });

  if config.mail.recipient.is_none() {
    warn!("RECIPIENT_EMAIL not set; test reports will only be logged");
  }

  let pipeline = Pipeline::new(
    Arc::new(GithubClient::new(&config.github)),
    synth::from_config(&config.synth),
    Arc::new(MailerSendNotifier::new(&config.mail)),
    harness,
    config.mail.recipient.clone(),
  );
  let app = webhook_server::router(Arc::new(AppState::new(pipeline)));

  let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
  info!("webhook-server listening on http://{}", addr);

  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, app).await?;

  Ok(())
}
