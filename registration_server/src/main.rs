use registration_server::frameworks::server::run_with_config;

#[tokio::main]
async fn main() {
    if let Err(e) = run_with_config().await {
        tracing::error!(error = %e, "registration server stopped");
        std::process::exit(1);
    }
}
