use serv::config::ServerConfig;
use serv::console;
use serv::jail::SystemCredentials;
use serv::resolver::Resolver;
use serv::server::{bootstrap, listener};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = match ServerConfig::from_args(std::env::args_os()) {
        Ok(cfg) => cfg,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    let ready = match bootstrap::bootstrap(&cfg, SystemCredentials) {
        Ok(ready) => ready,
        Err(e) => {
            tracing::error!(error = %e, "Bootstrap failed");
            return Err(e.into());
        }
    };
    console::print_banner(&ready.banner);

    tokio::select! {
        res = listener::run(ready.listener, Resolver::jailed()) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
