use std::net::{IpAddr, SocketAddr};

use clap::Parser;
use eyre::WrapErr;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Loopback HTTP server for exercising webcall clients")]
struct Args {
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    #[arg(long, env = "BIND", default_value = "127.0.0.1")]
    bind: IpAddr,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let addr = SocketAddr::new(args.bind, args.port);
    let listener = TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    mock_server::run_until(listener, mock_server::shutdown::shutdown_signal())
        .await
        .wrap_err("failed to serve http")?;
    tracing::info!("bye");
    Ok(())
}
