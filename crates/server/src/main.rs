//! signbankd - SignBank server binary

use clap::Parser;
use rust_decimal::Decimal;
use signbank_core::Amount;
use signbank_server::{server, AppState};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "signbankd")]
#[command(about = "SignBank - signed transfer authorization server", long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:42000")]
    listen: SocketAddr,

    /// Opening balance granted to every newly registered account
    #[arg(long, default_value = "1000")]
    initial_balance: Decimal,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "signbank_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let opening_balance = Amount::new(cli.initial_balance)
        .map_err(|e| anyhow::anyhow!("invalid --initial-balance: {e}"))?;
    let state = AppState::new(opening_balance);

    let listener = TcpListener::bind(cli.listen).await?;
    tracing::info!(listen = %cli.listen, "signbank server running");

    server::run(listener, state).await?;
    Ok(())
}
