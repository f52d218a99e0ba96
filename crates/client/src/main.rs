//! signbank - SignBank command-line client

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use ed25519_dalek::Signer;
use rust_decimal::Decimal;
use signbank_client::{BankClient, Keystore};
use signbank_core::Amount;
use signbank_ledger::transfer_claims_bytes;
use signbank_proto::{Request, Response, TransferRequest};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "signbank")]
#[command(about = "SignBank - signed fund transfers", long_about = None)]
struct Cli {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:42000")]
    server: String,

    /// Keystore directory
    #[arg(short, long, default_value = "./keys")]
    keys: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register an account (or log in if a local key already exists)
    Register {
        /// Account name
        name: String,
    },

    /// Confirm an existing account
    Login {
        /// Account name
        name: String,
    },

    /// Check an account balance
    Balance {
        /// Account name
        name: String,
    },

    /// List registered accounts
    Users,

    /// Sign and submit a transfer
    Transfer {
        /// Sending account (must have a local key)
        from: String,
        /// Receiving account
        to: String,
        /// Amount to transfer
        amount: Decimal,
    },

    /// Show the transaction history
    History,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let keystore = Keystore::new(&cli.keys);
    let mut client = BankClient::connect(&cli.server)
        .await
        .with_context(|| format!("cannot reach server at {}", cli.server))?;

    match cli.command {
        Commands::Register { name } => {
            // a key on disk means this name was registered from here before
            let request = if keystore.contains(&name) {
                println!("key for {name} already exists, logging in");
                Request::Login { name: name.clone() }
            } else {
                let key = keystore.generate(&name)?;
                Request::Register {
                    name: name.clone(),
                    verification_key: hex::encode(key.verifying_key().to_bytes()),
                }
            };

            match client.call(&request).await? {
                Response::Success(payload) => {
                    println!("✅ {}", payload.message.unwrap_or_else(|| "ok".to_string()));
                }
                Response::Error { message } => println!("❌ {message}"),
            }
        }

        Commands::Login { name } => {
            match client.call(&Request::Login { name }).await? {
                Response::Success(payload) => {
                    println!("✅ {}", payload.message.unwrap_or_else(|| "ok".to_string()));
                }
                Response::Error { message } => println!("❌ {message}"),
            }
        }

        Commands::Balance { name } => {
            match client.call(&Request::GetBalance { name }).await? {
                Response::Success(payload) => {
                    if let Some(balance) = payload.balance {
                        println!("Balance: {balance}");
                    }
                }
                Response::Error { message } => println!("❌ {message}"),
            }
        }

        Commands::Users => {
            match client.call(&Request::GetUsers).await? {
                Response::Success(payload) => {
                    println!("Registered accounts:");
                    for name in payload.users.unwrap_or_default() {
                        println!("  - {name}");
                    }
                }
                Response::Error { message } => println!("❌ {message}"),
            }
        }

        Commands::Transfer { from, to, amount } => {
            let key = keystore
                .load(&from)
                .with_context(|| format!("no signing key for {from}, register first"))?;

            let value = Amount::new(amount).context("amount must not be negative")?;
            let issued_at = Utc::now().to_rfc3339();

            let claims = transfer_claims_bytes(&from, &to, value, &issued_at);
            let signature = hex::encode(key.sign(&claims).to_bytes());

            let request = Request::MakeTransaction(TransferRequest {
                sender: from,
                receiver: to,
                amount,
                issued_at,
                signature,
            });

            match client.call(&request).await? {
                Response::Success(payload) => {
                    println!("✅ {}", payload.message.unwrap_or_else(|| "ok".to_string()));
                }
                Response::Error { message } => println!("❌ {message}"),
            }
        }

        Commands::History => {
            match client.call(&Request::GetTransactions).await? {
                Response::Success(payload) => {
                    let records = payload.transactions.unwrap_or_default();
                    if records.is_empty() {
                        println!("No transactions yet.");
                    }
                    for record in records {
                        let reason = record
                            .reason
                            .map(|r| format!(" ({r})"))
                            .unwrap_or_default();
                        println!(
                            "[{}] {} -> {} {} {}{}",
                            record.processed_at.to_rfc3339(),
                            record.sender,
                            record.receiver,
                            record.amount,
                            record.status,
                            reason,
                        );
                    }
                }
                Response::Error { message } => println!("❌ {message}"),
            }
        }
    }

    Ok(())
}
