use std::path::PathBuf;
use std::sync::Arc;

use alloy::primitives::Address;
use clap::{Parser, Subcommand};
use serde::Serialize;

use console_kit::config::{load_config, KitConfig};
use console_kit::core_actions::{AccountFilter, SwapRoutesQuery};
use console_kit::messaging::{Communicator, DetachedTransport};
use console_kit::observability::logging::init_logging;
use console_kit::resilience::CancelSignal;
use console_kit::ConsoleKit;

#[derive(Parser)]
#[command(name = "console-cli")]
#[command(about = "Query the console platform API", long_about = None)]
struct Cli {
    /// TOML config file. Falls back to CONSOLE_KIT_* environment variables.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List console accounts owned by an EOA
    Accounts {
        #[arg(long)]
        eoa: Address,
        #[arg(long)]
        chain_id: Option<u64>,
        /// Keep only accounts with this Safe threshold
        #[arg(long)]
        threshold: Option<u64>,
        /// Keep only accounts with this many Safe owners
        #[arg(long)]
        owners: Option<usize>,
    },
    /// List automation subscriptions of an account
    Subscriptions {
        #[arg(long)]
        account: Address,
        #[arg(long)]
        chain_id: u64,
    },
    /// Show execution logs of an automation
    Logs {
        #[arg(long)]
        automation_id: String,
    },
    /// List kernel tasks for an executor registry
    Tasks {
        #[arg(long)]
        registry_id: String,
        #[arg(long, default_value_t = 0)]
        cursor: u64,
        #[arg(long, default_value_t = 1)]
        limit: u64,
    },
    /// Show the workflow state of a kernel task
    WorkflowState {
        #[arg(long)]
        task_id: String,
    },
    /// Show the relayer status of a deployment task
    DeploymentStatus {
        #[arg(long)]
        task_id: String,
    },
    /// Wait until a relayer task lands and print its transaction hash
    WaitRelay {
        #[arg(long)]
        task_id: String,
    },
    /// Show source and destination status of a bridging transaction
    BridgeStatus {
        #[arg(long)]
        tx_hash: String,
        #[arg(long)]
        pid: u64,
        #[arg(long)]
        from_chain_id: u64,
        #[arg(long)]
        to_chain_id: u64,
    },
    /// Quote swap routes for an asset pair
    SwapRoutes {
        #[arg(long)]
        chain_id: u64,
        #[arg(long)]
        from: Address,
        #[arg(long)]
        to: Address,
        #[arg(long)]
        owner: Address,
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "1")]
        slippage: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => KitConfig::from_env()?,
    };
    init_logging(&config.observability);

    // Read paths only; never attach to a parent host.
    let kit = ConsoleKit::new(&config, Communicator::new(Arc::new(DetachedTransport)))?;

    match cli.command {
        Commands::Accounts {
            eoa,
            chain_id,
            threshold,
            owners,
        } => {
            let filter = AccountFilter {
                chain_id,
                threshold,
                owners_count: owners,
            };
            let accounts = kit
                .core_actions
                .fetch_existing_accounts(eoa, Some(filter))
                .await?;
            print_json(&accounts)?;
        }
        Commands::Subscriptions { account, chain_id } => {
            let subscriptions = kit
                .automation_context
                .fetch_automation_subscriptions(account, chain_id)
                .await?;
            print_json(&subscriptions)?;
        }
        Commands::Logs { automation_id } => {
            let logs = kit
                .automation_context
                .fetch_automation_logs(&automation_id)
                .await?;
            print_json(&logs)?;
        }
        Commands::Tasks {
            registry_id,
            cursor,
            limit,
        } => {
            let tasks = kit
                .automation_context
                .fetch_tasks(&registry_id, cursor, limit)
                .await?;
            print_json(&tasks)?;
        }
        Commands::WorkflowState { task_id } => {
            let state = kit.automation_context.fetch_workflow_state(&task_id).await?;
            print_json(&state)?;
        }
        Commands::DeploymentStatus { task_id } => {
            let status = kit.public_deployer.fetch_deployment_status(&task_id).await?;
            print_json(&status)?;
        }
        Commands::WaitRelay { task_id } => {
            let cancel = CancelSignal::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Interrupted, stopping relay wait");
                    on_interrupt.cancel();
                }
            });

            let hash = kit
                .core_actions
                .wait_for_transaction_to_relay_until(&task_id, &cancel)
                .await?;
            print_json(&serde_json::json!({ "taskId": task_id, "transactionHash": hash }))?;
        }
        Commands::BridgeStatus {
            tx_hash,
            pid,
            from_chain_id,
            to_chain_id,
        } => {
            let status = kit
                .core_actions
                .fetch_bridging_status(&tx_hash, pid, from_chain_id, to_chain_id)
                .await?;
            print_json(&status)?;
        }
        Commands::SwapRoutes {
            chain_id,
            from,
            to,
            owner,
            amount,
            slippage,
        } => {
            let query = SwapRoutesQuery {
                chain_id,
                from_asset_address: from,
                to_asset_address: to,
                owner_address: owner,
                from_amount: amount,
                slippage,
            };
            let routes = kit.core_actions.get_swap_routes(&query).await?;
            print_json(&routes)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
