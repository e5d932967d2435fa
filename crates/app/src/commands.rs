//! One-shot subcommands.

use api_types::command::TransactionData;
use engine::{Beneficiary, EngineError, group_balances, parse_amount};
use offline::{LedgerStore, LocalStore, RefreshOutcome, RemoteAuthority};

use crate::{
    config::{AppConfig, Command},
    error::Result,
    render, run,
};

pub async fn execute<S, R>(store: &LedgerStore<S, R>, command: Command, config: &AppConfig) -> Result<()>
where
    S: LocalStore + Clone,
    R: RemoteAuthority,
{
    let symbol = config.currency_symbol.as_str();
    match command {
        Command::Status => {
            let state = store.sync_state();
            print!(
                "{}",
                render::status(&store.snapshot(), store.pending().len(), &state, symbol)
            );
        }
        Command::Balances { groups } => {
            let ledger = store.ledger();
            if groups {
                print!("{}", render::groups(&group_balances(&ledger.balances), symbol));
            } else {
                print!("{}", render::balances(&ledger, symbol));
            }
        }
        Command::Debts { name } => {
            let ledger = store.ledger();
            if ledger.balance(&name).is_none() {
                return Err(EngineError::UnknownParticipant(name).into());
            }
            print!(
                "{}",
                render::settle_up(&name, &ledger.matrix.counterparties(&name), symbol)
            );
        }
        Command::AddExpense {
            desc,
            amount,
            payer,
            beneficiary,
            category,
            date,
        } => {
            let amount = parse_amount(&amount)?;
            // Refresh first so the participant check sees the latest list.
            sync(store).await?;
            let data = TransactionData {
                date: date.unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string()),
                cat: category,
                desc,
                amount,
                payer,
                is_individual: beneficiary.is_some(),
                beneficiary: beneficiary.unwrap_or_else(|| Beneficiary::All.label().to_string()),
            };
            let outcome = store.add_transaction(data).await?;
            println!("{}", render::outcome(&outcome));
        }
        Command::ToggleVisit { index, undo } => {
            sync(store).await?;
            let outcome = store.toggle_visit(index, !undo).await?;
            println!("{}", render::outcome(&outcome));
        }
        Command::TogglePack { item, undo } => {
            sync(store).await?;
            let outcome = store.toggle_pack(&item, !undo).await?;
            println!("{}", render::outcome(&outcome));
        }
        Command::Sync => {
            if sync(store).await? {
                let outcome = store.drain().await;
                println!("{}", render::outcome(&outcome));
            } else {
                println!("Remote unreachable, {} change(s) queued.", store.pending().len());
            }
        }
        Command::Run => run::run(store, config).await?,
    }
    Ok(())
}

/// Refreshes from the remote and uses the result as the connectivity
/// signal. Returns whether the remote was reachable.
pub async fn sync<S, R>(store: &LedgerStore<S, R>) -> Result<bool>
where
    S: LocalStore + Clone,
    R: RemoteAuthority,
{
    match store.refresh().await? {
        RefreshOutcome::Refreshed => {
            if let Some(outcome) = store.set_online(true).await {
                tracing::info!(?outcome, "drained after reconnect");
            }
            Ok(true)
        }
        RefreshOutcome::Failed(reason) => {
            tracing::debug!(%reason, "remote unreachable");
            store.set_online(false).await;
            Ok(false)
        }
    }
}
