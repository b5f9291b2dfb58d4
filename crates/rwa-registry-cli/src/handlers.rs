//! Command handlers
//!
//! Handlers return the lines to print instead of printing, so the binary
//! stays a thin shell and tests can inspect the output.

use crate::cli::{Cli, Command, ComponentSpec};
use crate::state;
use anyhow::{bail, Result};
use rwa_registry::{AccountId, DealId, JournalEntry, RegistryCommand, RwaRegistry};
use serde::Serialize;

/// Run one CLI invocation and return its output lines
pub fn run(cli: Cli) -> Result<Vec<String>> {
    if cli.config.is_some() && !matches!(cli.command, Command::Init { .. }) {
        tracing::warn!("--config is only read by init; the snapshot carries its own config");
    }

    match cli.command {
        Command::Init { admin, force } => init(&cli, admin, force),
        Command::Rely { caller, account } => {
            mutate(&cli, caller, RegistryCommand::Rely { account })
        }
        Command::Deny { caller, account } => {
            mutate(&cli, caller, RegistryCommand::Deny { account })
        }
        Command::RegisterType { caller, name } => {
            mutate(&cli, caller, RegistryCommand::RegisterComponentType { name })
        }
        Command::AddDeal {
            caller,
            id,
            ref components,
        } => mutate(&cli, caller, add_deal_command(id, components)),
        Command::Finalize { caller, id } => {
            mutate(&cli, caller, RegistryCommand::Finalize { deal: id })
        }
        Command::Remove { caller, id } => mutate(&cli, caller, RegistryCommand::Remove { deal: id }),
        Command::SetComponent {
            caller,
            id,
            name,
            address,
            variant,
        } => mutate(
            &cli,
            caller,
            RegistryCommand::SetComponent {
                deal: id,
                name,
                address,
                variant,
            },
        ),
        Command::RemoveComponent { caller, id, name } => mutate(
            &cli,
            caller,
            RegistryCommand::RemoveComponent { deal: id, name },
        ),
        Command::List { start, end } => {
            let registry = state::load(&cli.state)?;
            let ids = registry.iterate_deals(start, end.unwrap_or(usize::MAX))?;
            Ok(ids.iter().map(ToString::to_string).collect())
        }
        Command::Show { id } => show(&state::load(&cli.state)?, id),
        Command::Types => {
            let registry = state::load(&cli.state)?;
            Ok(registry
                .list_supported_types()
                .iter()
                .map(ToString::to_string)
                .collect())
        }
        Command::Digest => {
            let registry = state::load(&cli.state)?;
            Ok(vec![hex::encode(registry.snapshot().digest()?)])
        }
    }
}

fn add_deal_command(id: DealId, components: &[ComponentSpec]) -> RegistryCommand {
    RegistryCommand::AddDeal {
        deal: id,
        names: components.iter().map(|c| c.name).collect(),
        addresses: components.iter().map(|c| c.address).collect(),
        variants: components.iter().map(|c| c.variant).collect(),
    }
}

fn init(cli: &Cli, admin: AccountId, force: bool) -> Result<Vec<String>> {
    if cli.state.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            cli.state.display()
        );
    }
    let config = state::load_config(cli.config.as_deref())?;
    let registry = RwaRegistry::new(admin, config)?;
    state::save(&cli.state, &registry)?;
    fact_lines(registry.facts())
}

fn mutate(cli: &Cli, caller: AccountId, command: RegistryCommand) -> Result<Vec<String>> {
    let mut registry = state::load(&cli.state)?;
    let name = command.name();
    let facts = registry.execute(&caller, command)?;
    state::save(&cli.state, &registry)?;
    tracing::info!(command = name, facts = facts.len(), "command applied");
    fact_lines(&facts)
}

fn fact_lines(facts: &[JournalEntry]) -> Result<Vec<String>> {
    facts
        .iter()
        .map(|entry| Ok(serde_json::to_string(entry)?))
        .collect()
}

#[derive(Serialize)]
struct DealReport<'a> {
    id: DealId,
    status: String,
    position: usize,
    components: &'a [rwa_registry::NamedComponent],
}

fn show(registry: &RwaRegistry, id: DealId) -> Result<Vec<String>> {
    let components = registry.list_components(&id)?;
    let (status, position) = registry.status(&id);
    let report = DealReport {
        id,
        status: status.to_string(),
        position,
        components: &components,
    };
    Ok(vec![serde_json::to_string_pretty(&report)?])
}
