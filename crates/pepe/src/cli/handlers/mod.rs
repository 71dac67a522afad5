mod link;
mod person;
mod pet;

use anyhow::{Context, Result};
use clap::ArgMatches;
use pepe_core::{AssociationManager, PepeConfig, PersonService, PetService, SqliteStore};

/// The three services over one shared store.
pub struct Services {
    store: SqliteStore,
    persons: PersonService<SqliteStore>,
    pets: PetService<SqliteStore>,
    links: AssociationManager<SqliteStore>,
}

impl Services {
    pub async fn open(config: &PepeConfig) -> Result<Self> {
        let store = SqliteStore::open(&config.database)
            .await
            .with_context(|| format!("Failed to open database {}", config.database.url))?;

        Ok(Self {
            persons: PersonService::new(store.clone()),
            pets: PetService::new(store.clone(), config.features),
            links: AssociationManager::new(store.clone()),
            store,
        })
    }

    pub async fn close(&self) {
        self.store.close().await;
    }
}

pub async fn dispatch(matches: &ArgMatches, services: &Services) -> Result<()> {
    tracing::debug!(command = ?matches.subcommand_name(), "dispatching");
    match matches.subcommand() {
        Some(("person", sub_m)) => person::handle(sub_m, &services.persons).await,
        Some(("pet", sub_m)) => pet::handle(sub_m, &services.pets).await,
        Some(("link", sub_m)) => link::handle(sub_m, &services.links).await,
        _ => anyhow::bail!("Unknown command. Run 'pepe --help' for usage."),
    }
}

fn arg<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("Missing argument --{name}"))
}

fn opt_arg<'a>(matches: &'a ArgMatches, name: &str) -> Option<&'a str> {
    matches.get_one::<String>(name).map(String::as_str)
}
