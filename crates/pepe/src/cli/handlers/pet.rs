use anyhow::Result;
use clap::ArgMatches;
use pepe_core::{NewPet, PetId, PetService, SqliteStore, ValidationError};

use super::arg;

fn new_pet(matches: &ArgMatches) -> Result<NewPet> {
    let age = arg(matches, "age")?;
    let years = age.trim().parse::<i64>().map_err(|e| ValidationError::Malformed {
        field: "age",
        value: age.to_string(),
        reason: e.to_string(),
    })?;
    Ok(NewPet::new(arg(matches, "name")?, years)?)
}

pub async fn handle(matches: &ArgMatches, pets: &PetService<SqliteStore>) -> Result<()> {
    match matches.subcommand() {
        Some(("create", m)) => {
            let id = pets.create_pet(new_pet(m)?).await?;
            println!("{id}");
        }
        Some(("update", m)) => {
            let id = PetId::parse(arg(m, "id")?)?;
            pets.update_pet(id, new_pet(m)?).await?;
            println!("Updated pet {id}");
        }
        Some(("show", m)) => {
            let id = PetId::parse(arg(m, "id")?)?;
            println!("{}", pets.retrieve_pet(id).await?);
        }
        Some(("list", _)) => {
            for pet in pets.retrieve_all_pets().await? {
                println!("{pet}");
            }
        }
        Some(("delete", m)) => {
            let id = PetId::parse(arg(m, "id")?)?;
            pets.delete_pet(id).await?;
            println!("Deleted pet {id}");
        }
        _ => anyhow::bail!("Unknown pet subcommand. Run 'pepe pet --help' for usage."),
    }
    Ok(())
}
