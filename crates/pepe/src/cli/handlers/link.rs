use anyhow::Result;
use clap::ArgMatches;
use pepe_core::{AssociationManager, PersonId, PetId, SqliteStore};

use super::arg;

fn ids(matches: &ArgMatches) -> Result<(PersonId, PetId)> {
    Ok((
        PersonId::parse(arg(matches, "person-id")?)?,
        PetId::parse(arg(matches, "pet-id")?)?,
    ))
}

pub async fn handle(matches: &ArgMatches, links: &AssociationManager<SqliteStore>) -> Result<()> {
    match matches.subcommand() {
        Some(("add", m)) => {
            let (person_id, pet_id) = ids(m)?;
            links.add_link(person_id, pet_id).await?;
            println!("Linked pet {pet_id} to person {person_id}");
        }
        Some(("remove", m)) => {
            let (person_id, pet_id) = ids(m)?;
            links.remove_link(person_id, pet_id).await?;
            println!("Unlinked pet {pet_id} from person {person_id}");
        }
        Some(("list", m)) => {
            let person_id = PersonId::parse(arg(m, "person-id")?)?;
            for pet_id in links.list_links(person_id).await? {
                println!("{pet_id}");
            }
        }
        _ => anyhow::bail!("Unknown link subcommand. Run 'pepe link --help' for usage."),
    }
    Ok(())
}
