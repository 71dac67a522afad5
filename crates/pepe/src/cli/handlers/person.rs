use anyhow::Result;
use clap::ArgMatches;
use pepe_core::{
    domain::parse_date_of_birth, NewPerson, PersonId, PersonSearchCriteria, PersonService,
    PersonUpdate, SqliteStore,
};

use super::{arg, opt_arg};

pub async fn handle(matches: &ArgMatches, persons: &PersonService<SqliteStore>) -> Result<()> {
    match matches.subcommand() {
        Some(("create", m)) => {
            let person = NewPerson::new(
                arg(m, "first-name")?,
                arg(m, "last-name")?,
                parse_date_of_birth(arg(m, "date-of-birth")?)?,
                arg(m, "address")?,
            )?;
            let id = persons.create_person(person).await?;
            println!("{id}");
        }
        Some(("update", m)) => {
            let id = PersonId::parse(arg(m, "id")?)?;
            let update = PersonUpdate::new(arg(m, "address")?)?;
            persons.update_person(id, update).await?;
            println!("Updated person {id}");
        }
        Some(("show", m)) => {
            let id = PersonId::parse(arg(m, "id")?)?;
            println!("{}", persons.retrieve_person(id).await?);
        }
        Some(("find", m)) => {
            let criteria = PersonSearchCriteria {
                first_name: opt_arg(m, "first-name").map(str::to_string),
                last_name: opt_arg(m, "last-name").map(str::to_string),
            };
            for person in persons.find_persons(&criteria).await? {
                println!("{person}");
            }
        }
        Some(("delete", m)) => {
            let id = PersonId::parse(arg(m, "id")?)?;
            persons.delete_person(id).await?;
            println!("Deleted person {id}");
        }
        _ => anyhow::bail!("Unknown person subcommand. Run 'pepe person --help' for usage."),
    }
    Ok(())
}
