pub mod handlers;

use std::path::PathBuf;

use clap::{value_parser, Arg, Command};
use pepe_core::ServiceError;

pub fn build_cli() -> Command {
    Command::new("pepe")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Persons, pets, and who owns which pet")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Config file layered over the global one"),
        )
        .subcommand(cmd_person())
        .subcommand(cmd_pet())
        .subcommand(cmd_link())
}

/// Exit code for a failed command: the service error's own code,
/// `1` for anything else (validation, configuration, I/O).
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<ServiceError>()
        .map_or(1, ServiceError::exit_code)
}

fn id_arg(name: &'static str) -> Arg {
    Arg::new(name).required(true).value_name("ID")
}

fn text_arg(name: &'static str) -> Arg {
    Arg::new(name).long(name).value_name("TEXT")
}

fn cmd_person() -> Command {
    Command::new("person")
        .about("Manage persons")
        .subcommand_required(true)
        .subcommand(
            Command::new("create")
                .about("Create a person")
                .arg(text_arg("first-name").required(true))
                .arg(text_arg("last-name").required(true))
                .arg(
                    Arg::new("date-of-birth")
                        .long("date-of-birth")
                        .value_name("YYYY-MM-DD")
                        .required(true),
                )
                .arg(text_arg("address").required(true)),
        )
        .subcommand(
            Command::new("update")
                .about("Change the address of a person")
                .arg(id_arg("id"))
                .arg(text_arg("address").required(true)),
        )
        .subcommand(Command::new("show").about("Show a person").arg(id_arg("id")))
        .subcommand(
            Command::new("find")
                .about("Find persons by name; no filters lists everyone")
                .arg(text_arg("first-name"))
                .arg(text_arg("last-name")),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a person and its pet links")
                .arg(id_arg("id")),
        )
}

fn cmd_pet() -> Command {
    let age = || {
        Arg::new("age")
            .long("age")
            .value_name("YEARS")
            .required(true)
            .allow_negative_numbers(true)
    };

    Command::new("pet")
        .about("Manage pets")
        .subcommand_required(true)
        .subcommand(
            Command::new("create")
                .about("Create a pet")
                .arg(text_arg("name").required(true))
                .arg(age()),
        )
        .subcommand(
            Command::new("update")
                .about("Replace name and age of a pet")
                .arg(id_arg("id"))
                .arg(text_arg("name").required(true))
                .arg(age()),
        )
        .subcommand(Command::new("show").about("Show a pet").arg(id_arg("id")))
        .subcommand(Command::new("list").about("List all pets"))
        .subcommand(
            Command::new("delete")
                .about("Delete a pet no one owns (features.delete_pet)")
                .arg(id_arg("id")),
        )
}

fn cmd_link() -> Command {
    Command::new("link")
        .about("Manage which person owns which pet")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Link a pet to a person")
                .arg(id_arg("person-id"))
                .arg(id_arg("pet-id")),
        )
        .subcommand(
            Command::new("remove")
                .about("Unlink a pet from a person")
                .arg(id_arg("person-id"))
                .arg(id_arg("pet-id")),
        )
        .subcommand(
            Command::new("list")
                .about("List pet ids linked to a person, in link order")
                .arg(id_arg("person-id")),
        )
}

#[cfg(test)]
mod tests {
    use pepe_core::ValidationError;

    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_exit_code_per_error_kind() {
        let conflict = anyhow::Error::new(ServiceError::conflict("taken"));
        let internal = anyhow::Error::new(ServiceError::internal("boom"));
        let invalid = anyhow::Error::new(ValidationError::NotAnId {
            value: "x".to_string(),
        });

        assert_eq!(exit_code(&conflict), 3);
        assert_eq!(exit_code(&internal), 4);
        assert_eq!(exit_code(&invalid), 1);
    }

    #[test]
    fn test_link_add_parses_positional_ids() {
        let matches = build_cli().try_get_matches_from(["pepe", "link", "add", "1", "2"]);
        assert!(matches.is_ok());
    }
}
