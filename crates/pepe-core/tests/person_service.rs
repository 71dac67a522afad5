//! Person lifecycle and criteria search.

mod common;

use common::{Harness, TestResult};
use pepe_core::{PersonId, PersonSearchCriteria, PersonUpdate, ServiceError};

async fn seeded() -> TestResult<Harness> {
    let h = Harness::new().await?;
    h.person("Jan", "Jansen").await?;
    h.person("Laura", "Ramos").await?;
    h.person("Jan", "de Vries").await?;
    h.person("Piet", "Jansen").await?;
    Ok(h)
}

fn names(persons: &[pepe_core::Person]) -> Vec<String> {
    persons.iter().map(pepe_core::Person::full_name).collect()
}

#[tokio::test]
async fn test_empty_criteria_returns_everyone_in_id_order() -> TestResult {
    let h = seeded().await?;

    let all = h.persons.find_persons(&PersonSearchCriteria::new()).await?;

    assert_eq!(
        names(&all),
        vec!["Jan Jansen", "Laura Ramos", "Jan de Vries", "Piet Jansen"]
    );
    assert!(all.windows(2).all(|w| w[0].id < w[1].id));
    Ok(())
}

#[tokio::test]
async fn test_first_name_only_keeps_every_last_name() -> TestResult {
    let h = seeded().await?;

    let jans = h
        .persons
        .find_persons(&PersonSearchCriteria::new().with_first_name("Jan"))
        .await?;

    assert_eq!(names(&jans), vec!["Jan Jansen", "Jan de Vries"]);
    Ok(())
}

#[tokio::test]
async fn test_both_filters_are_a_conjunction() -> TestResult {
    let h = seeded().await?;

    let criteria = PersonSearchCriteria::new()
        .with_first_name("Jan")
        .with_last_name("Jansen");
    let found = h.persons.find_persons(&criteria).await?;

    assert_eq!(names(&found), vec!["Jan Jansen"]);
    Ok(())
}

#[tokio::test]
async fn test_no_match_is_empty_not_error() -> TestResult {
    let h = seeded().await?;

    let found = h
        .persons
        .find_persons(&PersonSearchCriteria::new().with_last_name("Nobody"))
        .await?;

    assert!(found.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_duplicate_name_conflicts() -> TestResult {
    let h = Harness::new().await?;
    h.person("Jan", "Jansen").await?;

    let duplicate = h.person("Jan", "Jansen").await;

    let message = duplicate.err().map(|e| e.to_string());
    assert_eq!(
        message.as_deref(),
        Some("Could not create person, another person with the same name 'Jan Jansen' already exists")
    );
    Ok(())
}

#[tokio::test]
async fn test_update_replaces_address_only() -> TestResult {
    let h = Harness::new().await?;
    let jan = h.person("Jan", "Jansen").await?;

    h.persons
        .update_person(jan, PersonUpdate::new("Dorpsstraat 1, Utrecht")?)
        .await?;
    let person = h.persons.retrieve_person(jan).await?;

    assert_eq!(person.address, "Dorpsstraat 1, Utrecht");
    assert_eq!(person.full_name(), "Jan Jansen");
    Ok(())
}

#[tokio::test]
async fn test_missing_person_is_conflict_on_retrieve_update_delete() -> TestResult {
    let h = Harness::new().await?;
    let ghost = PersonId::new(42);
    let expected = Err(ServiceError::conflict("Person with id '42' not found"));

    assert_eq!(h.persons.retrieve_person(ghost).await.map(|_| ()), expected);
    assert_eq!(
        h.persons
            .update_person(ghost, PersonUpdate::new("Nowhere 1")?)
            .await,
        expected
    );
    assert_eq!(h.persons.delete_person(ghost).await, expected);
    assert_eq!(h.persons.find_person(ghost).await?, None);
    Ok(())
}

#[tokio::test]
async fn test_delete_person_cascades_to_links() -> TestResult {
    let h = Harness::new().await?;
    let jan = h.person("Jan", "Jansen").await?;
    let caesar = h.pet("Caesar", 3).await?;
    h.links.add_link(jan, caesar).await?;

    h.persons.delete_person(jan).await?;

    assert!(h.links.list_links(jan).await?.is_empty());
    assert!(h.pets.find_pet(caesar).await?.is_some());

    let laura = h.person("Laura", "Ramos").await?;
    h.links.add_link(laura, caesar).await?;
    assert_eq!(h.links.list_links(laura).await?, vec![caesar]);
    Ok(())
}
