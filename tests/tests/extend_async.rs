use tests::fixtures::{ann, bob};
use tests::*;

use fieldwise::{extend_async, Entity};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn fetches_only_the_gap() {
    init_logging();

    let directory = Directory::new([ann(), bob()]);

    let mut person = Person::new(1, "Ann");
    let requested = graph("name,email,boat{name}");
    assert!(assert_ok!(extend_async(&mut person, &requested, &directory).await));

    assert_eq!(assert_ok!(person.email()), "ann@example.com");
    let boat = assert_ok!(person.boat()).unwrap();
    assert_eq!(assert_ok!(boat.name()), "Osprey");
    assert_eq!(directory.graphs(), ["email,boat{name}"]);

    directory.reset_calls();
    assert!(!assert_ok!(extend_async(&mut person, &graph("email,boat{name}"), &directory).await));
    assert_eq!(directory.call_count(), 0);
}

#[tokio::test]
async fn absent_entity_is_unavailable() {
    let directory = Directory::new([bob()]);

    let mut person = Person::reference_to(9);
    let err = assert_err!(extend_async(&mut person, &graph("name"), &directory).await);

    assert!(err.is_entity_unavailable());
    assert_eq!(err.to_string(), "entity unavailable: Person(9)");
}

#[tokio::test]
async fn resolver_errors_propagate() {
    let directory = Directory::new([ann()]);
    directory.fail_with("directory offline");

    let mut person = Person::reference_to(1);
    let err = assert_err!(extend_async(&mut person, &graph("email"), &directory).await);

    assert_eq!(err.to_string(), "directory offline");
    assert!(person.email().is_err());
}
