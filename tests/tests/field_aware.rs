use tests::fixtures::{ann, bob, osprey};
use tests::*;

use pretty_assertions::assert_eq;

fn debug(value: &impl std::fmt::Debug) -> String {
    format!("{value:#?}")
}

#[test]
fn accessors_guard_uninitialized_fields() {
    let mut person = Person::reference_to(7);

    let err = assert_err!(person.name());
    assert!(err.is_field_unavailable());
    assert_eq!(err.to_string(), "field unavailable: Person {name}");

    person.set_name("Cy");
    assert_eq!(assert_ok!(person.name()), "Cy");
    assert!(person.has_field(PersonField::Name));
    assert!(!person.has_fields([PersonField::Name, PersonField::Email]));
}

#[test]
fn fields_can_be_checked_by_name() {
    let person = ann();

    assert!(assert_ok!(person.has_fields_named(&["name", "boat"])));
    assert!(!assert_ok!(Person::new(3, "Cy").has_fields_named(&["email"])));

    let err = assert_err!(person.has_fields_named(&["mail"]));
    assert!(err.is_unknown_field());
}

#[test]
fn clone_holds_exactly_the_graph() {
    let person = ann();
    let clone = assert_ok!(person.clone_graph(&graph("name,boat{type,homePort{name}}")));

    assert_eq!(
        *clone.fields(),
        FieldSet::from([PersonField::Name, PersonField::Boat])
    );

    let boat = assert_ok!(clone.boat()).unwrap();
    assert_eq!(
        *boat.fields(),
        FieldSet::from([BoatField::Kind, BoatField::HomePort])
    );
    assert_eq!(assert_ok!(boat.kind()), "sloop");

    let marina = assert_ok!(boat.home_port()).unwrap();
    assert_eq!(*marina.fields(), FieldSet::from([MarinaField::Name]));
    assert_eq!(assert_ok!(marina.name()), "Northport");
    assert!(marina.boats().is_err());
}

#[test]
fn clones_are_independent() {
    let person = ann();
    let mut clone = assert_ok!(person.clone_graph(&graph("boat{type,crew{name}}")));

    let boat = clone.boat_mut().unwrap();
    boat.set_kind("ketch");
    boat.crew_mut()[0].set_name("Robert");

    let original = assert_ok!(person.boat()).unwrap();
    assert_eq!(assert_ok!(original.kind()), "sloop");
    assert_eq!(assert_ok!(assert_ok!(original.crew())[0].name()), "Bob");
}

#[test]
fn clone_names_every_missing_field() {
    let err = assert_err!(Person::new(3, "Cy").clone_graph(&graph("name,email,boat")));

    assert!(err.is_field_unavailable());
    assert_eq!(err.to_string(), "field unavailable: Person {email, boat}");
}

#[test]
fn clone_all_keeps_nested_values() {
    let clone = assert_ok!(ann().clone_all());
    assert_eq!(debug(&clone), debug(&ann()));
}

#[test]
fn clone_flat_reduces_nested_values_to_references() {
    let flat = assert_ok!(ann().clone_flat());

    assert_eq!(*flat.fields(), ann().fields().clone());
    assert_eq!(assert_ok!(flat.email()), "ann@example.com");

    let boat = assert_ok!(flat.boat()).unwrap();
    assert_eq!(*boat.id(), 10);
    assert!(boat.fields().is_empty());
}

#[test]
fn flatten_in_place() {
    let mut person = ann();
    assert_ok!(person.flatten());

    assert_eq!(debug(&person), debug(&assert_ok!(ann().clone_flat())));
}

#[test]
fn intersect_strips_every_level() {
    let mut person = ann();
    assert_ok!(person.intersect(&graph("name,boat{crew{email}}")));

    assert_eq!(
        *person.fields(),
        FieldSet::from([PersonField::Name, PersonField::Boat])
    );
    assert!(person.email().is_err());

    let boat = assert_ok!(person.boat()).unwrap();
    assert_eq!(*boat.fields(), FieldSet::from([BoatField::Crew]));

    let crew = assert_ok!(boat.crew());
    assert_eq!(*crew[0].fields(), FieldSet::from([PersonField::Email]));
    assert_eq!(assert_ok!(crew[0].email()), "bob@example.com");
}

#[test]
fn intersect_is_idempotent() {
    let g = graph("email,boat{name,homePort{berths{number}}}");

    let mut once = ann();
    assert_ok!(once.intersect(&g));

    let mut twice = once.clone();
    assert_ok!(twice.intersect(&g));

    assert_eq!(debug(&once), debug(&twice));
}

#[test]
fn intersect_ignores_fields_not_held() {
    let mut person = Person::new(3, "Cy");
    assert_ok!(person.intersect(&graph("name,email,boat{name}")));

    assert_eq!(*person.fields(), FieldSet::from([PersonField::Name]));
}

#[test]
fn missing_graph_reports_only_the_gap() {
    let mut person = Person::new(1, "Ann");
    person.set_boat(Some(Boat::new(10, "Osprey")));

    let missing = assert_ok!(person.missing_graph(&graph("name,email,boat{name,type,crew{name}}")));
    assert_eq!(missing, graph("email,boat{type,crew{name}}"));

    assert!(!assert_ok!(person.has_graph(&graph("email"))));
    assert!(assert_ok!(person.has_graph(&graph("name,boat{name}"))));
}

#[test]
fn missing_graph_of_empty_nested_value_is_empty() {
    let mut person = Person::new(1, "Ann");
    person.set_boat(None);

    assert!(assert_ok!(person.has_graph(&graph("boat{name,crew{email}}"))));
}

#[test]
fn extend_fetches_only_the_gap() {
    init_logging();

    let directory = Directory::new([ann()]);
    let mut person = assert_ok!(ann().clone_graph(&graph("name,boat{name}")));

    let g = graph("name,email,boat{type,crew{name,email}}");
    assert!(assert_ok!(person.extend_from(&g, &directory)));

    assert_eq!(directory.graphs(), ["email,boat{type,crew{name,email}}"]);
    assert!(assert_ok!(person.has_graph(&g)));
    assert!(assert_ok!(person.missing_graph(&g)).is_empty());

    let boat = assert_ok!(person.boat()).unwrap();
    assert_eq!(assert_ok!(boat.name()), "Osprey");
    assert_eq!(assert_ok!(assert_ok!(boat.crew())[0].email()), "bob@example.com");
}

#[test]
fn extend_without_gap_skips_the_resolver() {
    let directory = Directory::new([ann()]);
    let mut person = ann();

    assert!(!assert_ok!(person.extend_from(&graph("name,boat{crew{name}}"), &directory)));
    assert_eq!(directory.call_count(), 0);
}

#[test]
fn extend_fails_when_entity_is_absent() {
    let directory = Directory::<Person>::new([]);
    let mut person = Person::reference_to(9);

    let err = assert_err!(person.extend_from(&graph("name"), &directory));
    assert!(err.is_entity_unavailable());
    assert_eq!(err.to_string(), "entity unavailable: Person(9)");
}

#[test]
fn extend_fails_when_extension_falls_short() {
    let mut person = Person::new(1, "Ann");

    let err = assert_err!(person.extend(&graph("email"), |_| Ok(Some(Person::new(1, "Ann")))));
    assert!(err.is_entity_unavailable());
    assert_eq!(
        err.to_string(),
        "entity unavailable: Person extension lacks {email}"
    );
    assert!(person.email().is_err());
}

#[test]
fn extend_fails_when_nested_member_vanished() {
    let mut person = assert_ok!(ann().clone_graph(&graph("boat{name}")));

    let mut gull = Boat::new(11, "Gull");
    gull.set_kind("ketch");

    let mut moved = ann();
    moved.set_boat(Some(gull));
    let directory = Directory::new([moved]);

    let err = assert_err!(person.extend_from(&graph("boat{name,type}"), &directory));
    assert!(err.is_entity_unavailable());
}

#[test]
fn extend_merges_into_every_collection_member() {
    let mut crew_only = Boat::new(10, "Osprey");
    crew_only.set_crew(vec![Person::new(2, "Bob")]);

    let directory = Directory::new([osprey()]);
    let g = graph("crew{email,boat}");

    assert!(assert_ok!(crew_only.extend_from(&g, &directory)));
    assert_eq!(directory.graphs(), ["crew{email,boat}"]);

    let crew = assert_ok!(crew_only.crew());
    assert_eq!(assert_ok!(crew[0].email()), "bob@example.com");
    assert_eq!(assert_ok!(crew[0].name()), "Bob");
}

#[test]
fn clear_fields_resets_values() {
    let mut person = ann();

    assert!(assert_ok!(person.clear_fields([PersonField::Email, PersonField::Boat])));
    assert!(person.email().is_err());
    assert!(person.boat().is_err());

    assert!(!assert_ok!(person.clear_fields([PersonField::Email])));
}

#[test]
fn pull_fields_requires_source_fields() {
    let mut person = Person::reference_to(1);
    assert_ok!(person.pull_fields(&ann(), [PersonField::Email]));
    assert_eq!(assert_ok!(person.email()), "ann@example.com");

    assert_ok!(person.pull_fields(&bob(), [PersonField::Name]));
    assert_eq!(assert_ok!(person.name()), "Bob");

    let err = assert_err!(person.pull_fields(&Person::reference_to(2), [PersonField::Name]));
    assert_eq!(err.to_string(), "field unavailable: Person {name}");
}

#[test]
fn parse_field_resolves_names() {
    assert_eq!(assert_ok!(Boat::parse_field("homePort")), BoatField::HomePort);

    let err = assert_err!(Boat::parse_field("home_port"));
    assert!(err.is_unknown_field());
}
