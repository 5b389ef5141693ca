//! Integration tests for ontologies, schemas, validation and templates.
//!
//! Every test builds its own ontology on top of the shared basic ontology,
//! the way an agent does at startup, and exercises it through the public
//! API only.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use jade_content::helper::{self, create_abs_template, is_abs_template};
use jade_content::onto::basic;
use jade_content::{
    AbsAggregate, AbsConcept, AbsIre, AbsObject, AbsPredicate, AbsVariable, Facet, ObjectSchema,
    Ontology, OntologyError, basic_ontology,
};
use jade_types::Aid;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Address {
    street: String,
    number: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Person {
    name: String,
    age: i64,
    address: Option<Address>,
    nicknames: Vec<String>,
}

fn people() -> Ontology {
    let mut onto = Ontology::compose("people", [basic_ontology()]);

    let mut address = ObjectSchema::concept("Address");
    address
        .add_mandatory("street", basic::STRING)
        .add_mandatory("number", basic::INTEGER);
    onto.add_class::<Address>(address).unwrap();

    let mut person = ObjectSchema::concept("Person");
    person
        .add_mandatory("name", basic::STRING)
        .add_mandatory("age", basic::INTEGER)
        .add_optional("address", "Address")
        .add_aggregate("nicknames", basic::STRING, 0, None);
    onto.add_class::<Person>(person).unwrap();

    let mut lives_at = ObjectSchema::predicate("lives-at");
    lives_at
        .add_mandatory("who", "Person")
        .add_mandatory("where", "Address");
    onto.add(lives_at).unwrap();
    onto
}

fn alice() -> Person {
    Person {
        name: "Alice".into(),
        age: 34,
        address: Some(Address {
            street: "Via Roma".into(),
            number: 12,
        }),
        nicknames: vec!["Al".into(), "Ali".into()],
    }
}

#[test]
fn registered_objects_round_trip() {
    let onto = people();
    for person in [
        alice(),
        Person {
            name: "Bob".into(),
            age: 0,
            address: None,
            nicknames: Vec::new(),
        },
    ] {
        let abs = onto.from_object(&person).unwrap();
        assert_eq!(abs.type_name(), "Person");
        onto.validate(&abs).unwrap();
        let back: Person = onto.to_object(&abs).unwrap();
        assert_eq!(back, person);
    }
}

#[test]
fn round_trip_preserves_slot_values() {
    let onto = people();
    let abs = onto.from_object(&alice()).unwrap();
    let concept = abs.as_concept().unwrap();
    assert_eq!(concept.get_string("name"), Some("Alice"));
    assert_eq!(concept.get_integer("AGE"), Some(34));
    let nicknames = concept.abs_object("nicknames").unwrap().as_aggregate().unwrap();
    assert_eq!(nicknames.size(), 2);
    assert_eq!(nicknames.get(1), Some(&AbsObject::from("Ali")));
}

#[test]
fn unregistered_class_is_reported() {
    #[derive(Serialize)]
    struct Stranger {
        name: String,
    }
    let onto = people();
    let err = onto
        .from_object(&Stranger {
            name: "Eve".into(),
        })
        .unwrap_err();
    assert!(matches!(err, OntologyError::ClassNotRegistered { .. }));
}

#[test]
fn missing_mandatory_slot_fails_and_present_slot_passes() {
    let onto = people();
    let schema = onto.schema("Address").unwrap();

    let partial = AbsObject::from(AbsConcept::new("Address").with("street", "Via Roma"));
    let err = schema.validate(&partial, &onto).unwrap_err();
    assert!(matches!(
        &err,
        OntologyError::MissingMandatorySlot { slot, .. } if slot == "number"
    ));

    let complete = AbsObject::from(
        AbsConcept::new("Address")
            .with("street", "Via Roma")
            .with("number", 12_i64),
    );
    schema.validate(&complete, &onto).unwrap();
}

#[test]
fn wrongly_typed_slot_is_incompatible() {
    let onto = people();
    let abs = AbsObject::from(
        AbsConcept::new("Address")
            .with("street", "Via Roma")
            .with("number", "twelve"),
    );
    let err = onto.validate(&abs).unwrap_err();
    assert!(matches!(
        &err,
        OntologyError::IncompatibleSchema { slot, expected, .. }
            if slot == "number" && expected == basic::INTEGER
    ));
}

#[test]
fn cardinality_bounds_are_enforced() {
    let mut onto = Ontology::compose("team", [basic_ontology()]);
    let mut team = ObjectSchema::concept("Team");
    team.add_aggregate("members", basic::STRING, 1, Some(3));
    onto.add(team).unwrap();

    let team_of = |size: usize| {
        let mut members = AbsAggregate::sequence();
        for idx in 0..size {
            members.add(format!("member-{idx}"));
        }
        AbsObject::from(AbsConcept::new("Team").with("members", members))
    };

    for size in [0, 4] {
        let err = onto.validate(&team_of(size)).unwrap_err();
        assert!(
            matches!(&err, OntologyError::FacetViolation { slot, .. } if slot == "members"),
            "size {size}: {err}"
        );
    }
    for size in 1..=3 {
        onto.validate(&team_of(size)).unwrap();
    }
}

#[test]
fn typed_aggregate_rejects_foreign_elements() {
    let onto = people();
    let abs = AbsObject::from(
        AbsConcept::new("Person")
            .with("name", "Alice")
            .with("age", 34_i64)
            .with("nicknames", AbsAggregate::sequence().with("Al").with(7_i64)),
    );
    let err = onto.validate(&abs).unwrap_err();
    assert!(matches!(err, OntologyError::FacetViolation { .. }), "{err}");
}

#[test]
fn subtypes_validate_in_ancestor_slots() {
    let mut onto = Ontology::compose("vehicles", [basic_ontology()]);
    let mut vehicle = ObjectSchema::concept("Vehicle");
    vehicle.add_optional("wheels", basic::INTEGER);
    let mut car = ObjectSchema::concept("Car");
    car.add_super_schema(&vehicle)
        .add_mandatory("plate", basic::STRING);
    let mut taxi = ObjectSchema::concept("Taxi");
    taxi.add_super_schema(&car)
        .add_optional("company", basic::STRING);
    let mut garage = ObjectSchema::concept("Garage");
    garage.add_mandatory("parked", "Vehicle");
    for schema in [vehicle, car, taxi, garage] {
        onto.add(schema).unwrap();
    }

    let taxi = AbsConcept::new("Taxi")
        .with("plate", "AB123CD")
        .with("wheels", 4_i64);
    let garage = AbsObject::from(AbsConcept::new("Garage").with("parked", taxi));
    onto.validate(&garage).unwrap();

    let taxi_schema = onto.schema("Taxi").unwrap();
    let vehicle_schema = onto.schema("Vehicle").unwrap();
    assert!(taxi_schema.descends_from("Vehicle", &onto));
    assert!(taxi_schema.is_compatible_with(vehicle_schema, &onto));
    assert!(taxi_schema.is_compatible_with(taxi_schema, &onto));
    assert!(!vehicle_schema.is_compatible_with(taxi_schema, &onto));

    // Inherited mandatory slots still apply to the subtype.
    let plateless = AbsObject::from(
        AbsConcept::new("Garage").with("parked", AbsConcept::new("Taxi")),
    );
    let err = onto.validate(&plateless).unwrap_err();
    assert!(matches!(
        &err,
        OntologyError::MissingMandatorySlot { slot, .. } if slot == "plate"
    ));
}

#[test]
fn grounded_detection_reaches_every_depth() {
    let grounded = AbsObject::from(
        AbsPredicate::new("lives-at")
            .with("who", AbsConcept::new("Person").with("name", "Alice"))
            .with(
                "where",
                AbsConcept::new("Address")
                    .with("street", "Via Roma")
                    .with("number", 12_i64),
            ),
    );
    assert!(grounded.is_grounded());

    let deep = AbsObject::from(
        AbsPredicate::new("lives-at").with(
            "who",
            AbsConcept::new("Person").with(
                "nicknames",
                AbsAggregate::sequence().with("Al").with(AbsVariable::new("n")),
            ),
        ),
    );
    assert!(!deep.is_grounded());

    let query = AbsObject::from(AbsIre::new(
        basic::IOTA,
        AbsVariable::new("x"),
        AbsPredicate::new("lives-at").with("who", AbsVariable::new("x")),
    ));
    assert!(!query.is_grounded());
    assert!(!AbsObject::from(AbsVariable::new("x")).is_grounded());
    assert!(AbsObject::from(42_i64).is_grounded());
}

#[test]
fn templates_are_ungrounded_and_recognised() {
    let onto = people();
    let schema = onto.schema("Person").unwrap();
    let template = create_abs_template(schema, &onto).unwrap();
    assert!(!template.is_grounded());
    assert!(is_abs_template(&template));

    let name = template.abs_object("name").unwrap().as_variable().unwrap();
    assert_eq!(name.value_type(), Some(basic::STRING));
    let address = template.abs_object("address").unwrap();
    assert_eq!(address.type_name(), "Address");
    let nicknames = template.abs_object("nicknames").unwrap().as_aggregate().unwrap();
    assert!(nicknames.is_empty());
    assert!(nicknames.element_template().is_some());

    assert!(!is_abs_template(&onto.from_object(&alice()).unwrap()));
}

#[test]
fn predicate_and_action_templates_are_recognised() {
    let mut onto = people();
    let mut move_to = ObjectSchema::agent_action("move-to");
    move_to.add_mandatory("where", "Address");
    onto.add(move_to).unwrap();

    for type_name in ["lives-at", "move-to"] {
        let template = create_abs_template(onto.schema(type_name).unwrap(), &onto).unwrap();
        assert_eq!(template.type_name(), type_name);
        assert!(!template.is_grounded(), "{type_name}");
        assert!(is_abs_template(&template), "{type_name}");
    }
    let template = create_abs_template(onto.schema("lives-at").unwrap(), &onto).unwrap();
    assert!(matches!(template, AbsObject::Predicate(_)));
}

#[test]
fn queries_fill_constrained_aggregate_slots() {
    let mut onto = people();
    let mut club = ObjectSchema::concept("Club");
    club.add_aggregate("members", "Person", 0, Some(3));
    onto.add(club).unwrap();

    let query = AbsIre::new(
        basic::ALL,
        AbsVariable::new("x"),
        AbsPredicate::new("lives-at")
            .with("who", AbsVariable::new("x"))
            .with("where", AbsVariable::new("w")),
    );
    let club = AbsObject::from(AbsConcept::new("Club").with("members", query));
    onto.validate(&club).unwrap();
}

#[test]
fn defaults_fill_a_template() {
    let onto = people();
    let mut template = create_abs_template(onto.schema("Address").unwrap(), &onto).unwrap();
    let defaults = AbsObject::from(AbsConcept::new("Address").with("number", 1_i64));
    helper::apply_default_values(&mut template, &defaults).unwrap();

    assert_eq!(template.abs_object("number"), Some(&AbsObject::from(1_i64)));
    assert!(template.abs_object("street").unwrap().as_variable().is_some());

    let partial = helper::nullify_variables(&template, true).unwrap();
    assert!(partial.is_grounded());
    assert_eq!(partial.names(), vec!["number"]);
}

#[test]
fn prefixes_skip_base_types() {
    let onto = people();
    let abs = onto.from_object(&alice()).unwrap();
    let prefixed = helper::add_prefix(&abs, "hr:", &basic_ontology());
    assert_eq!(prefixed.type_name(), "hr:Person");
    assert_eq!(prefixed.abs_object("address").unwrap().type_name(), "hr:Address");
    assert_eq!(prefixed.abs_object("nicknames").unwrap().type_name(), basic::SEQUENCE);

    let restored = helper::remove_prefix(&prefixed, "hr:", &basic_ontology());
    assert_eq!(restored, abs);
}

#[test]
fn aids_keep_addresses_and_resolvers_apart() {
    let resolver = Aid::new("ams@platform").with_address("http://platform:7778/acc");
    let aid = Aid::new("seller@platform")
        .with_address("http://host:7778/acc")
        .with_address("http://backup:7778/acc")
        .with_resolver(resolver);

    let abs = helper::externalise_aid(&aid);
    let addresses = abs.abs_object(basic::AID_ADDRESSES).unwrap().as_aggregate().unwrap();
    let resolvers = abs.abs_object(basic::AID_RESOLVERS).unwrap().as_aggregate().unwrap();
    assert_eq!(addresses.size(), 2);
    assert_eq!(resolvers.size(), 1);

    basic_ontology().validate(&AbsObject::from(abs.clone())).unwrap();
    assert_eq!(helper::internalise_aid(&abs).unwrap(), aid);
}

#[test]
fn duplicate_schema_is_rejected() {
    let mut onto = people();
    let err = onto.add(ObjectSchema::concept("person")).unwrap_err();
    assert!(matches!(err, OntologyError::DuplicateSchema { .. }));
}

#[test]
fn regex_facet_guards_string_slots() {
    let mut onto = Ontology::compose("codes", [basic_ontology()]);
    let mut product = ObjectSchema::concept("Product");
    product
        .add_mandatory("sku", basic::STRING)
        .add_facet("sku", Facet::regex("^[A-Z]{3}-[0-9]{4}$").unwrap());
    onto.add(product).unwrap();
    let onto = Arc::new(onto);

    let good = AbsObject::from(AbsConcept::new("Product").with("sku", "ABC-1234"));
    onto.validate(&good).unwrap();
    let bad = AbsObject::from(AbsConcept::new("Product").with("sku", "abc"));
    assert!(matches!(
        onto.validate(&bad).unwrap_err(),
        OntologyError::FacetViolation { .. }
    ));
}

#[test]
fn person_end_to_end() {
    let mut onto = Ontology::compose("directory", [basic_ontology()]);
    let mut person = ObjectSchema::concept("Person");
    person.add_mandatory("name", basic::STRING);
    onto.add(person).unwrap();

    let mut alice = AbsConcept::new("Person");
    alice.set_str("name", "Alice");
    let schema = onto.schema("Person").unwrap();
    schema.validate(&AbsObject::from(alice.clone()), &onto).unwrap();

    alice.remove("name");
    let err = schema.validate(&AbsObject::from(alice), &onto).unwrap_err();
    assert!(matches!(err, OntologyError::MissingMandatorySlot { .. }));
    assert!(err.to_string().contains("name"), "{err}");
}
