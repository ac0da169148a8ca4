use chrono::{FixedOffset, TimeZone};
use peopledb_core::db::open_db_in_memory;
use peopledb_core::{identity_of, PeopleRepository, Person};
use rust_decimal::Decimal;

#[test]
fn new_person_has_defaults_and_no_identity() {
    let dob = FixedOffset::east_opt(3 * 3600)
        .unwrap()
        .with_ymd_and_hms(2000, 9, 30, 15, 0, 0)
        .unwrap();
    let person = Person::new("p1", "Smith", dob);

    assert_eq!(person.id(), None);
    assert_eq!(identity_of(&person).unwrap(), None);
    assert_eq!(person.salary, Decimal::ZERO);
    assert_eq!(person.email, None);
}

#[test]
fn serialization_uses_expected_wire_fields() {
    let dob = FixedOffset::east_opt(2 * 3600)
        .unwrap()
        .with_ymd_and_hms(1980, 11, 15, 15, 15, 0)
        .unwrap();
    let unsaved = Person::new("John", "Smith", dob)
        .with_salary(Decimal::new(120_000_00, 2))
        .with_email("john@example.com");
    let conn = open_db_in_memory().unwrap();
    let person = PeopleRepository::new(&conn).save(unsaved.clone()).unwrap();

    let json = serde_json::to_value(&person).unwrap();
    assert_eq!(json["id"], person.id().unwrap());
    assert_eq!(json["first_name"], "John");
    assert_eq!(json["dob"], "1980-11-15T15:15:00+02:00");
    assert_eq!(json["salary"], "120000.00");
    assert_eq!(json["email"], "john@example.com");

    let decoded: Person = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, unsaved);
}

#[test]
fn deserialization_cannot_forge_an_identity() {
    let decoded: Person = serde_json::from_str(
        r#"{"id":99,"first_name":"Eve","last_name":"Forger","dob":"1990-01-01T00:00:00+00:00","salary":"0","email":null}"#,
    )
    .unwrap();

    assert_eq!(decoded.id(), None);
    assert_eq!(identity_of(&decoded).unwrap(), None);
}

#[test]
fn display_renders_identity_and_rfc3339_dob() {
    let dob = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(1970, 1, 1, 0, 0, 0)
        .unwrap();
    let unsaved = Person::new("Ada", "Lovelace", dob);
    assert_eq!(
        unsaved.to_string(),
        "#- Ada Lovelace dob=1970-01-01T00:00:00+00:00 salary=0"
    );
    let conn = open_db_in_memory().unwrap();
    let saved = PeopleRepository::new(&conn).save(unsaved).unwrap();
    assert!(saved
        .to_string()
        .starts_with(&format!("#{} ", saved.id().unwrap())));
}
