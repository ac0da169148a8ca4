use peopledb_core::db::open_db_in_memory;
use peopledb_core::{Address, AddressRepository, RepoError, Region};

fn beatle_street() -> Address {
    Address::new(
        "123 Beatle st.",
        "Walla Walla",
        "WA",
        "90210",
        "Fulton County",
        Region::West,
        "United States",
    )
    .with_address2("Apt 1a.")
}

fn harbour_road() -> Address {
    Address::new(
        "7 Harbour Rd",
        "Portland",
        "ME",
        "04101",
        "Cumberland",
        Region::East,
        "United States",
    )
}

#[test]
fn save_and_find_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = AddressRepository::new(&conn);

    let saved = repo.save(beatle_street()).unwrap();
    assert!(saved.id().unwrap() > 0);

    let found = repo.find_by_id(saved.id().unwrap()).unwrap().unwrap();
    assert_eq!(found, saved);
    assert_eq!(found.region, Region::West);
    assert_eq!(found.address2.as_deref(), Some("Apt 1a."));
}

#[test]
fn update_goes_through_override_sql() {
    let conn = open_db_in_memory().unwrap();
    let repo = AddressRepository::new(&conn);

    let mut saved = repo.save(harbour_road()).unwrap();
    saved.city = "South Portland".to_string();
    saved.address2 = Some("Unit 4".to_string());
    repo.update(&saved).unwrap();

    let found = repo.find_by_id(saved.id().unwrap()).unwrap().unwrap();
    assert_eq!(found.city, "South Portland");
    assert_eq!(found.address2.as_deref(), Some("Unit 4"));
}

#[test]
fn delete_many_goes_through_override_sql() {
    let conn = open_db_in_memory().unwrap();
    let repo = AddressRepository::new(&conn);

    let a = repo.save(beatle_street()).unwrap();
    let b = repo.save(harbour_road()).unwrap();
    let c = repo.save(harbour_road()).unwrap();

    repo.delete_many(&[a, c]).unwrap();

    assert_eq!(repo.find_all().unwrap(), vec![b]);
}

#[test]
fn delete_one_and_count() {
    let conn = open_db_in_memory().unwrap();
    let repo = AddressRepository::new(&conn);

    let saved = repo.save(beatle_street()).unwrap();
    repo.save(harbour_road()).unwrap();
    assert_eq!(repo.count().unwrap(), 2);

    repo.delete(&saved).unwrap();
    assert_eq!(repo.count().unwrap(), 1);
    assert!(repo.find_by_id(saved.id().unwrap()).unwrap().is_none());
}

#[test]
fn unknown_region_in_store_is_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO addresses (street_address, city, state, postcode, county, region, country)
         VALUES ('1 Main', 'Springfield', 'IL', '62701', 'Sangamon', 'CENTRAL', 'US')",
        [],
    )
    .unwrap();
    let repo = AddressRepository::new(&conn);

    let err = repo.find_all().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("CENTRAL")));
}
