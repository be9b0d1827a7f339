use logoloc::{BoundingBox, LogoLocError, Profile, ProfileStore, SectionSpec};

fn sample_profile(name: &str) -> Profile {
    Profile {
        name: name.to_owned(),
        section: SectionSpec::Edge {
            left_mul: -2.0,
            top_mul: -1.0,
            right_mul: 12.0,
            bottom_mul: 6.0,
        },
        section_thickness: 3,
    }
}

#[test]
fn missing_store_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProfileStore::open(dir.path().join("profiles.json"));
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn upsert_then_get_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProfileStore::open(dir.path().join("profiles.json"));

    let profile = sample_profile("letterhead");
    store.upsert(profile.clone()).unwrap();
    assert_eq!(store.get("letterhead").unwrap(), profile);
}

#[test]
fn upsert_replaces_the_whole_profile() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProfileStore::open(dir.path().join("profiles.json"));

    store.upsert(sample_profile("invoice")).unwrap();
    let replacement = Profile {
        name: "invoice".to_owned(),
        section: SectionSpec::Size {
            left_mul: 0.0,
            top_mul: 1.0,
            width_mul: 3.0,
            height_mul: 2.0,
        },
        section_thickness: 5,
    };
    store.upsert(replacement.clone()).unwrap();

    let profiles = store.load().unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles["invoice"], replacement);
}

#[test]
fn get_and_delete_misses_are_profile_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProfileStore::open(dir.path().join("profiles.json"));
    store.upsert(sample_profile("present")).unwrap();

    let expected = LogoLocError::ProfileNotFound {
        name: "absent".to_owned(),
    };
    assert_eq!(store.get("absent").unwrap_err(), expected);
    assert_eq!(store.delete("absent").unwrap_err(), expected);

    store.delete("present").unwrap();
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn store_survives_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("profiles.json");

    ProfileStore::open(&path)
        .upsert(sample_profile("letterhead"))
        .unwrap();
    ProfileStore::open(&path)
        .upsert(sample_profile("invoice"))
        .unwrap();

    let profiles = ProfileStore::open(&path).load().unwrap();
    assert_eq!(profiles.len(), 2);
    assert!(profiles.contains_key("letterhead"));
    assert!(profiles.contains_key("invoice"));
}

#[test]
fn profile_json_is_mode_tagged() {
    let profile = sample_profile("letterhead");
    let json = serde_json::to_value(&profile).unwrap();
    assert_eq!(json["mode"], "edge");
    assert_eq!(json["left_mul"], -2.0);
    assert_eq!(json["section_thickness"], 3);

    let parsed: Profile = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, profile);
}

#[test]
fn thickness_defaults_when_absent() {
    let parsed: Profile = serde_json::from_str(
        r#"{
            "name": "sparse",
            "mode": "size",
            "left_mul": 0.5,
            "top_mul": 0.0,
            "width_mul": 2.0,
            "height_mul": 1.0
        }"#,
    )
    .unwrap();
    assert_eq!(parsed.section_thickness, 3);
}

#[test]
fn incomplete_edge_payload_fails_to_parse() {
    let result: Result<Profile, _> = serde_json::from_str(
        r#"{
            "name": "broken",
            "mode": "edge",
            "left_mul": -2.0,
            "top_mul": -1.0
        }"#,
    );
    assert!(result.is_err());
}

#[test]
fn profile_section_follows_the_stored_multipliers() {
    let profile = sample_profile("letterhead");
    let logo = BoundingBox::new(1820, 2740, 400, 120);
    let section = profile.compute_section(logo, 2550, 3300).unwrap();
    assert_eq!(section, BoundingBox::new(1020, 2620, 1530, 680));
}
