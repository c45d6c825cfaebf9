//! Fixture sets used across the test suite.

#![allow(dead_code)]

use std::collections::BTreeMap;

use estester::{Fixture, IndexDefinition};
use serde_json::json;

/// Three dogs, one of them with a URL id and a slash in its type.
pub fn dog_fixtures() -> Vec<Fixture> {
    vec![
        Fixture::new("dog", "1", json!({"name": "Nina Fox"})),
        Fixture::new("dog", "2", json!({"name": "Charles M."})),
        Fixture::new("internet/dog", "http://dog.com", json!({"name": "It bytes"})),
    ]
}

/// Contacts spread over three indices.
pub fn contact_data() -> BTreeMap<String, IndexDefinition> {
    let mut data = BTreeMap::new();
    data.insert(
        "personal".to_string(),
        IndexDefinition::with_fixtures(vec![
            Fixture::new("contact", "1", json!({"name": "Dmitriy"})),
            Fixture::new("contact", "2", json!({"name": "Agnessa"})),
        ]),
    );
    data.insert(
        "professional".to_string(),
        IndexDefinition::with_fixtures(vec![Fixture::new(
            "contact",
            "1",
            json!({"name": "Nikolay"}),
        )]),
    );
    data.insert(
        "magical".to_string(),
        IndexDefinition::with_fixtures(vec![Fixture::new(
            "wizard/mage",
            "http://middleearth.com/gandalf",
            json!({"name": "Gandalf the Grey"}),
        )]),
    );
    data
}

/// Two bands sharing the `band` alias.
pub fn band_data() -> BTreeMap<String, IndexDefinition> {
    let mut data = BTreeMap::new();
    data.insert(
        "beatles".to_string(),
        IndexDefinition::with_fixtures(vec![
            Fixture::new("member", "lenon", json!({"name": "John Lenon", "role": "singer"})),
            Fixture::new(
                "member",
                "mccartney",
                json!({"name": "Paul McCartney", "role": "guitar"}),
            ),
            Fixture::new(
                "member",
                "harrison",
                json!({"name": "George Harrison", "role": "bass"}),
            ),
        ])
        .aliases(["band"]),
    );
    data.insert(
        "thepolice".to_string(),
        IndexDefinition::with_fixtures(vec![Fixture::new(
            "member",
            "sting",
            json!({"name": "Gordon Matthew Thomas Sumner", "role": "singer"}),
        )])
        .aliases(["band", "single-man-band"]),
    );
    data
}
