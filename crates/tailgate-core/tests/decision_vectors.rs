//! Table-driven decision vectors loaded from `tests/vectors/`.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use serde::Deserialize;
use tailgate_core::{decide, parse_policy};

#[derive(Debug, Deserialize)]
struct VectorFile {
    vectors: Vec<TestVector>,
}

#[derive(Debug, Deserialize)]
struct TestVector {
    description: String,
    policy: String,
    cases: Vec<Case>,
}

#[derive(Debug, Deserialize)]
struct Case {
    identity: String,
    resource: String,
    expect: String,
}

fn load(name: &str) -> VectorFile {
    let s = fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
    serde_json::from_str(&s).unwrap()
}

#[test]
fn decision_vectors() {
    let file = load("decisions.json");
    assert!(!file.vectors.is_empty());

    for v in &file.vectors {
        let p = parse_policy(&v.policy)
            .unwrap_or_else(|e| panic!("{}: policy failed to build: {e}", v.description));
        for c in &v.cases {
            let got = decide(&p, &c.identity, &c.resource);
            assert_eq!(
                got.as_str(),
                c.expect,
                "{}: identity={:?} resource={:?}",
                v.description,
                c.identity,
                c.resource
            );
        }
    }
}
