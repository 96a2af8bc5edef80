// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

mod test_helpers;

use spool::{Error, JsonObject, ReferenceHandling, Spool};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use test_helpers::{assert_json, init_logger};

#[derive(JsonObject, Debug, PartialEq)]
pub struct Person {
    pub name: String,
}

#[derive(JsonObject, Debug, Default)]
#[json(default)]
pub struct Node {
    pub name: String,
    pub next: Option<Rc<RefCell<Node>>>,
}

fn preserving() -> Spool {
    spool_with(ReferenceHandling::Preserve)
}

fn spool_with(handling: ReferenceHandling) -> Spool {
    Spool::default().reference_handling(handling)
}

fn node(name: &str) -> Rc<RefCell<Node>> {
    Rc::new(RefCell::new(Node {
        name: name.to_string(),
        next: None,
    }))
}

#[test]
fn test_shared_object_written_once() {
    init_logger();
    let spool = preserving();
    let ada = Rc::new(Person {
        name: "Ada".to_string(),
    });
    let people = vec![ada.clone(), ada.clone()];
    assert_json(
        &spool,
        &people,
        r#"[{"$id":"1","name":"Ada"},{"$ref":"1"}]"#,
    );

    let read: Vec<Rc<Person>> = spool
        .deserialize_str(r#"[{"$id":"1","name":"Ada"},{"$ref":"1"}]"#)
        .unwrap();
    assert_eq!(read.len(), 2);
    assert!(Rc::ptr_eq(&read[0], &read[1]));
    assert_eq!(read[0].name, "Ada");
}

#[test]
fn test_distinct_values_get_distinct_ids() {
    init_logger();
    let spool = preserving();
    let people = vec![
        Rc::new(Person {
            name: "a".to_string(),
        }),
        Rc::new(Person {
            name: "b".to_string(),
        }),
    ];
    assert_json(
        &spool,
        &people,
        r#"[{"$id":"1","name":"a"},{"$id":"2","name":"b"}]"#,
    );
}

#[test]
fn test_ids_restart_for_each_operation() {
    init_logger();
    let spool = preserving();
    let person = Rc::new(Person {
        name: "x".to_string(),
    });
    let first = spool.serialize_to_string(&person).unwrap();
    let second = spool.serialize_to_string(&person).unwrap();
    assert_eq!(first, r#"{"$id":"1","name":"x"}"#);
    assert_eq!(first, second);
}

#[test]
fn test_shared_array_uses_values_wrapper() {
    init_logger();
    let spool = preserving();
    let numbers = Rc::new(vec![1u32, 2, 3]);
    let pair = vec![numbers.clone(), numbers];
    let json = r#"[{"$id":"1","$values":[1,2,3]},{"$ref":"1"}]"#;
    assert_json(&spool, &pair, json);

    let read: Vec<Rc<Vec<u32>>> = spool.deserialize_str(json).unwrap();
    assert!(Rc::ptr_eq(&read[0], &read[1]));
    assert_eq!(*read[0], vec![1, 2, 3]);
}

#[test]
fn test_cycle_roundtrip() {
    init_logger();
    let spool = preserving();
    let a = node("a");
    let b = node("b");
    a.borrow_mut().next = Some(b.clone());
    b.borrow_mut().next = Some(a.clone());

    let json = spool.serialize_to_string(&a).unwrap();
    assert_eq!(
        json,
        r#"{"$id":"1","name":"a","next":{"$id":"2","name":"b","next":{"$ref":"1"}}}"#
    );

    let read: Rc<RefCell<Node>> = spool.deserialize_str(&json).unwrap();
    let second = read.borrow().next.clone().unwrap();
    assert_eq!(second.borrow().name, "b");
    let back = second.borrow().next.clone().unwrap();
    assert!(Rc::ptr_eq(&read, &back));

    // break the cycles so the nodes are dropped
    a.borrow_mut().next = None;
    read.borrow_mut().next = None;
}

#[test]
fn test_self_reference() {
    init_logger();
    let spool = preserving();
    let read: Rc<RefCell<Node>> = spool
        .deserialize_str(r#"{"$id":"7","name":"loop","next":{"$ref":"7"}}"#)
        .unwrap();
    let next = read.borrow().next.clone().unwrap();
    assert!(Rc::ptr_eq(&read, &next));
    read.borrow_mut().next = None;
}

#[test]
fn test_cycle_without_preservation() {
    init_logger();
    let spool = spool_with(ReferenceHandling::Off);
    let a = node("a");
    a.borrow_mut().next = Some(a.clone());
    let err = spool.serialize(&a).unwrap_err();
    assert!(matches!(err.root_cause(), Error::ReferenceLoop(_)));
    a.borrow_mut().next = None;
}

#[test]
fn test_shared_value_repeated_without_preservation() {
    init_logger();
    let spool = spool_with(ReferenceHandling::Off);
    let ada = Rc::new(Person {
        name: "Ada".to_string(),
    });
    assert_json(
        &spool,
        &vec![ada.clone(), ada],
        r#"[{"name":"Ada"},{"name":"Ada"}]"#,
    );

    // metadata is not interpreted either
    let read: Vec<Rc<Person>> = spool
        .deserialize_str(r#"[{"name":"a"},{"name":"a"}]"#)
        .unwrap();
    assert!(!Rc::ptr_eq(&read[0], &read[1]));
}

#[test]
fn test_unknown_reference() {
    init_logger();
    let spool = preserving();
    let err = spool
        .deserialize_str::<Vec<Rc<Person>>>(r#"[{"$ref":"4"}]"#)
        .unwrap_err();
    assert!(matches!(err.root_cause(), Error::InvalidRef(_)));
}

#[test]
fn test_duplicate_id() {
    init_logger();
    let spool = preserving();
    let err = spool
        .deserialize_str::<Vec<Rc<Person>>>(
            r#"[{"$id":"1","name":"a"},{"$id":"1","name":"b"}]"#,
        )
        .unwrap_err();
    assert!(matches!(err.root_cause(), Error::InvalidRef(_)));
}

#[test]
fn test_reference_with_siblings() {
    init_logger();
    let spool = preserving();
    let err = spool
        .deserialize_str::<Vec<Rc<Person>>>(
            r#"[{"$id":"1","name":"a"},{"$ref":"1","name":"b"}]"#,
        )
        .unwrap_err();
    assert!(matches!(err.root_cause(), Error::Json(_)));
}

#[test]
fn test_reference_to_value_of_another_type() {
    init_logger();
    #[derive(JsonObject, Debug)]
    pub struct Pair {
        pub person: Rc<Person>,
        pub numbers: Rc<Vec<u8>>,
    }

    let spool = preserving();
    let err = spool
        .deserialize_str::<Pair>(r#"{"person":{"$id":"1","name":"a"},"numbers":{"$ref":"1"}}"#)
        .unwrap_err();
    assert_eq!(err.path(), Some("numbers"));
    assert!(matches!(err.root_cause(), Error::InvalidRef(_)));
}

#[test]
fn test_reference_into_plain_value() {
    init_logger();
    let spool = preserving();
    let err = spool
        .deserialize_str::<Person>(r#"{"$ref":"1"}"#)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRef(_)));

    // an id on a plain value is skipped
    let person: Person = spool
        .deserialize_str(r#"{"$id":"1","name":"n"}"#)
        .unwrap();
    assert_eq!(person.name, "n");
}

#[test]
fn test_arc_mutex_graph() {
    init_logger();
    #[derive(JsonObject, Debug, Default)]
    #[json(default)]
    pub struct Counter {
        pub hits: u32,
    }

    #[derive(JsonObject, Debug)]
    pub struct Dashboard {
        pub left: Arc<Mutex<Counter>>,
        pub right: Arc<Mutex<Counter>>,
    }

    let spool = preserving();
    let shared = Arc::new(Mutex::new(Counter { hits: 5 }));
    let dashboard = Dashboard {
        left: shared.clone(),
        right: shared,
    };
    let json = spool.serialize_to_string(&dashboard).unwrap();
    assert_eq!(json, r#"{"left":{"$id":"1","hits":5},"right":{"$ref":"1"}}"#);

    let read: Dashboard = spool.deserialize_str(&json).unwrap();
    assert!(Arc::ptr_eq(&read.left, &read.right));
    read.left.lock().unwrap().hits += 1;
    assert_eq!(read.right.lock().unwrap().hits, 6);
}
