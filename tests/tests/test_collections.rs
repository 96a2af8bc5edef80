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

use serde_json::{json, Value};
use spool::{Error, JsonObject, Spool};
use std::collections::{BTreeSet, HashSet, LinkedList, VecDeque};
use std::rc::Rc;
use test_helpers::{assert_json, init_logger, test_roundtrip};

#[test]
fn test_sequences() {
    init_logger();
    let spool = Spool::default();
    assert_json(&spool, &vec![1i32, -2, 3], "[1,-2,3]");
    assert_json(&spool, &Vec::<String>::new(), "[]");
    test_roundtrip(&spool, VecDeque::from(vec![1u8, 2, 3]));
    test_roundtrip(&spool, LinkedList::from([true, false]));
    test_roundtrip(&spool, vec![vec![1u16], vec![], vec![2, 3]]);
}

#[test]
fn test_sets() {
    init_logger();
    let spool = Spool::default();
    let set: BTreeSet<String> = ["b", "a", "c"].iter().map(|s| s.to_string()).collect();
    assert_json(&spool, &set, r#"["a","b","c"]"#);
    test_roundtrip(&spool, set);

    let read: HashSet<u32> = spool.deserialize_str("[3,1,3,2]").unwrap();
    assert_eq!(read, HashSet::from([1, 2, 3]));
}

#[test]
fn test_fixed_shapes() {
    init_logger();
    let spool = Spool::default();
    test_roundtrip(&spool, [1u8, 2, 3]);
    let boxed: Box<[i64]> = spool.deserialize_str("[4,5]").unwrap();
    assert_eq!(&*boxed, &[4, 5]);
    let shared: Rc<[String]> = spool.deserialize_str(r#"["x"]"#).unwrap();
    assert_eq!(shared.len(), 1);

    let err = spool.deserialize_str::<[u8; 3]>("[1,2]").unwrap_err();
    assert!(matches!(err, Error::TypeError(_)));
}

#[test]
fn test_nullable_elements() {
    init_logger();
    let spool = Spool::default();
    let values = vec![Some(1i32), None, Some(3)];
    assert_json(&spool, &values, "[1,null,3]");
    test_roundtrip(&spool, values);
}

#[test]
fn test_collections_of_objects() {
    init_logger();
    #[derive(JsonObject, Debug, PartialEq)]
    pub struct Item {
        pub sku: String,
        pub qty: u32,
    }

    let spool = Spool::default();
    let items = vec![
        Item {
            sku: "a".to_string(),
            qty: 1,
        },
        Item {
            sku: "b".to_string(),
            qty: 2,
        },
    ];
    assert_json(
        &spool,
        &items,
        r#"[{"sku":"a","qty":1},{"sku":"b","qty":2}]"#,
    );
    test_roundtrip(&spool, items);
}

#[test]
fn test_element_error_path() {
    init_logger();
    let spool = Spool::default();
    let err = spool
        .deserialize_str::<Vec<Vec<u8>>>("[[1],[2,300]]")
        .unwrap_err();
    assert_eq!(err.path(), Some("[1][1]"));
    assert!(matches!(err.root_cause(), Error::TypeError(_)));
    assert!(err.to_string().ends_with("Path: $[1][1]"));
}

#[test]
fn test_object_for_array() {
    init_logger();
    let spool = Spool::default();
    let err = spool.deserialize_str::<Vec<u8>>(r#"{"a":1}"#).unwrap_err();
    assert!(matches!(err, Error::TypeError(_)));
}

#[test]
fn test_untyped_values() {
    init_logger();
    #[derive(JsonObject, Debug, PartialEq)]
    pub struct Envelope {
        pub kind: String,
        pub payload: Value,
    }

    let spool = Spool::default();
    let envelope: Envelope = spool
        .deserialize_str(r#"{"kind":"k","payload":{"a":[1,2.5,"x",null,true]}}"#)
        .unwrap();
    assert_eq!(envelope.payload, json!({"a": [1, 2.5, "x", null, true]}));
    assert_json(
        &spool,
        &envelope,
        r#"{"kind":"k","payload":{"a":[1,2.5,"x",null,true]}}"#,
    );
}
