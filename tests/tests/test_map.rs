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

use spool::{Error, JsonEnum, JsonObject, Spool};
use std::collections::{BTreeMap, HashMap};
use test_helpers::{assert_json, init_logger, test_roundtrip};

#[derive(JsonEnum, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Low,
    Medium,
    High,
}

#[test]
fn test_string_keys() {
    init_logger();
    let spool = Spool::default();
    let mut map = BTreeMap::new();
    map.insert("b".to_string(), 2i32);
    map.insert("a".to_string(), 1);
    assert_json(&spool, &map, r#"{"a":1,"b":2}"#);
    test_roundtrip(&spool, map);

    let read: HashMap<String, Vec<u8>> = spool
        .deserialize_str(r#"{"x":[1],"y":[]}"#)
        .unwrap();
    assert_eq!(read["x"], vec![1]);
    assert!(read["y"].is_empty());
}

#[test]
fn test_escaped_keys() {
    init_logger();
    let spool = Spool::default();
    let mut map = BTreeMap::new();
    map.insert("quote\"d".to_string(), 1u8);
    assert_json(&spool, &map, r#"{"quote\"d":1}"#);
    test_roundtrip(&spool, map);
}

#[test]
fn test_integer_keys() {
    init_logger();
    let spool = Spool::default();
    let mut map = BTreeMap::new();
    map.insert(10u32, "ten".to_string());
    map.insert(2, "two".to_string());
    assert_json(&spool, &map, r#"{"2":"two","10":"ten"}"#);
    test_roundtrip(&spool, map);

    let negative: BTreeMap<i64, bool> = spool.deserialize_str(r#"{"-5":true}"#).unwrap();
    assert_eq!(negative.get(&-5), Some(&true));

    let err = spool
        .deserialize_str::<BTreeMap<u32, bool>>(r#"{"1":true,"x":false}"#)
        .unwrap_err();
    assert_eq!(err.path(), Some("x"));
    assert!(matches!(err.root_cause(), Error::TypeError(_)));

    let err = spool
        .deserialize_str::<BTreeMap<u8, bool>>(r#"{"256":true}"#)
        .unwrap_err();
    assert!(matches!(err.root_cause(), Error::TypeError(_)));
}

#[test]
fn test_integer_keys_use_integer_grammar() {
    init_logger();
    let spool = Spool::default();
    for key in ["01", " 1", "1 ", "+1", "1.0", "1e2", "-", ""] {
        let json = format!(r#"{{"{key}":true}}"#);
        let err = spool
            .deserialize_str::<BTreeMap<i32, bool>>(&json)
            .unwrap_err();
        assert_eq!(err.path(), Some(key), "key {key:?}");
        assert!(matches!(err.root_cause(), Error::TypeError(_)), "key {key:?}");
    }

    let mut wide = BTreeMap::new();
    wide.insert(i128::MIN, 1u8);
    wide.insert(u64::MAX as i128 + 1, 2u8);
    assert_json(
        &spool,
        &wide,
        r#"{"-170141183460469231731687303715884105728":1,"18446744073709551616":2}"#,
    );
    test_roundtrip(&spool, wide);
}

#[test]
fn test_shared_str_keys_and_values() {
    init_logger();
    use std::rc::Rc;
    use std::sync::Arc;

    let spool = Spool::default();
    let mut map: BTreeMap<Rc<str>, Arc<str>> = BTreeMap::new();
    map.insert(Rc::from("k"), Arc::from("v"));
    assert_json(&spool, &map, r#"{"k":"v"}"#);
    test_roundtrip(&spool, map);

    let boxed: HashMap<Box<str>, Box<str>> = spool.deserialize_str(r#"{"a":"b"}"#).unwrap();
    assert_eq!(&*boxed[&Box::<str>::from("a")], "b");
    let rc: Vec<Rc<str>> = spool.deserialize_str(r#"["x","y"]"#).unwrap();
    assert_eq!(&*rc[1], "y");
}

#[test]
fn test_bool_and_char_keys() {
    init_logger();
    let spool = Spool::default();
    let mut flags = BTreeMap::new();
    flags.insert(true, 1u8);
    flags.insert(false, 0u8);
    assert_json(&spool, &flags, r#"{"false":0,"true":1}"#);
    test_roundtrip(&spool, flags);

    let mut letters = BTreeMap::new();
    letters.insert('a', 1u8);
    test_roundtrip(&spool, letters);
}

#[test]
fn test_enum_keys() {
    init_logger();
    let spool = Spool::default();
    let mut limits = BTreeMap::new();
    limits.insert(Level::High, 100u32);
    limits.insert(Level::Low, 10);
    assert_json(&spool, &limits, r#"{"Low":10,"High":100}"#);
    test_roundtrip(&spool, limits);

    // integer values are accepted as keys too
    let read: BTreeMap<Level, u32> = spool.deserialize_str(r#"{"1":5}"#).unwrap();
    assert_eq!(read.get(&Level::Medium), Some(&5));

    let err = spool
        .deserialize_str::<BTreeMap<Level, u32>>(r#"{"Extreme":1}"#)
        .unwrap_err();
    assert_eq!(err.path(), Some("Extreme"));
}

#[test]
fn test_nested_maps_in_objects() {
    init_logger();
    #[derive(JsonObject, Debug, PartialEq)]
    pub struct Inventory {
        pub stock: BTreeMap<String, BTreeMap<String, u32>>,
    }

    let spool = Spool::default();
    let mut shelf = BTreeMap::new();
    shelf.insert("apples".to_string(), 3);
    let mut stock = BTreeMap::new();
    stock.insert("north".to_string(), shelf);
    let inventory = Inventory { stock };
    assert_json(&spool, &inventory, r#"{"stock":{"north":{"apples":3}}}"#);
    test_roundtrip(&spool, inventory);

    let err = spool
        .deserialize_str::<Inventory>(r#"{"stock":{"north":{"apples":"many"}}}"#)
        .unwrap_err();
    assert_eq!(err.path(), Some("stock.north.apples"));
}

#[test]
fn test_array_for_map() {
    init_logger();
    let spool = Spool::default();
    let err = spool
        .deserialize_str::<BTreeMap<String, u8>>("[]")
        .unwrap_err();
    assert!(matches!(err, Error::TypeError(_)));
}
