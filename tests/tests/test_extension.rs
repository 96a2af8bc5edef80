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

use serde_json::{json, Map, Value};
use spool::{JsonObject, MissingMemberHandling, Spool};
use std::collections::BTreeMap;
use test_helpers::{assert_json, init_logger};

#[derive(JsonObject, Debug, PartialEq, Default)]
#[json(default)]
pub struct Event {
    pub kind: String,
    #[json(extension_data)]
    pub extra: Map<String, Value>,
}

#[test]
fn test_unmatched_members_are_collected() {
    init_logger();
    let spool = Spool::default();
    let event: Event = spool
        .deserialize_str(r#"{"kind":"click","x":10,"meta":{"tags":["a","b"]},"ok":true}"#)
        .unwrap();
    assert_eq!(event.kind, "click");
    assert_eq!(event.extra.len(), 3);
    assert_eq!(event.extra["x"], json!(10));
    assert_eq!(event.extra["meta"], json!({"tags": ["a", "b"]}));
    assert_eq!(event.extra["ok"], json!(true));
}

#[test]
fn test_extension_data_is_written_after_members() {
    init_logger();
    let mut extra = Map::new();
    extra.insert("source".to_string(), json!("mobile"));
    extra.insert("retries".to_string(), json!(2));
    let event = Event {
        kind: "tap".to_string(),
        extra,
    };
    let spool = Spool::default();
    assert_json(
        &spool,
        &event,
        r#"{"kind":"tap","retries":2,"source":"mobile"}"#,
    );
}

#[test]
fn test_extension_data_wins_over_missing_member_error() {
    init_logger();
    let spool = Spool::default().missing_member_handling(MissingMemberHandling::Error);
    let event: Event = spool.deserialize_str(r#"{"kind":"k","other":1}"#).unwrap();
    assert_eq!(event.extra["other"], json!(1));
}

#[test]
fn test_optional_extension_data_with_constructor() {
    init_logger();
    #[derive(JsonObject, Debug, PartialEq)]
    pub struct Reading {
        pub sensor: String,
        pub value: f64,
        #[json(extension_data)]
        pub rest: Option<BTreeMap<String, Value>>,
    }

    let spool = Spool::default();
    let plain: Reading = spool
        .deserialize_str(r#"{"sensor":"t1","value":20.5}"#)
        .unwrap();
    assert_eq!(plain.rest, None);

    let extended: Reading = spool
        .deserialize_str(r#"{"unit":"C","sensor":"t1","value":20.5}"#)
        .unwrap();
    let rest = extended.rest.as_ref().unwrap();
    assert_eq!(rest.get("unit"), Some(&json!("C")));
    assert_eq!(
        spool.serialize_to_string(&extended).unwrap(),
        r#"{"sensor":"t1","value":20.5,"unit":"C"}"#
    );
}
