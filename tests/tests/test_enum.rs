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
use test_helpers::{assert_json, init_logger, test_roundtrip};

#[derive(JsonEnum, Debug, Clone, Copy, PartialEq)]
pub enum Status {
    Active,
    Suspended,
    #[json(rename = "gone")]
    Deleted,
}

#[derive(JsonEnum, Debug, Clone, Copy, PartialEq)]
#[json(rename_all = "snake_case")]
pub enum Method {
    GetItem,
    PutItem,
}

#[derive(JsonEnum, Debug, Clone, Copy, PartialEq)]
pub enum Priority {
    Low = 10,
    High = 20,
}

#[test]
fn test_written_as_names() {
    init_logger();
    let spool = Spool::default();
    assert_json(&spool, &Status::Active, r#""Active""#);
    assert_json(&spool, &Status::Deleted, r#""gone""#);
    assert_json(&spool, &Method::PutItem, r#""put_item""#);
    test_roundtrip(&spool, vec![Status::Active, Status::Suspended, Status::Deleted]);
    test_roundtrip(&spool, Method::GetItem);
}

#[test]
fn test_read_from_integer_values() {
    init_logger();
    let spool = Spool::default();
    let status: Status = spool.deserialize_str("1").unwrap();
    assert_eq!(status, Status::Suspended);
    let priority: Priority = spool.deserialize_str("20").unwrap();
    assert_eq!(priority, Priority::High);

    let err = spool.deserialize_str::<Priority>("15").unwrap_err();
    assert!(matches!(err, Error::TypeError(_)));
}

#[test]
fn test_unknown_name() {
    init_logger();
    let spool = Spool::default();
    let err = spool.deserialize_str::<Status>(r#""Deleted""#).unwrap_err();
    assert!(matches!(err, Error::TypeError(_)));

    let err = spool.deserialize_str::<Status>("true").unwrap_err();
    assert!(matches!(err, Error::TypeError(_)));
}

#[test]
fn test_case_insensitive_names() {
    init_logger();
    let spool = Spool::default().case_insensitive(true);
    let status: Status = spool.deserialize_str(r#""SUSPENDED""#).unwrap();
    assert_eq!(status, Status::Suspended);

    let strict = Spool::default();
    assert!(strict.deserialize_str::<Status>(r#""active""#).is_err());
}

#[test]
fn test_enum_members() {
    init_logger();
    #[derive(JsonObject, Debug, PartialEq)]
    pub struct Ticket {
        pub status: Status,
        pub history: Vec<Status>,
        pub priority: Option<Priority>,
    }

    let spool = Spool::default();
    let ticket = Ticket {
        status: Status::Active,
        history: vec![Status::Suspended],
        priority: None,
    };
    assert_json(
        &spool,
        &ticket,
        r#"{"status":"Active","history":["Suspended"],"priority":null}"#,
    );
    test_roundtrip(&spool, ticket);

    let err = spool
        .deserialize_str::<Ticket>(r#"{"status":"Active","history":["Closed"]}"#)
        .unwrap_err();
    assert_eq!(err.path(), Some("history[0]"));
}
