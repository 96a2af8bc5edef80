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

use spool::{Error, JsonObject, Spool};
use test_helpers::init_logger;

#[derive(JsonObject, Debug, PartialEq)]
pub struct Address {
    pub street: String,
    pub zip: u32,
}

#[derive(JsonObject, Debug, PartialEq)]
pub struct Customer {
    pub name: String,
    pub current: Address,
    pub previous: Vec<Address>,
}

#[test]
fn test_member_and_index_path() {
    init_logger();
    let spool = Spool::default();
    let json = r#"{
        "name": "Lin",
        "current": {"street": "Main", "zip": 1},
        "previous": [{"street": "Elm", "zip": "none"}]
    }"#;
    let err = spool.deserialize_str::<Customer>(json).unwrap_err();
    assert_eq!(err.path(), Some("previous[0].zip"));
    assert!(matches!(err.root_cause(), Error::TypeError(_)));
    assert!(err.to_string().ends_with("Path: $.previous[0].zip"));
}

#[test]
fn test_malformed_json() {
    init_logger();
    let spool = Spool::default();
    let err = spool
        .deserialize_str::<Address>(r#"{"street": "Main", "zip": }"#)
        .unwrap_err();
    assert_eq!(err.path(), Some("zip"));
    assert!(matches!(err.root_cause(), Error::Json(_)));

    let err = spool
        .deserialize_str::<Address>(r#"{"street": ]"#)
        .unwrap_err();
    assert_eq!(err.path(), Some("street"));
    assert!(matches!(err.root_cause(), Error::Json(_)));

    let err = spool
        .deserialize_str::<Vec<Option<bool>>>("[true, }")
        .unwrap_err();
    assert!(matches!(err.root_cause(), Error::Json(_)));

    let err = spool
        .deserialize_str::<Address>(r#"{"street": "Main" "zip": 1}"#)
        .unwrap_err();
    assert!(matches!(err.root_cause(), Error::Json(_)));

    let err = spool.deserialize_str::<Vec<u8>>("[1, 2").unwrap_err();
    assert!(matches!(err.root_cause(), Error::Json(_)));
}

#[test]
fn test_trailing_content() {
    init_logger();
    let spool = Spool::default();
    let read: Vec<u8> = spool.deserialize_str(" [1] \n").unwrap();
    assert_eq!(read, vec![1]);

    let err = spool.deserialize_str::<Vec<u8>>("[1] [2]").unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn test_wrong_token() {
    init_logger();
    let spool = Spool::default();
    let err = spool.deserialize_str::<Address>("[]").unwrap_err();
    assert!(matches!(err.root_cause(), Error::TypeError(_)));

    let err = spool
        .deserialize_str::<Address>(r#"{"street": 5, "zip": 1}"#)
        .unwrap_err();
    assert_eq!(err.path(), Some("street"));
    assert!(matches!(err.root_cause(), Error::TypeError(_)));

    let err = spool.deserialize_str::<Vec<bool>>(r#"["yes"]"#).unwrap_err();
    assert_eq!(err.path(), Some("[0]"));
    assert!(matches!(err.root_cause(), Error::TypeError(_)));
}

#[test]
fn test_narrow_integers() {
    init_logger();
    let spool = Spool::default();
    assert!(matches!(
        spool.deserialize_str::<u8>("300").unwrap_err().root_cause(),
        Error::TypeError(_)
    ));
    assert!(matches!(
        spool.deserialize_str::<u32>("-1").unwrap_err().root_cause(),
        Error::TypeError(_)
    ));
    assert!(matches!(
        spool.deserialize_str::<i32>("1.5").unwrap_err().root_cause(),
        Error::TypeError(_)
    ));
    assert_eq!(spool.deserialize_str::<i8>("-128").unwrap(), -128);
}

#[test]
fn test_root_error_has_no_path() {
    init_logger();
    let spool = Spool::default();
    let err = spool
        .deserialize_str::<Customer>(r#"{"name": "Lin", "previous": []}"#)
        .unwrap_err();
    assert_eq!(err.path(), None);
    assert!(matches!(err, Error::MissingMember(_)));
    assert!(err.to_string().contains("current"));

    // strings fall back to empty when absent
    let read: Address = spool.deserialize_str(r#"{"zip": 1}"#).unwrap();
    assert_eq!(read.street, "");
}
