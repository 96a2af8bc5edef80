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
pub struct Account {
    #[json(required)]
    pub id: u64,
    #[json(required = "allow_null")]
    pub owner: Option<String>,
    #[json(required = "disallow_null")]
    pub nickname: Option<String>,
    pub note: Option<String>,
}

#[test]
fn test_all_members_present() {
    init_logger();
    let spool = Spool::default();
    let account: Account = spool
        .deserialize_str(r#"{"id":1,"owner":null,"nickname":"ace","note":null}"#)
        .unwrap();
    assert_eq!(
        account,
        Account {
            id: 1,
            owner: None,
            nickname: Some("ace".to_string()),
            note: None,
        }
    );
}

#[test]
fn test_absent_always_member() {
    init_logger();
    let spool = Spool::default();
    let err = spool
        .deserialize_str::<Account>(r#"{"owner":"x"}"#)
        .unwrap_err();
    assert!(matches!(err, Error::MissingMember(_)));
    assert!(err.to_string().contains("'id'"));
}

#[test]
fn test_null_always_member() {
    init_logger();
    let spool = Spool::default();
    let err = spool
        .deserialize_str::<Account>(r#"{"id":null,"owner":null}"#)
        .unwrap_err();
    assert_eq!(err.path(), Some("id"));
    assert!(matches!(err.root_cause(), Error::MissingMember(_)));
}

#[test]
fn test_absent_allow_null_member() {
    init_logger();
    let spool = Spool::default();
    let err = spool.deserialize_str::<Account>(r#"{"id":1}"#).unwrap_err();
    assert!(matches!(err, Error::MissingMember(_)));
    assert!(err.to_string().contains("'owner'"));
}

#[test]
fn test_disallow_null_member() {
    init_logger();
    let spool = Spool::default();
    // absent is fine
    let account: Account = spool
        .deserialize_str(r#"{"id":1,"owner":null}"#)
        .unwrap();
    assert_eq!(account.nickname, None);

    let err = spool
        .deserialize_str::<Account>(r#"{"id":1,"owner":null,"nickname":null}"#)
        .unwrap_err();
    assert_eq!(err.path(), Some("nickname"));
    assert!(matches!(err.root_cause(), Error::MissingMember(_)));
}

#[test]
fn test_required_member_of_default_constructed_type() {
    init_logger();
    #[derive(JsonObject, Debug, Default, PartialEq)]
    #[json(default)]
    pub struct Token {
        #[json(required)]
        pub value: String,
        pub scope: Vec<String>,
    }

    let spool = Spool::default();
    let token: Token = spool
        .deserialize_str(r#"{"scope":["read"],"value":"abc"}"#)
        .unwrap();
    assert_eq!(token.value, "abc");

    let err = spool
        .deserialize_str::<Token>(r#"{"scope":[]}"#)
        .unwrap_err();
    assert!(matches!(err, Error::MissingMember(_)));
}

#[test]
fn test_nested_required_member_reports_path() {
    init_logger();
    #[derive(JsonObject, Debug, PartialEq)]
    pub struct Holder {
        pub account: Account,
    }

    let spool = Spool::default();
    let err = spool
        .deserialize_str::<Holder>(r#"{"account":{"id":1,"owner":null,"nickname":null}}"#)
        .unwrap_err();
    assert_eq!(err.path(), Some("account.nickname"));
    assert_eq!(
        err.to_string(),
        "Required property 'nickname' expects a non-null value Path: $.account.nickname"
    );
}
