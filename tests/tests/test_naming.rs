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

use spool::{Error, JsonObject, NamingPolicy, Spool};
use std::collections::BTreeMap;
use test_helpers::{assert_json, init_logger, test_roundtrip};

#[derive(JsonObject, Debug, PartialEq, Default)]
#[json(default)]
pub struct Profile {
    pub first_name: String,
    pub last_login_at: u64,
    #[json(rename = "ID")]
    pub user_id: u32,
}

fn profile() -> Profile {
    Profile {
        first_name: "Ada".to_string(),
        last_login_at: 1700,
        user_id: 9,
    }
}

#[test]
fn test_declared_names_by_default() {
    init_logger();
    let spool = Spool::default();
    assert_json(
        &spool,
        &profile(),
        r#"{"first_name":"Ada","last_login_at":1700,"ID":9}"#,
    );
}

#[test]
fn test_global_naming_policy() {
    init_logger();
    let spool = Spool::default().naming_policy(NamingPolicy::CamelCase);
    assert_json(
        &spool,
        &profile(),
        r#"{"firstName":"Ada","lastLoginAt":1700,"ID":9}"#,
    );
    test_roundtrip(&spool, profile());

    let kebab = Spool::default().naming_policy(NamingPolicy::KebabCase);
    assert_json(
        &kebab,
        &profile(),
        r#"{"first-name":"Ada","last-login-at":1700,"ID":9}"#,
    );
}

#[test]
fn test_custom_naming_policy() {
    init_logger();
    fn prefixed(name: &str) -> String {
        format!("p_{name}")
    }

    let spool = Spool::default().naming_policy(NamingPolicy::Custom(prefixed));
    assert_json(
        &spool,
        &profile(),
        r#"{"p_first_name":"Ada","p_last_login_at":1700,"ID":9}"#,
    );
}

#[test]
fn test_type_rename_all_overrides_global_policy() {
    init_logger();
    #[derive(JsonObject, Debug, PartialEq)]
    #[json(rename_all = "PascalCase")]
    pub struct Order {
        pub order_id: u64,
        pub line_count: u16,
    }

    let spool = Spool::default().naming_policy(NamingPolicy::SnakeCase);
    let order = Order {
        order_id: 42,
        line_count: 3,
    };
    assert_json(&spool, &order, r#"{"OrderId":42,"LineCount":3}"#);
    test_roundtrip(&spool, order);
}

#[test]
fn test_dictionary_key_policy() {
    init_logger();
    let mut scores = BTreeMap::new();
    scores.insert("first_try".to_string(), 1u8);
    scores.insert("second_try".to_string(), 2u8);

    let spool = Spool::default().dictionary_key_policy(NamingPolicy::CamelCase);
    assert_json(&spool, &scores, r#"{"firstTry":1,"secondTry":2}"#);

    // keys are read back verbatim
    let read: BTreeMap<String, u8> = spool.deserialize_str(r#"{"firstTry":1}"#).unwrap();
    assert_eq!(read.get("firstTry"), Some(&1));
}

#[test]
fn test_colliding_names_are_rejected() {
    init_logger();
    #[derive(JsonObject, Debug, Default)]
    #[json(default)]
    pub struct Clash {
        pub name: String,
        #[json(rename = "name")]
        pub alias: String,
    }

    let mut spool = Spool::default();
    let err = spool.register::<Clash>().unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_names_differing_in_case_only() {
    init_logger();
    #[derive(JsonObject, Debug, Default, PartialEq)]
    #[json(default)]
    pub struct Pair {
        #[json(rename = "value")]
        pub lower: u8,
        #[json(rename = "Value")]
        pub upper: u8,
    }

    let exact = Spool::default();
    let read: Pair = exact.deserialize_str(r#"{"Value":2,"value":1}"#).unwrap();
    assert_eq!(read, Pair { lower: 1, upper: 2 });

    let mut folded = Spool::default().case_insensitive(true);
    assert!(matches!(folded.register::<Pair>(), Err(Error::Config(_))));
}
