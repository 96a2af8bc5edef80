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

use spool::{Error, JsonObject, MissingMemberHandling, Spool};
use test_helpers::{assert_json, init_logger, test_roundtrip};

#[test]
fn test_plain_struct() {
    init_logger();
    #[derive(JsonObject, Debug, PartialEq)]
    pub struct Person {
        pub name: String,
        pub age: u32,
        pub tags: Vec<String>,
    }

    let spool = Spool::default();
    let person = Person {
        name: "Ada".to_string(),
        age: 36,
        tags: vec!["math".to_string(), "engines".to_string()],
    };
    assert_json(
        &spool,
        &person,
        r#"{"name":"Ada","age":36,"tags":["math","engines"]}"#,
    );
    test_roundtrip(&spool, person);
}

#[test]
fn test_members_read_in_any_order() {
    init_logger();
    #[derive(JsonObject, Debug, PartialEq)]
    pub struct Point {
        pub x: i32,
        pub y: i32,
    }

    let spool = Spool::default();
    let point: Point = spool.deserialize_str(r#" { "y" : -2 , "x" : 5 } "#).unwrap();
    assert_eq!(point, Point { x: 5, y: -2 });
}

#[test]
fn test_absent_members_take_natural_defaults() {
    init_logger();
    #[derive(JsonObject, Debug, PartialEq)]
    pub struct Settings {
        pub name: String,
        pub retries: u8,
        pub verbose: bool,
        pub paths: Vec<String>,
        pub limit: Option<u64>,
    }

    let spool = Spool::default();
    let settings: Settings = spool.deserialize_str(r#"{"name":"svc"}"#).unwrap();
    assert_eq!(
        settings,
        Settings {
            name: "svc".to_string(),
            retries: 0,
            verbose: false,
            paths: Vec::new(),
            limit: None,
        }
    );
}

#[test]
fn test_private_fields_need_include() {
    init_logger();
    #[derive(JsonObject, Debug, PartialEq, Default)]
    #[json(default)]
    pub struct Account {
        pub login: String,
        password: String,
        #[json(include)]
        balance: i64,
    }

    let spool = Spool::default();
    let account = Account {
        login: "ada".to_string(),
        password: "secret".to_string(),
        balance: 10,
    };
    assert_json(&spool, &account, r#"{"login":"ada","balance":10}"#);

    let read: Account = spool
        .deserialize_str(r#"{"login":"bob","password":"p","balance":3}"#)
        .unwrap();
    assert_eq!(read.login, "bob");
    assert_eq!(read.password, "");
    assert_eq!(read.balance, 3);
}

#[test]
fn test_ignored_and_function_fields() {
    init_logger();
    #[derive(JsonObject, Default)]
    #[json(default)]
    pub struct Button {
        pub label: String,
        #[json(ignore)]
        pub clicks: std::cell::Cell<u32>,
        pub on_click: Option<fn() -> u32>,
    }

    fn handler() -> u32 {
        7
    }

    let spool = Spool::default();
    let button = Button {
        label: "ok".to_string(),
        clicks: std::cell::Cell::new(3),
        on_click: Some(handler),
    };
    assert_json(&spool, &button, r#"{"label":"ok"}"#);
    let read: Button = spool
        .deserialize_str(r#"{"label":"go","clicks":9,"on_click":null}"#)
        .unwrap();
    assert_eq!(read.label, "go");
    assert_eq!(read.clicks.get(), 0);
    assert!(read.on_click.is_none());
}

#[test]
fn test_nested_objects_and_nulls() {
    init_logger();
    #[derive(JsonObject, Debug, PartialEq, Clone)]
    pub struct Address {
        pub city: String,
        pub zip: Option<String>,
    }

    #[derive(JsonObject, Debug, PartialEq)]
    pub struct Customer {
        pub name: String,
        pub address: Address,
        pub previous: Vec<Address>,
    }

    let home = Address {
        city: "London".to_string(),
        zip: None,
    };
    let customer = Customer {
        name: "Ada".to_string(),
        address: home.clone(),
        previous: vec![Address {
            city: "Paris".to_string(),
            zip: Some("75001".to_string()),
        }],
    };

    let spool = Spool::default();
    assert_json(
        &spool,
        &customer,
        r#"{"name":"Ada","address":{"city":"London","zip":null},"previous":[{"city":"Paris","zip":"75001"}]}"#,
    );
    test_roundtrip(&spool, customer);

    let spool = Spool::default().ignore_null_values(true);
    assert_json(&spool, &home, r#"{"city":"London"}"#);
}

#[test]
fn test_unknown_members() {
    init_logger();
    #[derive(JsonObject, Debug, PartialEq)]
    pub struct Point {
        pub x: i32,
        pub y: i32,
    }

    let json = r#"{"x":1,"color":{"r":[1,2,3]},"y":2}"#;
    let lenient = Spool::default();
    let point: Point = lenient.deserialize_str(json).unwrap();
    assert_eq!(point, Point { x: 1, y: 2 });

    let strict = Spool::default().missing_member_handling(MissingMemberHandling::Error);
    let err = strict.deserialize_str::<Point>(json).unwrap_err();
    assert!(matches!(err.root_cause(), Error::NotAllowed(_)));
    assert!(err.to_string().contains("color"));
}

#[test]
fn test_case_insensitive_names() {
    init_logger();
    #[derive(JsonObject, Debug, PartialEq, Default)]
    #[json(default)]
    pub struct Login {
        pub user_name: String,
        pub attempts: u32,
    }

    let json = r#"{"USER_NAME":"ada","Attempts":2}"#;
    let exact = Spool::default();
    let read: Login = exact.deserialize_str(json).unwrap();
    assert_eq!(read, Login::default());

    let folded = Spool::default().case_insensitive(true);
    let read: Login = folded.deserialize_str(json).unwrap();
    assert_eq!(
        read,
        Login {
            user_name: "ada".to_string(),
            attempts: 2
        }
    );
}

#[test]
fn test_unit_struct() {
    init_logger();
    #[derive(JsonObject, Debug, PartialEq)]
    pub struct Marker;

    let spool = Spool::default();
    assert_json(&spool, &Marker, "{}");
    let read: Marker = spool.deserialize_str(r#"{"anything":true}"#).unwrap();
    assert_eq!(read, Marker);
}

#[test]
fn test_wrong_token_kinds() {
    init_logger();
    #[derive(JsonObject, Debug)]
    pub struct Point {
        pub x: i32,
    }

    let spool = Spool::default();
    let err = spool.deserialize_str::<Point>("[1]").unwrap_err();
    assert!(matches!(err, Error::TypeError(_)));

    let err = spool.deserialize_str::<Point>(r#"{"x":1} extra"#).unwrap_err();
    assert!(matches!(err, Error::Json(_)));

    let err = spool.deserialize_str::<Point>(r#"{"x":1"#).unwrap_err();
    assert!(matches!(err.root_cause(), Error::Json(_)));
}
