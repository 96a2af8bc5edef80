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
use spool_core::mapping::CreatorMapping;
use test_helpers::{assert_json, init_logger, test_roundtrip};

#[derive(JsonObject, Debug, PartialEq)]
#[json(constructor = "Temperature::new(celsius)")]
pub struct Temperature {
    pub celsius: f64,
    #[json(ignore)]
    pub fahrenheit: f64,
}

impl Temperature {
    pub fn new(celsius: f64) -> Temperature {
        Temperature {
            celsius,
            fahrenheit: celsius * 9.0 / 5.0 + 32.0,
        }
    }
}

#[test]
fn test_explicit_constructor() {
    init_logger();
    let spool = Spool::default();
    let temperature: Temperature = spool.deserialize_str(r#"{"celsius":100.0}"#).unwrap();
    assert_eq!(temperature, Temperature::new(100.0));
    assert_json(&spool, &temperature, r#"{"celsius":100.0}"#);
}

#[derive(JsonObject, Debug, PartialEq)]
#[json(constructor = "Rect::new(width, height)", rename_all = "camelCase")]
pub struct Rect {
    pub width: u32,
    pub height: u32,
    pub fill_color: Option<String>,
    #[json(default = "1")]
    pub line_width: u32,
}

impl Rect {
    pub fn new(width: u32, height: u32) -> Rect {
        Rect {
            width,
            height,
            fill_color: None,
            line_width: 1,
        }
    }
}

#[test]
fn test_members_outside_constructor_are_assigned_afterwards() {
    init_logger();
    let spool = Spool::default();
    let rect: Rect = spool
        .deserialize_str(r#"{"fillColor":"red","lineWidth":3,"height":2,"width":4}"#)
        .unwrap();
    assert_eq!(
        rect,
        Rect {
            width: 4,
            height: 2,
            fill_color: Some("red".to_string()),
            line_width: 3,
        }
    );

    let partial: Rect = spool.deserialize_str(r#"{"width":1}"#).unwrap();
    assert_eq!(partial, Rect::new(1, 0));
}

#[test]
fn test_memberwise_constructor_uses_member_defaults() {
    init_logger();
    #[derive(JsonObject, Debug, PartialEq)]
    pub struct Retry {
        #[json(default = "3")]
        pub attempts: u8,
        #[json(default = "String::from(\"linear\")")]
        pub backoff: String,
        pub jitter: bool,
    }

    let spool = Spool::default();
    let retry: Retry = spool.deserialize_str("{}").unwrap();
    assert_eq!(
        retry,
        Retry {
            attempts: 3,
            backoff: "linear".to_string(),
            jitter: false,
        }
    );
    test_roundtrip(
        &spool,
        Retry {
            attempts: 5,
            backoff: "exp".to_string(),
            jitter: true,
        },
    );
}

#[test]
fn test_anonymous_type() {
    init_logger();
    #[derive(JsonObject, Debug, PartialEq)]
    #[json(anonymous)]
    pub struct Point {
        pub x: i32,
        pub y: i32,
    }

    let spool = Spool::default();
    let point: Point = spool.deserialize_str(r#"{"y":-2,"x":5}"#).unwrap();
    assert_eq!(point, Point { x: 5, y: -2 });
    assert_json(&spool, &point, r#"{"x":5,"y":-2}"#);
}

#[derive(JsonObject, Debug, PartialEq, Default)]
#[json(default)]
pub struct Person {
    pub name: String,
    pub age: u32,
}

#[test]
fn test_registered_creator() {
    init_logger();
    let mut spool = Spool::default();
    spool
        .register_mapping::<Person, _>(|mapping| {
            mapping.auto_map()?;
            mapping.map_creator(CreatorMapping::from_fn(
                |name: String, age: u32| Person {
                    name: name.to_uppercase(),
                    age,
                },
                &["name", "age"],
            ));
            Ok(())
        })
        .unwrap();

    let person: Person = spool.deserialize_str(r#"{"age":36,"name":"ada"}"#).unwrap();
    assert_eq!(
        person,
        Person {
            name: "ADA".to_string(),
            age: 36,
        }
    );
}

#[test]
fn test_creator_parameter_without_member() {
    init_logger();
    let mut spool = Spool::default().naming_policy(NamingPolicy::CamelCase);
    spool
        .register_mapping::<Person, _>(|mapping| {
            mapping.auto_map()?;
            mapping.unmap_member("age");
            mapping.map_creator(CreatorMapping::from_fn(
                |name: String, birth_year: u32| Person {
                    name,
                    age: 2024 - birth_year,
                },
                &["name", "birth_year"],
            ));
            Ok(())
        })
        .unwrap();

    let person: Person = spool
        .deserialize_str(r#"{"name":"Grace","birthYear":1990}"#)
        .unwrap();
    assert_eq!(person.age, 34);
    // the parameter is not a member, so it is not written back
    assert_json(&spool, &person, r#"{"name":"Grace"}"#);
}

#[test]
fn test_creator_parameter_type_must_match_member() {
    init_logger();
    let mut spool = Spool::default();
    let err = spool
        .register_mapping::<Person, _>(|mapping| {
            mapping.auto_map()?;
            mapping.map_creator(CreatorMapping::from_fn(
                |name: String, age: i64| Person {
                    name,
                    age: age as u32,
                },
                &["name", "age"],
            ));
            Ok(())
        })
        .unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_renamed_member_binding() {
    init_logger();
    let mut spool = Spool::default();
    spool
        .register_mapping::<Person, _>(|mapping| {
            mapping.auto_map()?;
            let mut creator = CreatorMapping::from_fn(
                |full_name: String, years: u32| Person {
                    name: full_name,
                    age: years,
                },
                &["full_name", "years"],
            );
            creator.set_member_names(["name", "age"]);
            mapping.map_creator(creator);
            Ok(())
        })
        .unwrap();

    let person: Person = spool.deserialize_str(r#"{"name":"Lin","age":3}"#).unwrap();
    assert_eq!(
        person,
        Person {
            name: "Lin".to_string(),
            age: 3,
        }
    );
}
