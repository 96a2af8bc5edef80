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

use chrono::{DateTime, TimeZone, Utc};
use spool::{JsonEnum, JsonObject, Spool};
use std::collections::HashMap;
use test_helpers::{assert_json, init_logger, test_roundtrip};

#[derive(JsonEnum, Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Red,
    Green,
}

#[derive(JsonObject, Debug, PartialEq)]
#[json(rename_all = "PascalCase")]
pub struct Primitives {
    pub boolean: bool,
    pub s_byte: i8,
    pub byte: u8,
    pub int16: i16,
    pub u_int16: u16,
    pub int32: i32,
    pub u_int32: u32,
    pub int64: i64,
    pub u_int64: u64,
    pub single: f32,
    pub double: f64,
    pub character: char,
    pub text: String,
    pub date_time: DateTime<Utc>,
    pub color: Color,
}

#[test]
fn test_every_primitive() {
    init_logger();
    let spool = Spool::default();
    let json = concat!(
        r#"{"Boolean":true,"SByte":-8,"Byte":200,"Int16":-300,"UInt16":60000,"#,
        r#""Int32":-70000,"UInt32":4000000000,"Int64":-9000000000,"#,
        r#""UInt64":18446744073709551615,"Single":20.209999084472656,"Double":2.5,"#,
        r#""Character":"x","Text":"hi","DateTime":"2024-03-09T14:05:00Z","Color":"Green"}"#
    );
    let read: Primitives = spool.deserialize_str(json).unwrap();
    assert_eq!(read.single, 20.21f32);
    assert_eq!(read.u_int64, u64::MAX);
    assert_eq!(
        read.date_time,
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap()
    );

    let expected = json.replace("20.209999084472656", "20.2099991");
    assert_json(&spool, &read, &expected);
    test_roundtrip(&spool, read);
}

#[test]
fn test_integer_keyed_dictionary() {
    init_logger();
    let spool = Spool::default();
    let json = r#"{"1":"foo","2":"bar"}"#;
    let read: HashMap<i32, String> = spool.deserialize_str(json).unwrap();
    assert_eq!(read.len(), 2);
    assert_eq!(read[&1], "foo");
    assert_eq!(read[&2], "bar");

    let ordered: std::collections::BTreeMap<i32, String> = read.into_iter().collect();
    assert_json(&spool, &ordered, json);
}

#[test]
fn test_non_finite_floats_are_rejected() {
    init_logger();
    let spool = Spool::default();
    assert!(spool.serialize(&f64::NAN).is_err());
    assert!(spool.serialize(&f32::INFINITY).is_err());
}
