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

#![allow(dead_code)]

use spool::{JsonType, Spool};
use std::fmt::Debug;
use std::sync::Once;

static LOGGER: Once = Once::new();

/// Routes `log` output through env_logger, once per test binary.
pub fn init_logger() {
    LOGGER.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Generic helper function for roundtrip serialization testing
pub fn test_roundtrip<T>(spool: &Spool, value: T)
where
    T: JsonType + PartialEq + Debug,
{
    let bytes = spool.serialize(&value).unwrap();
    let result: T = spool.deserialize(&bytes).unwrap();
    assert_eq!(value, result);
}

/// Asserts the exact text `value` is written as.
pub fn assert_json<T: JsonType>(spool: &Spool, value: &T, expected: &str) {
    let json = spool.serialize_to_string(value).unwrap();
    assert_eq!(json, expected);
}
