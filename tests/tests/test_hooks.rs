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

use spool::{JsonObject, Spool, SupportInitialize};
use std::cell::RefCell;
use test_helpers::init_logger;

thread_local! {
    static WRITES: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

fn take_writes() -> Vec<String> {
    WRITES.with(|writes| writes.take())
}

#[derive(JsonObject, Debug, Default, PartialEq)]
#[json(
    default,
    on_serializing = "before_write",
    on_serialized = "after_write",
    on_deserializing = "before_read",
    on_deserialized = "after_read"
)]
pub struct Invoice {
    pub net: u32,
    pub tax: u32,
    #[json(ignore)]
    pub total: u32,
    #[json(ignore)]
    pub trace: Vec<&'static str>,
}

impl Invoice {
    fn before_write(&self) {
        WRITES.with(|writes| writes.borrow_mut().push(format!("serializing {}", self.net)));
    }

    fn after_write(&self) {
        WRITES.with(|writes| writes.borrow_mut().push(format!("serialized {}", self.net)));
    }

    fn before_read(&mut self) {
        self.trace.push("deserializing");
    }

    fn after_read(&mut self) {
        self.total = self.net + self.tax;
        self.trace.push("deserialized");
    }
}

#[test]
fn test_deserialization_hooks() {
    init_logger();
    let spool = Spool::default();
    let invoice: Invoice = spool.deserialize_str(r#"{"net":100,"tax":20}"#).unwrap();
    assert_eq!(invoice.total, 120);
    assert_eq!(invoice.trace, vec!["deserializing", "deserialized"]);
}

#[test]
fn test_serialization_hooks() {
    init_logger();
    take_writes();
    let spool = Spool::default();
    let invoice = Invoice {
        net: 7,
        tax: 1,
        ..Default::default()
    };
    let json = spool.serialize_to_string(&invoice).unwrap();
    assert_eq!(json, r#"{"net":7,"tax":1}"#);
    assert_eq!(take_writes(), vec!["serializing 7", "serialized 7"]);
}

#[test]
fn test_hooks_run_for_every_nested_instance() {
    init_logger();
    take_writes();
    let spool = Spool::default();
    let invoices = vec![
        Invoice {
            net: 1,
            ..Default::default()
        },
        Invoice {
            net: 2,
            ..Default::default()
        },
    ];
    spool.serialize(&invoices).unwrap();
    assert_eq!(
        take_writes(),
        vec!["serializing 1", "serialized 1", "serializing 2", "serialized 2"]
    );

    let read: Vec<Invoice> = spool
        .deserialize_str(r#"[{"net":1,"tax":1},{"net":2,"tax":2}]"#)
        .unwrap();
    assert_eq!(read[0].total, 2);
    assert_eq!(read[1].total, 4);
}

#[derive(JsonObject, Debug, Default)]
#[json(default, support_initialize)]
pub struct Batch {
    pub items: Vec<u32>,
    #[json(ignore)]
    pub initializing: bool,
    #[json(ignore)]
    pub sum: u32,
    #[json(ignore)]
    pub began: bool,
}

impl SupportInitialize for Batch {
    fn begin_init(&mut self) {
        self.initializing = true;
        self.began = true;
    }

    fn end_init(&mut self) {
        self.initializing = false;
        self.sum = self.items.iter().sum();
    }
}

#[test]
fn test_support_initialize() {
    init_logger();
    let spool = Spool::default();
    let batch: Batch = spool.deserialize_str(r#"{"items":[1,2,3]}"#).unwrap();
    assert!(batch.began);
    assert!(!batch.initializing);
    assert_eq!(batch.sum, 6);
}

#[test]
fn test_hooks_with_constructor() {
    init_logger();
    #[derive(JsonObject, Debug, PartialEq)]
    #[json(on_deserialized = "normalize")]
    pub struct Tag {
        pub label: String,
    }

    impl Tag {
        fn normalize(&mut self) {
            self.label = self.label.to_lowercase();
        }
    }

    let spool = Spool::default();
    let tag: Tag = spool.deserialize_str(r#"{"label":"RUST"}"#).unwrap();
    assert_eq!(tag.label, "rust");
}
