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

use spool::{DiscriminatorPolicy, Error, JsonObject, JsonUnion, Spool};
use spool_core::discriminator::{DefaultDiscriminatorConvention, TypeNameDiscriminatorConvention};
use std::sync::Arc;
use test_helpers::{assert_json, init_logger, test_roundtrip};

#[derive(JsonObject, Debug, PartialEq)]
#[json(discriminator = "circle")]
pub struct Circle {
    pub radius: f64,
}

#[derive(JsonObject, Debug, PartialEq)]
#[json(discriminator = "square")]
pub struct Square {
    pub side: f64,
}

#[derive(JsonObject, Debug, PartialEq)]
pub struct Blob {
    pub points: Vec<i32>,
}

#[derive(JsonUnion, Debug, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Square(Square),
}

#[derive(JsonUnion, Debug, PartialEq)]
pub enum AnyShape {
    Known(Shape),
    #[json(default)]
    Blob(Blob),
}

#[derive(JsonObject, Debug, PartialEq)]
pub struct Drawing {
    pub name: String,
    pub shapes: Vec<Shape>,
}

#[test]
fn test_union_writes_discriminator_first() {
    init_logger();
    let spool = Spool::default();
    let shapes = vec![
        Shape::Circle(Circle { radius: 1.5 }),
        Shape::Square(Square { side: 2.0 }),
    ];
    assert_json(
        &spool,
        &shapes,
        r#"[{"$type":"circle","radius":1.5},{"$type":"square","side":2.0}]"#,
    );
    test_roundtrip(&spool, shapes);
}

#[test]
fn test_concrete_write_omits_discriminator() {
    init_logger();
    let spool = Spool::default();
    assert_json(&spool, &Circle { radius: 1.0 }, r#"{"radius":1.0}"#);
    // the member is skipped when read as the concrete type
    let circle: Circle = spool
        .deserialize_str(r#"{"$type":"circle","radius":3.0}"#)
        .unwrap();
    assert_eq!(circle.radius, 3.0);
}

#[test]
fn test_late_discriminator() {
    init_logger();
    let spool = Spool::default();
    let shape: Shape = spool
        .deserialize_str(r#"{"side":4.0,"$type":"square"}"#)
        .unwrap();
    assert_eq!(shape, Shape::Square(Square { side: 4.0 }));

    let drawing: Drawing = spool
        .deserialize_str(
            r#"{"shapes":[{"radius":1.0,"$type":"circle"},{"$type":"square","side":3.0}],"name":"d"}"#,
        )
        .unwrap();
    assert_eq!(
        drawing.shapes,
        vec![
            Shape::Circle(Circle { radius: 1.0 }),
            Shape::Square(Square { side: 3.0 }),
        ]
    );
}

#[test]
fn test_unknown_discriminator() {
    init_logger();
    let spool = Spool::default();
    let err = spool
        .deserialize_str::<Shape>(r#"{"$type":"triangle","sides":3}"#)
        .unwrap_err();
    assert!(matches!(err, Error::UnknownDiscriminator(_)));
    assert!(err.to_string().contains("triangle"));
}

#[test]
fn test_missing_discriminator_without_default() {
    init_logger();
    let spool = Spool::default();
    let err = spool
        .deserialize_str::<Shape>(r#"{"radius":1.0}"#)
        .unwrap_err();
    assert!(matches!(err, Error::UnknownDiscriminator(_)));
}

#[test]
fn test_default_variant_and_nested_union() {
    init_logger();
    let spool = Spool::default();
    let blob: AnyShape = spool.deserialize_str(r#"{"points":[1,2]}"#).unwrap();
    assert_eq!(blob, AnyShape::Blob(Blob { points: vec![1, 2] }));

    let known: AnyShape = spool
        .deserialize_str(r#"{"$type":"circle","radius":0.5}"#)
        .unwrap();
    assert_eq!(known, AnyShape::Known(Shape::Circle(Circle { radius: 0.5 })));

    assert_json(&spool, &known, r#"{"$type":"circle","radius":0.5}"#);
    assert_json(&spool, &blob, r#"{"points":[1,2]}"#);
}

#[test]
fn test_non_object_for_union() {
    init_logger();
    let spool = Spool::default();
    let err = spool.deserialize_str::<Shape>("[1]").unwrap_err();
    assert!(matches!(err, Error::TypeError(_)));
}

#[test]
fn test_discriminator_policy_always() {
    init_logger();
    #[derive(JsonObject, Debug, PartialEq)]
    #[json(discriminator = "marker", discriminator_policy = "always")]
    pub struct Marker {
        pub at: u32,
    }

    let spool = Spool::default();
    assert_json(&spool, &Marker { at: 2 }, r#"{"$type":"marker","at":2}"#);

    let global = Spool::default().discriminator_policy(DiscriminatorPolicy::Always);
    assert_json(&global, &Circle { radius: 2.0 }, r#"{"$type":"circle","radius":2.0}"#);
}

#[test]
fn test_discriminator_policy_never() {
    init_logger();
    #[derive(JsonObject, Debug, PartialEq)]
    #[json(discriminator = "quiet", discriminator_policy = "never")]
    pub struct Quiet {
        pub level: u8,
    }

    #[derive(JsonUnion, Debug, PartialEq)]
    pub enum Noise {
        #[json(default)]
        Quiet(Quiet),
        Circle(Circle),
    }

    let spool = Spool::default();
    let quiet = Noise::Quiet(Quiet { level: 1 });
    assert_json(&spool, &quiet, r#"{"level":1}"#);
    // readable again through the default variant
    test_roundtrip(&spool, quiet);
    // an explicit discriminator still selects the type
    let read: Noise = spool.deserialize_str(r#"{"$type":"quiet","level":3}"#).unwrap();
    assert_eq!(read, Noise::Quiet(Quiet { level: 3 }));
}

#[test]
fn test_integer_discriminators() {
    init_logger();
    #[derive(JsonObject, Debug, PartialEq)]
    #[json(discriminator = 1)]
    pub struct Login {
        pub user: String,
    }

    #[derive(JsonObject, Debug, PartialEq)]
    #[json(discriminator = 2)]
    pub struct Logout {
        pub user: String,
        pub forced: bool,
    }

    #[derive(JsonUnion, Debug, PartialEq)]
    pub enum Audit {
        Login(Login),
        Logout(Logout),
    }

    let spool = Spool::default();
    let events = vec![
        Audit::Login(Login {
            user: "ann".to_string(),
        }),
        Audit::Logout(Logout {
            user: "ann".to_string(),
            forced: true,
        }),
    ];
    assert_json(
        &spool,
        &events,
        r#"[{"$type":1,"user":"ann"},{"$type":2,"user":"ann","forced":true}]"#,
    );
    test_roundtrip(&spool, events);
}

#[test]
fn test_type_name_convention() {
    init_logger();
    #[derive(JsonObject, Debug, PartialEq)]
    pub struct Cat {
        pub lives: u8,
    }

    #[derive(JsonObject, Debug, PartialEq)]
    pub struct Dog {
        pub good: bool,
    }

    #[derive(JsonUnion, Debug, PartialEq)]
    pub enum Pet {
        Cat(Cat),
        Dog(Dog),
    }

    let mut spool = Spool::default();
    spool
        .register_discriminator_convention(Arc::new(TypeNameDiscriminatorConvention::new("kind")))
        .unwrap();
    spool.register_union::<Pet>().unwrap();

    let pets = vec![Pet::Cat(Cat { lives: 9 }), Pet::Dog(Dog { good: true })];
    assert_json(
        &spool,
        &pets,
        r#"[{"kind":"Cat","lives":9},{"kind":"Dog","good":true}]"#,
    );
    test_roundtrip(&spool, pets);
}

#[test]
fn test_custom_member_name() {
    init_logger();
    #[derive(JsonObject, Debug, PartialEq)]
    #[json(discriminator = "deposit")]
    pub struct Deposit {
        pub amount: u64,
    }

    #[derive(JsonObject, Debug, PartialEq)]
    #[json(discriminator = "withdrawal")]
    pub struct Withdrawal {
        pub amount: u64,
    }

    #[derive(JsonUnion, Debug, PartialEq)]
    pub enum Transaction {
        Deposit(Deposit),
        Withdrawal(Withdrawal),
    }

    let mut spool = Spool::default();
    spool
        .register_discriminator_convention(Arc::new(DefaultDiscriminatorConvention::new("op")))
        .unwrap();

    let tx: Transaction = spool
        .deserialize_str(r#"{"amount":5,"op":"withdrawal"}"#)
        .unwrap();
    assert_eq!(tx, Transaction::Withdrawal(Withdrawal { amount: 5 }));
    assert_json(&spool, &tx, r#"{"op":"withdrawal","amount":5}"#);
}

#[test]
fn test_duplicate_discriminator_values() {
    init_logger();
    #[derive(JsonObject, Debug, PartialEq)]
    #[json(discriminator = "same")]
    pub struct First {
        pub a: u8,
    }

    #[derive(JsonObject, Debug, PartialEq)]
    #[json(discriminator = "same")]
    pub struct Second {
        pub b: u8,
    }

    #[derive(JsonUnion, Debug, PartialEq)]
    pub enum Both {
        First(First),
        Second(Second),
    }

    let mut spool = Spool::default();
    let err = spool.register_union::<Both>().unwrap_err();
    assert!(matches!(err.root_cause(), Error::Config(_)));
}
