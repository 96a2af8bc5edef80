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

//! # Spool
//!
//! A JSON object mapper: structs, tagged unions and enums are described once
//! through derive macros, and spool reads and writes them under configurable
//! names, with required members, extension data, lifecycle hooks and
//! optional `$id`/`$ref` reference preservation.
//!
//! ## Quick start
//!
//! ```rust
//! use spool::{JsonObject, JsonUnion, Spool};
//!
//! #[derive(JsonObject, Debug, PartialEq)]
//! #[json(discriminator = "circle")]
//! pub struct Circle {
//!     pub radius: f64,
//! }
//!
//! #[derive(JsonObject, Debug, PartialEq)]
//! #[json(discriminator = "square")]
//! pub struct Square {
//!     pub side: f64,
//! }
//!
//! #[derive(JsonUnion, Debug, PartialEq)]
//! pub enum Shape {
//!     Circle(Circle),
//!     Square(Square),
//! }
//!
//! let spool = Spool::default();
//! let shapes = vec![
//!     Shape::Circle(Circle { radius: 1.5 }),
//!     Shape::Square(Square { side: 2.0 }),
//! ];
//! let json = spool.serialize_to_string(&shapes).unwrap();
//! assert_eq!(
//!     json,
//!     r#"[{"$type":"circle","radius":1.5},{"$type":"square","side":2.0}]"#
//! );
//! let back: Vec<Shape> = spool.deserialize_str(&json).unwrap();
//! assert_eq!(back, shapes);
//! ```
//!
//! ## Configuration
//!
//! [`Spool`] is built with consuming setters and is immutable afterwards,
//! except for registrations:
//!
//! ```rust
//! use spool::{NamingPolicy, ReferenceHandling, Spool};
//!
//! let spool = Spool::default()
//!     .naming_policy(NamingPolicy::CamelCase)
//!     .reference_handling(ReferenceHandling::Preserve)
//!     .max_depth(32);
//! assert!(spool.config().is_preserve_references());
//! ```

pub use spool_core::{
    config::{
        Config, DiscriminatorPolicy, MissingMemberHandling, ReadOnlyPropertyHandling,
        ReferenceHandling,
    },
    error::Error,
    mapping::{JsonObject, SupportInitialize},
    serializer::{enum_::JsonEnum, key::JsonKey, union::JsonUnion, Converter, JsonType},
    spool::Spool,
    types::RequirementPolicy,
    util::NamingPolicy,
};
pub use spool_derive::{JsonEnum, JsonObject, JsonUnion};
