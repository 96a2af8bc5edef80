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

//! # Spool Core
//!
//! The runtime of spool, a JSON object mapper: it decides which members of a
//! type are read and written under which names, builds converters for them
//! once, and runs those converters over a pull reader and a push writer.
//!
//! ## Architecture
//!
//! - **`spool`**: the [`Spool`] entry point, holding configuration and registrations
//! - **`buffer`**: the JSON [`Reader`](buffer::Reader) and [`Writer`](buffer::Writer)
//! - **`mapping`**: type descriptors, mapping conventions, member and creator mappings
//! - **`serializer`**: converters for objects, unions, scalars, wrappers and collections
//! - **`discriminator`**: discriminator conventions and their registry
//! - **`resolver`**: read/write contexts, converter caches and reference tracking
//! - **`config`**, **`error`**, **`types`**, **`util`**: options, errors, shared constants, naming and the member trie
//!
//! ## Mapping
//!
//! Structs derive `JsonObject`, which describes their members and
//! constructors. A convention turns that description into an
//! [`ObjectMapping`](mapping::ObjectMapping); the default convention maps
//! public fields, the opt-in convention only fields marked `include`, and the
//! anonymous convention binds every member through the single constructor.
//! Mappings can also be built or adjusted by hand with
//! [`Spool::register_mapping`].
//!
//! ## Polymorphism
//!
//! Enums deriving `JsonUnion` wrap one concrete type per variant. The
//! concrete type is recorded in a discriminator member (`$type` by default)
//! and selected from it while reading, wherever the member appears in the
//! object.
//!
//! ## References
//!
//! With [`ReferenceHandling::Preserve`](config::ReferenceHandling), `Rc` and
//! `Arc` values are written once with an `$id` and then as `{"$ref": ..}`,
//! so shared and cyclic graphs round trip.
//!
//! ## Usage
//!
//! ```rust
//! use spool_core::Spool;
//! use std::collections::BTreeMap;
//!
//! let spool = Spool::default();
//! let mut scores = BTreeMap::new();
//! scores.insert("ada".to_string(), 3u32);
//! let json = spool.serialize_to_string(&scores).unwrap();
//! assert_eq!(json, r#"{"ada":3}"#);
//! ```

pub mod buffer;
pub mod config;
pub mod discriminator;
pub mod error;
pub mod mapping;
pub mod resolver;
pub mod serializer;
pub mod spool;
pub mod types;
pub mod util;

pub use crate::config::Config;
pub use crate::error::Error;
pub use crate::resolver::context::{ReadContext, WriteContext};
pub use crate::resolver::type_resolver::{ConverterFactory, TypeResolver};
pub use crate::serializer::{Converter, JsonType};
pub use crate::spool::Spool;
