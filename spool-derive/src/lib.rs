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

//! # Spool Derive Macros
//!
//! Procedural macros describing types to spool.
//!
//! ## `#[derive(JsonObject)]`
//!
//! Generates the `TypeDescriptor` of a struct with named fields: one member
//! per field with its attributes, the constructor used to build it and its
//! lifecycle hooks. The type also gets `JsonType` and `JsonPolymorphic`, so
//! it can be read and written directly and wrapped by a union.
//!
//! Without `#[json(default)]` or `#[json(constructor = "..")]`, instances are
//! built through a memberwise constructor taking every mapped field; the
//! remaining fields must implement `Default`.
//!
//! ```rust
//! use spool::{JsonObject, Spool};
//!
//! #[derive(JsonObject, Debug, PartialEq)]
//! #[json(rename_all = "camelCase")]
//! pub struct Person {
//!     pub first_name: String,
//!     #[json(required)]
//!     pub id: u64,
//! }
//!
//! let spool = Spool::default();
//! let person: Person = spool.deserialize_str(r#"{"firstName":"Ada","id":7}"#).unwrap();
//! assert_eq!(person, Person { first_name: "Ada".to_string(), id: 7 });
//! ```
//!
//! Type attributes: `rename_all`, `opt_in`, `anonymous`, `default`,
//! `constructor`, `discriminator`, `discriminator_policy`, `on_serializing`,
//! `on_serialized`, `on_deserializing`, `on_deserialized` and
//! `support_initialize`.
//!
//! Field attributes: `rename`, `ignore`, `include`, `required`, `default`,
//! `ignore_if_default`, `extension_data`, `converter`, `read_only`,
//! `force_deserialize` and `skip_serializing_if`.
//!
//! ## `#[derive(JsonUnion)]`
//!
//! For enums whose variants each wrap one `JsonObject` (or another union).
//! The wrapped type's discriminator selects the variant while reading; one
//! variant may be marked `#[json(default)]` for objects without one.
//!
//! ## `#[derive(JsonEnum)]`
//!
//! For unit-only enums, written as their (optionally renamed) variant names
//! and read from a name or the variant's integer value. Such enums can also
//! be dictionary keys.

use proc_macro::TokenStream;
use syn::{parse_macro_input, Data, DeriveInput};

mod object;
mod util;

#[proc_macro_derive(JsonObject, attributes(json))]
pub fn proc_macro_derive_json_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let result = match &input.data {
        Data::Struct(data) => object::derive_object(&input, data),
        _ => Err(syn::Error::new_spanned(
            &input.ident,
            "JsonObject can only be derived for structs",
        )),
    };
    result.unwrap_or_else(syn::Error::into_compile_error).into()
}

#[proc_macro_derive(JsonUnion, attributes(json))]
pub fn proc_macro_derive_json_union(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let result = match &input.data {
        Data::Enum(data) => object::derive_union(&input, data),
        _ => Err(syn::Error::new_spanned(
            &input.ident,
            "JsonUnion can only be derived for enums",
        )),
    };
    result.unwrap_or_else(syn::Error::into_compile_error).into()
}

#[proc_macro_derive(JsonEnum, attributes(json))]
pub fn proc_macro_derive_json_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let result = match &input.data {
        Data::Enum(data) => object::derive_enum(&input, data),
        _ => Err(syn::Error::new_spanned(
            &input.ident,
            "JsonEnum can only be derived for enums",
        )),
    };
    result.unwrap_or_else(syn::Error::into_compile_error).into()
}
