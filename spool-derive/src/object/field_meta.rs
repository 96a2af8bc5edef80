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

//! Field-level `#[json(...)]` attributes.
//!
//! - `rename = ".."`: wire name, overriding the naming policy
//! - `ignore`: not part of the descriptor at all
//! - `include`: maps a private field, and marks data members of opt-in types
//! - `required = "always" | "allow_null" | "disallow_null" | "never"`
//! - `default = "expr"`: value for absent constructor arguments and
//!   `ignore_if_default` comparison
//! - `ignore_if_default`: omitted on write when equal to the default
//! - `extension_data`: collects unmatched properties
//! - `converter = "Path"`: converter type used for this member only
//! - `read_only`, `force_deserialize`
//! - `skip_serializing_if = "path"`: predicate over the field value

use crate::util::{parse_bool_or_flag, parse_lit_str};
use syn::spanned::Spanned;
use syn::{Expr, Field, Ident, LitStr, Path};

#[derive(Default)]
pub struct FieldMeta {
    pub rename: Option<LitStr>,
    pub ignore: bool,
    pub include: bool,
    /// Variant name of `spool_core::types::RequirementPolicy`.
    pub required: Option<Ident>,
    pub default: Option<Expr>,
    pub ignore_if_default: bool,
    pub extension_data: bool,
    pub converter: Option<Path>,
    pub read_only: bool,
    pub force_deserialize: bool,
    pub skip_serializing_if: Option<Path>,
}

fn parse_requirement(lit: &LitStr) -> syn::Result<Ident> {
    let variant = match lit.value().as_str() {
        "always" => "Always",
        "allow_null" => "AllowNull",
        "disallow_null" => "DisallowNull",
        "never" => "Never",
        other => {
            return Err(syn::Error::new(
                lit.span(),
                format!("unknown requirement `{other}`"),
            ))
        }
    };
    Ok(Ident::new(variant, lit.span()))
}

pub fn parse_field_meta(field: &Field) -> syn::Result<FieldMeta> {
    let mut meta = FieldMeta::default();

    for attr in &field.attrs {
        if !attr.path().is_ident("json") {
            continue;
        }

        attr.parse_nested_meta(|nested| {
            if nested.path.is_ident("rename") {
                meta.rename = Some(parse_lit_str(&nested)?);
            } else if nested.path.is_ident("ignore") {
                meta.ignore = parse_bool_or_flag(&nested)?;
            } else if nested.path.is_ident("include") {
                meta.include = parse_bool_or_flag(&nested)?;
            } else if nested.path.is_ident("required") {
                // A bare `required` means `always`.
                if nested.input.is_empty() || nested.input.peek(syn::Token![,]) {
                    meta.required = Some(Ident::new("Always", nested.path.span()));
                } else {
                    meta.required = Some(parse_requirement(&parse_lit_str(&nested)?)?);
                }
            } else if nested.path.is_ident("default") {
                meta.default = Some(parse_lit_str(&nested)?.parse()?);
            } else if nested.path.is_ident("ignore_if_default") {
                meta.ignore_if_default = parse_bool_or_flag(&nested)?;
            } else if nested.path.is_ident("extension_data") {
                meta.extension_data = parse_bool_or_flag(&nested)?;
            } else if nested.path.is_ident("converter") {
                meta.converter = Some(parse_lit_str(&nested)?.parse()?);
            } else if nested.path.is_ident("read_only") {
                meta.read_only = parse_bool_or_flag(&nested)?;
            } else if nested.path.is_ident("force_deserialize") {
                meta.force_deserialize = parse_bool_or_flag(&nested)?;
            } else if nested.path.is_ident("skip_serializing_if") {
                meta.skip_serializing_if = Some(parse_lit_str(&nested)?.parse()?);
            } else {
                return Err(nested.error("unknown json field attribute"));
            }
            Ok(())
        })?;
    }

    if meta.extension_data && (meta.rename.is_some() || meta.converter.is_some()) {
        return Err(syn::Error::new_spanned(
            field,
            "an extension_data field takes no rename or converter",
        ));
    }
    Ok(meta)
}
