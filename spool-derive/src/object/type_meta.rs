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

//! Type-level `#[json(...)]` attributes of `#[derive(JsonObject)]`.

use crate::util::{parse_bool_or_flag, parse_lit_str};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Expr, ExprCall, Ident, Lit, LitStr};

pub const NAMING_POLICIES: &[(&str, &str)] = &[
    ("camelCase", "CamelCase"),
    ("PascalCase", "PascalCase"),
    ("snake_case", "SnakeCase"),
    ("kebab-case", "KebabCase"),
    ("UPPERCASE", "UpperCase"),
    ("lowercase", "LowerCase"),
];

#[derive(Default)]
pub struct TypeMeta {
    /// Variant name of `spool_core::util::NamingPolicy`.
    pub rename_all: Option<Ident>,
    pub opt_in: bool,
    pub anonymous: bool,
    pub constructor: Option<ExprCall>,
    pub default: bool,
    pub discriminator: Option<Lit>,
    /// Variant name of `spool_core::config::DiscriminatorPolicy`.
    pub discriminator_policy: Option<Ident>,
    pub on_serializing: Option<Ident>,
    pub on_serialized: Option<Ident>,
    pub on_deserializing: Option<Ident>,
    pub on_deserialized: Option<Ident>,
    pub support_initialize: bool,
}

pub fn parse_naming_policy(lit: &LitStr) -> syn::Result<Ident> {
    let value = lit.value();
    NAMING_POLICIES
        .iter()
        .find(|(name, _)| *name == value)
        .map(|(_, variant)| Ident::new(variant, lit.span()))
        .ok_or_else(|| {
            let known: Vec<_> = NAMING_POLICIES.iter().map(|(name, _)| *name).collect();
            syn::Error::new(
                lit.span(),
                format!("unknown naming policy `{value}`, expected one of {known:?}"),
            )
        })
}

fn parse_hook(lit: &LitStr) -> syn::Result<Ident> {
    lit.parse()
}

pub fn parse_type_meta(attrs: &[Attribute]) -> syn::Result<TypeMeta> {
    let mut meta = TypeMeta::default();
    for attr in attrs {
        if !attr.path().is_ident("json") {
            continue;
        }
        attr.parse_nested_meta(|nested| {
            if nested.path.is_ident("rename_all") {
                meta.rename_all = Some(parse_naming_policy(&parse_lit_str(&nested)?)?);
            } else if nested.path.is_ident("opt_in") {
                meta.opt_in = parse_bool_or_flag(&nested)?;
            } else if nested.path.is_ident("anonymous") {
                meta.anonymous = parse_bool_or_flag(&nested)?;
            } else if nested.path.is_ident("default") {
                meta.default = parse_bool_or_flag(&nested)?;
            } else if nested.path.is_ident("constructor") {
                let lit = parse_lit_str(&nested)?;
                match lit.parse::<Expr>()? {
                    Expr::Call(call) => meta.constructor = Some(call),
                    _ => {
                        return Err(syn::Error::new(
                            lit.span(),
                            "constructor must be a call such as `Type::new(a, b)`",
                        ))
                    }
                }
            } else if nested.path.is_ident("discriminator") {
                let lit: Lit = nested.value()?.parse()?;
                if !matches!(lit, Lit::Str(_) | Lit::Int(_)) {
                    return Err(syn::Error::new(
                        lit.span(),
                        "discriminator must be a string or an integer",
                    ));
                }
                meta.discriminator = Some(lit);
            } else if nested.path.is_ident("discriminator_policy") {
                let lit = parse_lit_str(&nested)?;
                let variant = match lit.value().as_str() {
                    "default" => "Default",
                    "auto" => "Auto",
                    "never" => "Never",
                    "always" => "Always",
                    other => {
                        return Err(syn::Error::new(
                            lit.span(),
                            format!("unknown discriminator policy `{other}`"),
                        ))
                    }
                };
                meta.discriminator_policy = Some(Ident::new(variant, lit.span()));
            } else if nested.path.is_ident("on_serializing") {
                meta.on_serializing = Some(parse_hook(&parse_lit_str(&nested)?)?);
            } else if nested.path.is_ident("on_serialized") {
                meta.on_serialized = Some(parse_hook(&parse_lit_str(&nested)?)?);
            } else if nested.path.is_ident("on_deserializing") {
                meta.on_deserializing = Some(parse_hook(&parse_lit_str(&nested)?)?);
            } else if nested.path.is_ident("on_deserialized") {
                meta.on_deserialized = Some(parse_hook(&parse_lit_str(&nested)?)?);
            } else if nested.path.is_ident("support_initialize") {
                meta.support_initialize = parse_bool_or_flag(&nested)?;
            } else {
                return Err(nested.error("unknown json type attribute"));
            }
            Ok(())
        })?;
    }
    Ok(meta)
}

impl TypeMeta {
    pub fn naming_policy_tokens(&self) -> Option<TokenStream> {
        self.rename_all
            .as_ref()
            .map(|variant| quote! { spool_core::util::NamingPolicy::#variant })
    }

    pub fn discriminator_tokens(&self) -> Option<TokenStream> {
        match self.discriminator.as_ref()? {
            Lit::Str(value) => Some(quote! {
                spool_core::discriminator::DiscriminatorValue::from(#value)
            }),
            Lit::Int(value) => Some(quote! {
                spool_core::discriminator::DiscriminatorValue::Int(#value)
            }),
            _ => None,
        }
    }
}
