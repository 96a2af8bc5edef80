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

//! `#[derive(JsonEnum)]`: unit-only enums written as variant names.

use crate::object::type_meta::parse_naming_policy;
use crate::util::parse_lit_str;
use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Attribute, DataEnum, DeriveInput, Fields, Ident, LitStr};

fn parse_enum_rename_all(attrs: &[Attribute]) -> syn::Result<Option<Ident>> {
    let mut rename_all = None;
    for attr in attrs {
        if !attr.path().is_ident("json") {
            continue;
        }
        attr.parse_nested_meta(|nested| {
            if nested.path.is_ident("rename_all") {
                rename_all = Some(parse_naming_policy(&parse_lit_str(&nested)?)?);
                Ok(())
            } else {
                Err(nested.error("unknown json enum attribute"))
            }
        })?;
    }
    Ok(rename_all)
}

fn parse_variant_rename(attrs: &[Attribute]) -> syn::Result<Option<LitStr>> {
    let mut rename = None;
    for attr in attrs {
        if !attr.path().is_ident("json") {
            continue;
        }
        attr.parse_nested_meta(|nested| {
            if nested.path.is_ident("rename") {
                rename = Some(parse_lit_str(&nested)?);
                Ok(())
            } else {
                Err(nested.error("unknown json variant attribute"))
            }
        })?;
    }
    Ok(rename)
}

fn gen_variants(data_enum: &DataEnum, rename_all: Option<&Ident>) -> syn::Result<Vec<TokenStream>> {
    let mut variants = Vec::with_capacity(data_enum.variants.len());
    for variant in &data_enum.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "JsonEnum variants cannot hold data; derive JsonUnion instead",
            ));
        }
        let ident = &variant.ident;
        let declared = ident.unraw().to_string();
        let name = match (parse_variant_rename(&variant.attrs)?, rename_all) {
            (Some(rename), _) => quote! { #rename },
            (None, Some(policy)) => {
                quote! { spool_core::util::NamingPolicy::#policy.convert(#declared) }
            }
            (None, None) => quote! { #declared },
        };
        variants.push(quote! {
            spool_core::serializer::enum_::EnumVariant::new(#name, Self::#ident as i64, || Self::#ident)
        });
    }
    Ok(variants)
}

pub fn derive_enum(ast: &DeriveInput, data_enum: &DataEnum) -> syn::Result<TokenStream> {
    let name = &ast.ident;
    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &ast.generics,
            "JsonEnum does not support generic enums",
        ));
    }
    let rename_all = parse_enum_rename_all(&ast.attrs)?;
    let variants = gen_variants(data_enum, rename_all.as_ref())?;
    let idents: Vec<_> = data_enum.variants.iter().map(|v| &v.ident).collect();
    let indices = 0..idents.len();

    Ok(quote! {
        impl spool_core::serializer::enum_::JsonEnum for #name {
            fn variants() -> Vec<spool_core::serializer::enum_::EnumVariant<Self>> {
                vec![#(#variants),*]
            }

            fn variant_index(&self) -> usize {
                match self {
                    #(Self::#idents => #indices,)*
                }
            }
        }

        impl spool_core::serializer::JsonType for #name {
            fn create_converter(
                resolver: &spool_core::TypeResolver,
            ) -> Result<std::sync::Arc<dyn spool_core::Converter<Self>>, spool_core::Error> {
                spool_core::serializer::enum_::EnumConverter::<Self>::create(resolver)
            }
        }

        impl spool_core::serializer::key::JsonKey for #name {
            fn create_key_converter(
                resolver: &spool_core::TypeResolver,
            ) -> Result<
                std::sync::Arc<dyn spool_core::serializer::key::DictionaryKeyConverter<Self>>,
                spool_core::Error,
            > {
                spool_core::serializer::enum_::EnumKeyConverter::<Self>::create(resolver)
            }
        }
    })
}
