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

//! `#[derive(JsonUnion)]`: enums whose variants each wrap one polymorphic
//! type, told apart by the wrapped type's discriminator.

use crate::util::parse_bool_or_flag;
use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Attribute, DataEnum, DeriveInput, Fields};

fn is_default_variant(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut is_default = false;
    for attr in attrs {
        if !attr.path().is_ident("json") {
            continue;
        }
        attr.parse_nested_meta(|nested| {
            if nested.path.is_ident("default") {
                is_default = parse_bool_or_flag(&nested)?;
                Ok(())
            } else {
                Err(nested.error("unknown json variant attribute"))
            }
        })?;
    }
    Ok(is_default)
}

pub fn derive_union(ast: &DeriveInput, data_enum: &DataEnum) -> syn::Result<TokenStream> {
    let name = &ast.ident;
    let union_name = name.unraw().to_string();
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let mut variants = Vec::with_capacity(data_enum.variants.len());
    let mut defaults = 0;
    for variant in &data_enum.variants {
        let ty = match &variant.fields {
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => &fields.unnamed[0].ty,
            _ => {
                return Err(syn::Error::new_spanned(
                    variant,
                    "JsonUnion variants wrap exactly one value, as in `Dog(Dog)`",
                ))
            }
        };
        let ident = &variant.ident;
        let variant_name = ident.unraw().to_string();
        let mut tokens = quote! {
            spool_core::serializer::union::UnionVariant::<Self>::new::<#ty>(
                #variant_name,
                Self::#ident,
                |value| match value {
                    Self::#ident(inner) => Some(inner),
                    #[allow(unreachable_patterns)]
                    _ => None,
                },
            )
        };
        if is_default_variant(&variant.attrs)? {
            defaults += 1;
            tokens.extend(quote! { .default_variant() });
        }
        variants.push(tokens);
    }
    if defaults > 1 {
        return Err(syn::Error::new_spanned(
            name,
            "at most one JsonUnion variant can be the default",
        ));
    }

    Ok(quote! {
        impl #impl_generics spool_core::serializer::union::JsonUnion for #name #ty_generics #where_clause {
            fn union_name() -> &'static str {
                #union_name
            }

            fn variants() -> Vec<spool_core::serializer::union::UnionVariant<Self>> {
                vec![#(#variants),*]
            }
        }

        impl #impl_generics spool_core::serializer::JsonType for #name #ty_generics #where_clause {
            fn create_converter(
                resolver: &spool_core::TypeResolver,
            ) -> Result<std::sync::Arc<dyn spool_core::Converter<Self>>, spool_core::Error> {
                let converter: std::sync::Arc<dyn spool_core::Converter<Self>> =
                    resolver.union_converter::<Self>()?;
                Ok(converter)
            }
        }

        impl #impl_generics spool_core::serializer::JsonPolymorphic for #name #ty_generics #where_clause {
            fn polymorphic_converter(
                resolver: &spool_core::TypeResolver,
            ) -> Result<
                std::sync::Arc<dyn spool_core::serializer::PolymorphicConverter<Self>>,
                spool_core::Error,
            > {
                let converter: std::sync::Arc<dyn spool_core::serializer::PolymorphicConverter<Self>> =
                    resolver.union_converter::<Self>()?;
                Ok(converter)
            }
        }
    })
}
