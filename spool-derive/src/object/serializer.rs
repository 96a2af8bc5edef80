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

use crate::object::descriptor::{gen_descriptor, object_fields};
use crate::object::type_meta::parse_type_meta;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataStruct, DeriveInput, Fields};

pub fn derive_object(ast: &DeriveInput, data: &DataStruct) -> syn::Result<TokenStream> {
    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();
    let type_meta = parse_type_meta(&ast.attrs)?;
    if type_meta.opt_in && type_meta.anonymous {
        return Err(syn::Error::new_spanned(
            name,
            "a type is either opt_in or anonymous, not both",
        ));
    }
    let fields = object_fields(&data.fields)?;
    let descriptor = gen_descriptor(
        name,
        &fields,
        &type_meta,
        matches!(data.fields, Fields::Unit),
    )?;

    let json_default = type_meta.default.then(|| {
        quote! {
            fn json_default() -> Option<Self> {
                Some(<Self as ::std::default::Default>::default())
            }
        }
    });

    Ok(quote! {
        impl #impl_generics spool_core::mapping::JsonObject for #name #ty_generics #where_clause {
            fn descriptor() -> spool_core::mapping::TypeDescriptor<Self> {
                #descriptor
            }
        }

        impl #impl_generics spool_core::serializer::JsonType for #name #ty_generics #where_clause {
            fn create_converter(
                resolver: &spool_core::TypeResolver,
            ) -> Result<std::sync::Arc<dyn spool_core::Converter<Self>>, spool_core::Error> {
                let converter: std::sync::Arc<dyn spool_core::Converter<Self>> =
                    resolver.object_converter::<Self>()?;
                Ok(converter)
            }

            #json_default
        }

        impl #impl_generics spool_core::serializer::JsonPolymorphic for #name #ty_generics #where_clause {
            fn polymorphic_converter(
                resolver: &spool_core::TypeResolver,
            ) -> Result<
                std::sync::Arc<dyn spool_core::serializer::PolymorphicConverter<Self>>,
                spool_core::Error,
            > {
                let converter: std::sync::Arc<dyn spool_core::serializer::PolymorphicConverter<Self>> =
                    resolver.object_converter::<Self>()?;
                Ok(converter)
            }
        }
    })
}
