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

//! Generates the body of `JsonObject::descriptor`.

use crate::object::field_meta::{parse_field_meta, FieldMeta};
use crate::object::type_meta::TypeMeta;
use crate::util::is_delegate_type;
use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Expr, Field, Fields, Ident, Type, Visibility};

pub struct ObjectField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub public: bool,
    pub delegate: bool,
    pub meta: FieldMeta,
}

impl ObjectField<'_> {
    fn name(&self) -> String {
        self.ident.unraw().to_string()
    }

    /// Whether the type's convention maps this field, and so whether the
    /// memberwise constructor takes it.
    fn is_mapped(&self, type_meta: &TypeMeta) -> bool {
        if self.meta.ignore || self.delegate || self.meta.extension_data {
            return false;
        }
        if type_meta.anonymous {
            self.public
        } else if type_meta.opt_in {
            self.meta.include
        } else {
            self.public || self.meta.include
        }
    }
}

pub fn object_fields(fields: &Fields) -> syn::Result<Vec<ObjectField<'_>>> {
    let named = match fields {
        Fields::Named(named) => named,
        Fields::Unit => return Ok(Vec::new()),
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(
                fields,
                "JsonObject needs named fields",
            ))
        }
    };
    let mut result = Vec::with_capacity(named.named.len());
    let mut extension: Option<&Field> = None;
    for field in &named.named {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let meta = parse_field_meta(field)?;
        if meta.extension_data {
            if extension.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "only one field can hold extension data",
                ));
            }
            extension = Some(field);
        }
        result.push(ObjectField {
            ident,
            ty: &field.ty,
            public: matches!(field.vis, Visibility::Public(_)),
            delegate: is_delegate_type(&field.ty),
            meta,
        });
    }
    Ok(result)
}

fn gen_member(field: &ObjectField) -> TokenStream {
    let ident = field.ident;
    let ty = field.ty;
    let name = field.name();
    let meta = &field.meta;

    let mut member = if meta.extension_data {
        quote! {
            spool_core::mapping::MemberDescriptor::<Self>::extension::<#ty>(
                #name,
                |value| &value.#ident,
                |value| &mut value.#ident,
            )
        }
    } else {
        quote! {
            spool_core::mapping::MemberDescriptor::<Self>::field::<#ty>(
                #name,
                |value| &value.#ident,
                |value| &mut value.#ident,
            )
        }
    };
    if !field.public {
        member.extend(quote! { .private() });
    }
    if meta.include {
        member.extend(quote! { .include() });
    }
    if let Some(rename) = &meta.rename {
        member.extend(quote! { .rename(#rename) });
    }
    if let Some(policy) = &meta.required {
        member.extend(quote! { .required(spool_core::types::RequirementPolicy::#policy) });
    }
    if let Some(default) = &meta.default {
        member.extend(quote! { .default_value::<#ty>(|| #default) });
    }
    if meta.ignore_if_default {
        member.extend(quote! { .comparable::<#ty>().ignore_if_default() });
    }
    if let Some(converter) = &meta.converter {
        member.extend(quote! { .converter::<#ty, #converter>() });
    }
    if meta.read_only {
        member.extend(quote! { .read_only() });
    }
    if meta.force_deserialize {
        member.extend(quote! { .force_deserialize() });
    }
    if let Some(predicate) = &meta.skip_serializing_if {
        member.extend(quote! { .should_serialize(|value| !#predicate(&value.#ident)) });
    }
    member
}

fn creator_tokens(params: &[(String, &Type)], call: TokenStream, preferred: bool) -> TokenStream {
    let names = params.iter().map(|(name, _)| name);
    let tys: Vec<_> = params.iter().map(|(_, ty)| *ty).collect();
    let args = if params.is_empty() {
        quote! { _ }
    } else {
        quote! { args }
    };
    quote! {
        spool_core::mapping::ConstructorDescriptor {
            preferred: #preferred,
            creator: spool_core::mapping::CreatorMapping::new(
                vec![#(spool_core::mapping::CreatorParameter::new::<#tys>(#names)),*],
                |#args: &mut spool_core::mapping::CreatorArgs| Ok(#call),
            ),
        }
    }
}

/// `#[json(constructor = "Type::new(a, b)")]`: every argument names a field,
/// whose type becomes the parameter type.
fn gen_explicit_constructor(
    fields: &[ObjectField],
    call: &syn::ExprCall,
) -> syn::Result<TokenStream> {
    let mut params = Vec::with_capacity(call.args.len());
    let mut takes = Vec::with_capacity(call.args.len());
    for (index, arg) in call.args.iter().enumerate() {
        let ident = match arg {
            Expr::Path(path) if path.qself.is_none() => path.path.get_ident(),
            _ => None,
        }
        .ok_or_else(|| syn::Error::new_spanned(arg, "constructor arguments must be field names"))?;
        let field = fields
            .iter()
            .find(|field| field.ident == ident)
            .ok_or_else(|| syn::Error::new_spanned(ident, format!("no field named `{ident}`")))?;
        let ty = field.ty;
        params.push((field.name(), ty));
        takes.push(quote! { args.take::<#ty>(#index)? });
    }
    let func = &call.func;
    Ok(creator_tokens(&params, quote! { #func(#(#takes),*) }, true))
}

/// One parameter per mapped field; every other field starts from
/// `Default::default()`.
fn gen_memberwise_constructor(
    fields: &[ObjectField],
    type_meta: &TypeMeta,
    unit: bool,
) -> TokenStream {
    if unit {
        return creator_tokens(&[], quote! { Self }, false);
    }
    let mut params = Vec::new();
    let mut inits = Vec::with_capacity(fields.len());
    for field in fields {
        let ident = field.ident;
        if field.is_mapped(type_meta) {
            let ty = field.ty;
            let index = params.len();
            params.push((field.name(), ty));
            inits.push(quote! { #ident: args.take::<#ty>(#index)? });
        } else {
            inits.push(quote! { #ident: ::std::default::Default::default() });
        }
    }
    creator_tokens(&params, quote! { Self { #(#inits),* } }, false)
}

fn gen_hooks(type_meta: &TypeMeta) -> TokenStream {
    let mut hooks = TokenStream::new();
    if let Some(method) = &type_meta.on_serializing {
        hooks.extend(quote! { descriptor.hooks.on_serializing = Some(Self::#method as fn(&Self)); });
    }
    if let Some(method) = &type_meta.on_serialized {
        hooks.extend(quote! { descriptor.hooks.on_serialized = Some(Self::#method as fn(&Self)); });
    }
    if let Some(method) = &type_meta.on_deserializing {
        hooks.extend(quote! { descriptor.hooks.on_deserializing = Some(Self::#method as fn(&mut Self)); });
    }
    if let Some(method) = &type_meta.on_deserialized {
        hooks.extend(quote! { descriptor.hooks.on_deserialized = Some(Self::#method as fn(&mut Self)); });
    }
    if type_meta.support_initialize {
        hooks.extend(quote! {
            descriptor.hooks.support_initialize = Some((
                <Self as spool_core::mapping::SupportInitialize>::begin_init as fn(&mut Self),
                <Self as spool_core::mapping::SupportInitialize>::end_init as fn(&mut Self),
            ));
        });
    }
    hooks
}

pub fn gen_descriptor(
    name: &Ident,
    fields: &[ObjectField],
    type_meta: &TypeMeta,
    unit: bool,
) -> syn::Result<TokenStream> {
    let type_name = name.unraw().to_string();
    let members: Vec<_> = fields
        .iter()
        .filter(|field| !field.meta.ignore && !field.delegate)
        .map(gen_member)
        .collect();

    let constructor = match &type_meta.constructor {
        Some(call) => Some(gen_explicit_constructor(fields, call)?),
        None if !type_meta.default => Some(gen_memberwise_constructor(fields, type_meta, unit)),
        None => None,
    };
    let constructors = constructor.into_iter();
    let default_factory = type_meta.default.then(|| {
        quote! {
            descriptor.default_factory = Some(<Self as ::std::default::Default>::default as fn() -> Self);
        }
    });

    let mut attributes = TokenStream::new();
    if let Some(policy) = type_meta.naming_policy_tokens() {
        attributes.extend(quote! { descriptor.attributes.rename_all = Some(#policy); });
    }
    if type_meta.opt_in {
        attributes.extend(quote! { descriptor.attributes.opt_in = true; });
    }
    if type_meta.anonymous {
        attributes.extend(quote! { descriptor.attributes.anonymous = true; });
    }
    if let Some(discriminator) = type_meta.discriminator_tokens() {
        attributes.extend(quote! { descriptor.attributes.discriminator = Some(#discriminator); });
    }
    if let Some(policy) = &type_meta.discriminator_policy {
        attributes.extend(quote! {
            descriptor.attributes.discriminator_policy = spool_core::config::DiscriminatorPolicy::#policy;
        });
    }
    let hooks = gen_hooks(type_meta);

    Ok(quote! {
        let mut descriptor = spool_core::mapping::TypeDescriptor::<Self>::new(#type_name);
        #attributes
        descriptor.members = vec![#(#members),*];
        descriptor.constructors = vec![#(#constructors),*];
        #default_factory
        #hooks
        descriptor
    })
}
