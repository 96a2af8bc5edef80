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

use syn::meta::ParseNestedMeta;
use syn::{GenericArgument, LitStr, PathArguments, Type, TypeParamBound};

/// Parses a boolean value or treats a standalone flag as `true`.
pub fn parse_bool_or_flag(meta: &ParseNestedMeta) -> syn::Result<bool> {
    if meta.input.is_empty() || meta.input.peek(syn::Token![,]) {
        Ok(true)
    } else {
        let lit: syn::LitBool = meta.value()?.parse()?;
        Ok(lit.value)
    }
}

pub fn parse_lit_str(meta: &ParseNestedMeta) -> syn::Result<LitStr> {
    meta.value()?.parse()
}

/// Whether the type holds a function: a bare `fn` pointer, or a boxed or
/// shared `dyn Fn*` trait object.
pub fn is_delegate_type(ty: &Type) -> bool {
    match ty {
        Type::BareFn(_) => true,
        Type::Paren(inner) => is_delegate_type(&inner.elem),
        Type::Group(inner) => is_delegate_type(&inner.elem),
        Type::Path(type_path) => {
            let Some(seg) = type_path.path.segments.last() else {
                return false;
            };
            if !matches!(seg.ident.to_string().as_str(), "Box" | "Rc" | "Arc" | "Option") {
                return false;
            }
            let PathArguments::AngleBracketed(args) = &seg.arguments else {
                return false;
            };
            match args.args.first() {
                Some(GenericArgument::Type(Type::TraitObject(object))) => {
                    object.bounds.iter().any(|bound| match bound {
                        TypeParamBound::Trait(bound) => bound
                            .path
                            .segments
                            .last()
                            .is_some_and(|seg| matches!(seg.ident.to_string().as_str(), "Fn" | "FnMut" | "FnOnce")),
                        _ => false,
                    })
                }
                Some(GenericArgument::Type(inner)) if seg.ident == "Option" => is_delegate_type(inner),
                _ => false,
            }
        }
        _ => false,
    }
}
