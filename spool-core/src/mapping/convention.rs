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

//! Conventions decide how a type's declared members become a mapping.
//!
//! The registry asks its [`ObjectMappingConventionProvider`]s, most recently
//! registered first, for the convention of each type. The built-in provider
//! picks [`AnonymousObjectMappingConvention`] for `#[json(anonymous)]` types,
//! [`OptInObjectMappingConvention`] for `#[json(opt_in)]` types and
//! [`DefaultObjectMappingConvention`] for the rest.

use crate::error::Error;
use crate::mapping::descriptor::{MemberInfo, TypeAttributes};
use crate::mapping::member::MemberMappingConfig;
use crate::mapping::object::ObjectMappingBuilder;
use crate::types::Visibility;
use std::any::TypeId;
use std::sync::Arc;

pub trait ObjectMappingConvention: Send + Sync {
    fn apply(&self, mapping: &mut dyn ObjectMappingBuilder) -> Result<(), Error>;
}

pub trait ObjectMappingConventionProvider: Send + Sync {
    /// The convention for the type, or `None` to defer to older providers.
    fn get_convention(
        &self,
        type_id: TypeId,
        attributes: &TypeAttributes,
    ) -> Option<Arc<dyn ObjectMappingConvention>>;
}

fn apply_member_attributes(member: &mut dyn MemberMappingConfig, info: &MemberInfo) {
    let attributes = &info.attributes;
    if let Some(name) = &attributes.rename {
        member.set_name(name);
    }
    if let Some(policy) = attributes.required {
        member.set_requirement(policy);
    }
    if let Some(default) = &attributes.default_value {
        member.set_default_value_any(default.clone());
    }
    if let Some(equality) = &attributes.equality {
        member.set_equality_any(equality.clone());
    }
    if attributes.ignore_if_default {
        member.set_ignore_if_default(true);
    }
    if let Some(converter) = &attributes.converter {
        member.set_converter_any(converter.clone());
    }
    if attributes.read_only {
        member.set_read_only(true);
    }
    if attributes.force_deserialize {
        member.set_force_deserialize(true);
    }
}

fn apply_type_attributes(mapping: &mut dyn ObjectMappingBuilder) {
    let attributes = mapping.attributes().clone();
    if let Some(policy) = attributes.rename_all {
        mapping.set_naming_policy(Some(policy));
    }
    mapping.set_discriminator(attributes.discriminator);
    mapping.set_discriminator_policy(attributes.discriminator_policy);
    mapping.map_declared_hooks();
}

/// Maps every member passing `select`, the extension data member and the
/// creator the type calls for.
fn map_members(
    mapping: &mut dyn ObjectMappingBuilder,
    select: impl Fn(&MemberInfo) -> bool,
) -> Result<(), Error> {
    for info in mapping.member_infos() {
        let attributes = &info.attributes;
        if attributes.ignore || attributes.delegate {
            continue;
        }
        if attributes.extension_data {
            mapping.map_extension_data(info.name)?;
            continue;
        }
        if !select(&info) {
            continue;
        }
        let member = mapping.map_member(info.name)?;
        apply_member_attributes(member, &info);
    }
    Ok(())
}

fn map_default_creator(mapping: &mut dyn ObjectMappingBuilder) -> Result<(), Error> {
    if let Some(index) = mapping.preferred_constructor() {
        mapping.map_constructor(index)
    } else if !mapping.has_factory() && mapping.constructor_count() > 0 {
        mapping.map_constructor(0)
    } else {
        Ok(())
    }
}

/// Maps public members and private members marked `include`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultObjectMappingConvention;

impl ObjectMappingConvention for DefaultObjectMappingConvention {
    fn apply(&self, mapping: &mut dyn ObjectMappingBuilder) -> Result<(), Error> {
        apply_type_attributes(mapping);
        map_members(mapping, |info| {
            info.visibility == Visibility::Public || info.attributes.include
        })?;
        map_default_creator(mapping)
    }
}

/// Maps only members marked `include`, whatever their visibility.
#[derive(Clone, Copy, Debug, Default)]
pub struct OptInObjectMappingConvention;

impl ObjectMappingConvention for OptInObjectMappingConvention {
    fn apply(&self, mapping: &mut dyn ObjectMappingBuilder) -> Result<(), Error> {
        apply_type_attributes(mapping);
        map_members(mapping, |info| info.attributes.include)?;
        map_default_creator(mapping)
    }
}

/// Read-only public members filled through the type's single constructor.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnonymousObjectMappingConvention;

impl ObjectMappingConvention for AnonymousObjectMappingConvention {
    fn apply(&self, mapping: &mut dyn ObjectMappingBuilder) -> Result<(), Error> {
        apply_type_attributes(mapping);
        for info in mapping.member_infos() {
            if info.visibility != Visibility::Public || info.attributes.ignore {
                continue;
            }
            let member = mapping.map_member(info.name)?;
            apply_member_attributes(member, &info);
            member.set_read_only(true);
        }
        if mapping.constructor_count() == 0 {
            return Err(Error::config(format!(
                "anonymous type {} declares no constructor",
                mapping.type_name()
            )));
        }
        mapping.map_constructor(0)
    }
}

/// Chooses between the built-in conventions from the type attributes.
#[derive(Clone, Default)]
pub struct DefaultObjectMappingConventionProvider;

impl ObjectMappingConventionProvider for DefaultObjectMappingConventionProvider {
    fn get_convention(
        &self,
        _type_id: TypeId,
        attributes: &TypeAttributes,
    ) -> Option<Arc<dyn ObjectMappingConvention>> {
        if attributes.anonymous {
            Some(Arc::new(AnonymousObjectMappingConvention))
        } else if attributes.opt_in {
            Some(Arc::new(OptInObjectMappingConvention))
        } else {
            Some(Arc::new(DefaultObjectMappingConvention))
        }
    }
}
