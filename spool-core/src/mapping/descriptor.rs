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

//! Static description of a mapped type, as emitted by `#[derive(JsonObject)]`.
//!
//! A [`TypeDescriptor`] lists every member the type declares together with
//! its attributes, the constructors that can build it and its lifecycle
//! hooks. It says nothing about how the type is mapped: conventions read it
//! to populate an [`ObjectMapping`](crate::mapping::ObjectMapping).

use crate::config::DiscriminatorPolicy;
use crate::discriminator::DiscriminatorValue;
use crate::mapping::creator::CreatorMapping;
use crate::mapping::extension::{ExtensionData, ExtensionDataMapping};
use crate::mapping::member::{MemberMapping, MemberMappingDyn};
use crate::serializer::{Converter, JsonType};
use crate::types::{MemberKind, RequirementPolicy, Visibility};
use crate::util::NamingPolicy;
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::sync::Arc;

/// Erased default value producer; the produced box must hold the member type.
pub type DefaultValueFn = Arc<dyn Fn() -> Box<dyn Any> + Send + Sync>;

/// Erased member converter producer; the produced box must hold an
/// `Arc<dyn Converter<M>>` for the member type `M`.
pub type ConverterFn = Arc<dyn Fn() -> Box<dyn Any + Send + Sync> + Send + Sync>;

#[derive(Clone, Default)]
pub struct MemberAttributes {
    pub rename: Option<Cow<'static, str>>,
    pub ignore: bool,
    /// Marks a data member: included even when private, and the only
    /// members an opt-in type maps.
    pub include: bool,
    pub required: Option<RequirementPolicy>,
    pub default_value: Option<DefaultValueFn>,
    /// `fn(&M, &M) -> bool` for the member type, boxed.
    pub equality: Option<Arc<dyn Any + Send + Sync>>,
    pub ignore_if_default: bool,
    pub extension_data: bool,
    pub converter: Option<ConverterFn>,
    pub read_only: bool,
    pub force_deserialize: bool,
    /// The member holds a function; conventions never map it.
    pub delegate: bool,
}

#[derive(Clone)]
pub struct MemberInfo {
    pub name: &'static str,
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub kind: MemberKind,
    pub visibility: Visibility,
    pub attributes: MemberAttributes,
}

impl MemberInfo {
    pub(crate) fn new<M: 'static>(name: &'static str, kind: MemberKind) -> MemberInfo {
        MemberInfo {
            name,
            type_id: TypeId::of::<M>(),
            type_name: std::any::type_name::<M>(),
            kind,
            visibility: Visibility::Public,
            attributes: MemberAttributes::default(),
        }
    }
}

type MemberBinder<T> = Box<dyn Fn(&MemberInfo) -> Box<dyn MemberMappingDyn<T>> + Send + Sync>;
type ExtensionBinder<T> = Box<dyn Fn(&MemberInfo) -> ExtensionDataMapping<T> + Send + Sync>;

enum Binding<T> {
    Member(MemberBinder<T>),
    Extension(ExtensionBinder<T>),
}

/// One declared member: its metadata and how to bind it into a mapping.
pub struct MemberDescriptor<T> {
    pub info: MemberInfo,
    should_serialize: Option<fn(&T) -> bool>,
    binding: Binding<T>,
}

impl<T: 'static> MemberDescriptor<T> {
    /// A struct field, read and assigned in place.
    pub fn field<M: JsonType>(
        name: &'static str,
        get: fn(&T) -> &M,
        get_mut: fn(&mut T) -> &mut M,
    ) -> MemberDescriptor<T> {
        MemberDescriptor {
            info: MemberInfo::new::<M>(name, MemberKind::Field),
            should_serialize: None,
            binding: Binding::Member(Box::new(
                move |info: &MemberInfo| -> Box<dyn MemberMappingDyn<T>> {
                    Box::new(MemberMapping::field(info.clone(), get, get_mut))
                },
            )),
        }
    }

    /// A computed property with an optional setter.
    pub fn property<M: JsonType>(
        name: &'static str,
        get: fn(&T) -> M,
        set: Option<fn(&mut T, M)>,
    ) -> MemberDescriptor<T> {
        MemberDescriptor {
            info: MemberInfo::new::<M>(name, MemberKind::Property),
            should_serialize: None,
            binding: Binding::Member(Box::new(
                move |info: &MemberInfo| -> Box<dyn MemberMappingDyn<T>> {
                    Box::new(MemberMapping::property(info.clone(), get, set))
                },
            )),
        }
    }

    /// A field collecting unmatched properties on read and emitting them on
    /// write.
    pub fn extension<E: ExtensionData>(
        name: &'static str,
        get: fn(&T) -> &E,
        get_mut: fn(&mut T) -> &mut E,
    ) -> MemberDescriptor<T> {
        let mut info = MemberInfo::new::<E>(name, MemberKind::Field);
        info.attributes.extension_data = true;
        MemberDescriptor {
            info,
            should_serialize: None,
            binding: Binding::Extension(Box::new(move |info: &MemberInfo| {
                ExtensionDataMapping::new(info.name, get, get_mut)
            })),
        }
    }

    pub fn rename(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.info.attributes.rename = Some(name.into());
        self
    }

    pub fn ignore(mut self) -> Self {
        self.info.attributes.ignore = true;
        self
    }

    pub fn include(mut self) -> Self {
        self.info.attributes.include = true;
        self
    }

    pub fn private(mut self) -> Self {
        self.info.visibility = Visibility::Private;
        self
    }

    pub fn required(mut self, policy: RequirementPolicy) -> Self {
        self.info.attributes.required = Some(policy);
        self
    }

    pub fn default_value<M: 'static>(mut self, default: fn() -> M) -> Self {
        self.info.attributes.default_value = Some(Arc::new(move || Box::new(default()) as Box<dyn Any>));
        self
    }

    /// Makes the member comparable to its default value.
    pub fn comparable<M: PartialEq + 'static>(mut self) -> Self {
        let eq: fn(&M, &M) -> bool = <M as PartialEq>::eq;
        self.info.attributes.equality = Some(Arc::new(eq));
        self
    }

    pub fn ignore_if_default(mut self) -> Self {
        self.info.attributes.ignore_if_default = true;
        self
    }

    pub fn converter<M: 'static, C: Converter<M> + Default>(mut self) -> Self {
        self.info.attributes.converter = Some(Arc::new(|| {
            let converter: Arc<dyn Converter<M>> = Arc::new(C::default());
            Box::new(converter) as Box<dyn Any + Send + Sync>
        }));
        self
    }

    pub fn read_only(mut self) -> Self {
        self.info.attributes.read_only = true;
        self
    }

    pub fn force_deserialize(mut self) -> Self {
        self.info.attributes.force_deserialize = true;
        self
    }

    pub fn delegate(mut self) -> Self {
        self.info.attributes.delegate = true;
        self
    }

    pub fn should_serialize(mut self, predicate: fn(&T) -> bool) -> Self {
        self.should_serialize = Some(predicate);
        self
    }

    pub fn is_extension(&self) -> bool {
        matches!(self.binding, Binding::Extension(_))
    }

    /// A fresh member mapping for this member, or `None` for an extension
    /// data member.
    pub fn bind(&self) -> Option<Box<dyn MemberMappingDyn<T>>> {
        match &self.binding {
            Binding::Member(binder) => {
                let mut mapping = binder(&self.info);
                if let Some(predicate) = self.should_serialize {
                    mapping.set_should_serialize(Arc::new(predicate));
                }
                Some(mapping)
            }
            Binding::Extension(_) => None,
        }
    }

    pub fn bind_extension(&self) -> Option<ExtensionDataMapping<T>> {
        match &self.binding {
            Binding::Extension(binder) => Some(binder(&self.info)),
            Binding::Member(_) => None,
        }
    }
}

/// A constructor the type can be built with.
pub struct ConstructorDescriptor<T> {
    /// Selected over every other constructor by the default convention.
    pub preferred: bool,
    pub creator: CreatorMapping<T>,
}

#[derive(Clone, Debug, Default)]
pub struct TypeAttributes {
    pub rename_all: Option<NamingPolicy>,
    pub opt_in: bool,
    pub anonymous: bool,
    pub discriminator: Option<DiscriminatorValue>,
    pub discriminator_policy: DiscriminatorPolicy,
}

pub struct Hooks<T> {
    pub on_serializing: Option<fn(&T)>,
    pub on_serialized: Option<fn(&T)>,
    pub on_deserializing: Option<fn(&mut T)>,
    pub on_deserialized: Option<fn(&mut T)>,
    /// `begin_init` and `end_init`, run around reading when no explicit
    /// deserialization hooks are declared.
    pub support_initialize: Option<(fn(&mut T), fn(&mut T))>,
}

impl<T> Default for Hooks<T> {
    fn default() -> Self {
        Hooks {
            on_serializing: None,
            on_serialized: None,
            on_deserializing: None,
            on_deserialized: None,
            support_initialize: None,
        }
    }
}

pub struct TypeDescriptor<T> {
    /// Short type name, used in messages and by type-name discriminators.
    pub name: &'static str,
    pub attributes: TypeAttributes,
    pub members: Vec<MemberDescriptor<T>>,
    pub constructors: Vec<ConstructorDescriptor<T>>,
    pub default_factory: Option<fn() -> T>,
    pub hooks: Hooks<T>,
}

impl<T: 'static> TypeDescriptor<T> {
    pub fn new(name: &'static str) -> TypeDescriptor<T> {
        TypeDescriptor {
            name,
            attributes: TypeAttributes::default(),
            members: Vec::new(),
            constructors: Vec::new(),
            default_factory: None,
            hooks: Hooks::default(),
        }
    }

    pub fn member(&self, name: &str) -> Option<&MemberDescriptor<T>> {
        self.members.iter().find(|member| member.info.name == name)
    }
}
