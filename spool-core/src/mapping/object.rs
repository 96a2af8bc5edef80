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

use crate::config::DiscriminatorPolicy;
use crate::discriminator::DiscriminatorValue;
use crate::error::Error;
use crate::mapping::convention::ObjectMappingConvention;
use crate::mapping::creator::{CreatorMapping, MemberView};
use crate::mapping::descriptor::{MemberInfo, TypeAttributes, TypeDescriptor};
use crate::mapping::extension::ExtensionDataMapping;
use crate::mapping::member::{MemberMapping, MemberMappingConfig, MemberMappingDyn};
use crate::serializer::JsonType;
use crate::util::NamingPolicy;
use std::collections::HashSet;
use std::sync::Arc;

type Factory<T> = Arc<dyn Fn() -> T + Send + Sync>;
type Hook<T> = Arc<dyn Fn(&T) + Send + Sync>;
type HookMut<T> = Arc<dyn Fn(&mut T) + Send + Sync>;

/// Type-erased view of an [`ObjectMapping`] that conventions work through.
pub trait ObjectMappingBuilder {
    fn type_name(&self) -> &'static str;

    fn attributes(&self) -> &TypeAttributes;

    /// Every member the type declares, mapped or not.
    fn member_infos(&self) -> Vec<MemberInfo>;

    /// Maps the declared member `name`, or returns its existing mapping.
    fn map_member(&mut self, name: &str) -> Result<&mut dyn MemberMappingConfig, Error>;

    fn map_extension_data(&mut self, name: &str) -> Result<(), Error>;

    fn constructor_count(&self) -> usize;

    fn preferred_constructor(&self) -> Option<usize>;

    fn map_constructor(&mut self, index: usize) -> Result<(), Error>;

    fn has_factory(&self) -> bool;

    fn set_naming_policy(&mut self, policy: Option<NamingPolicy>);

    fn set_discriminator(&mut self, value: Option<DiscriminatorValue>);

    fn set_discriminator_policy(&mut self, policy: DiscriminatorPolicy);

    /// Installs the lifecycle hooks the type declares.
    fn map_declared_hooks(&mut self);
}

/// How one type is read and written: its member mappings, creator or
/// factory, extension data member, discriminator and lifecycle hooks.
///
/// Built by the registry from the type's descriptor, either through the
/// convention selected for the type or through a registered builder, and
/// immutable once initialized.
pub struct ObjectMapping<T> {
    descriptor: TypeDescriptor<T>,
    convention: Arc<dyn ObjectMappingConvention>,
    naming_policy: Option<NamingPolicy>,
    members: Vec<Box<dyn MemberMappingDyn<T>>>,
    creator: Option<CreatorMapping<T>>,
    factory: Option<Factory<T>>,
    extension_data: Option<ExtensionDataMapping<T>>,
    discriminator: Option<DiscriminatorValue>,
    discriminator_policy: DiscriminatorPolicy,
    on_serializing: Option<Hook<T>>,
    on_serialized: Option<Hook<T>>,
    on_deserializing: Option<HookMut<T>>,
    on_deserialized: Option<HookMut<T>>,
}

impl<T: 'static> ObjectMapping<T> {
    pub fn new(
        descriptor: TypeDescriptor<T>,
        naming_policy: Option<NamingPolicy>,
        convention: Arc<dyn ObjectMappingConvention>,
    ) -> ObjectMapping<T> {
        let factory = descriptor
            .default_factory
            .map(|factory| Arc::new(factory) as Factory<T>);
        ObjectMapping {
            descriptor,
            convention,
            naming_policy,
            members: Vec::new(),
            creator: None,
            factory,
            extension_data: None,
            discriminator: None,
            discriminator_policy: DiscriminatorPolicy::Default,
            on_serializing: None,
            on_serialized: None,
            on_deserializing: None,
            on_deserialized: None,
        }
    }

    /// Applies the convention selected for the type.
    pub fn auto_map(&mut self) -> Result<&mut Self, Error> {
        let convention = self.convention.clone();
        convention.apply(self)?;
        Ok(self)
    }

    pub fn descriptor(&self) -> &TypeDescriptor<T> {
        &self.descriptor
    }

    pub fn clear_member_mappings(&mut self) -> &mut Self {
        self.members.clear();
        self
    }

    pub fn unmap_member(&mut self, name: &str) -> &mut Self {
        self.members.retain(|member| member.info().name != name);
        self
    }

    pub fn add_member_mapping(&mut self, member: Box<dyn MemberMappingDyn<T>>) -> &mut Self {
        self.members.push(member);
        self
    }

    /// Maps the declared member `name` and returns its typed mapping.
    pub fn member_mut<M: JsonType>(&mut self, name: &str) -> Result<&mut MemberMapping<T, M>, Error> {
        let type_name = self.descriptor.name;
        ObjectMappingBuilder::map_member(self, name)?;
        self.members
            .iter_mut()
            .find(|member| member.info().name == name)
            .and_then(|member| member.as_any_mut().downcast_mut::<MemberMapping<T, M>>())
            .ok_or_else(|| {
                Error::config(format!(
                    "member {name} of {type_name} is not a {}",
                    std::any::type_name::<M>()
                ))
            })
    }

    /// Adds a read-only member computed from the whole value.
    pub fn map_computed<M: JsonType>(
        &mut self,
        name: &'static str,
        get: impl Fn(&T) -> M + Send + Sync + 'static,
    ) -> Result<&mut MemberMapping<T, M>, Error> {
        self.members.push(Box::new(MemberMapping::computed(name, get)));
        let type_name = self.descriptor.name;
        self.members
            .last_mut()
            .and_then(|member| member.as_any_mut().downcast_mut::<MemberMapping<T, M>>())
            .ok_or_else(|| Error::unknown(format!("computed member {name} of {type_name} was not mapped")))
    }

    pub fn map_creator(&mut self, creator: CreatorMapping<T>) -> &mut Self {
        self.creator = Some(creator);
        self
    }

    pub fn set_factory(&mut self, factory: impl Fn() -> T + Send + Sync + 'static) -> &mut Self {
        self.factory = Some(Arc::new(factory));
        self
    }

    pub fn set_extension_data(&mut self, extension: ExtensionDataMapping<T>) -> &mut Self {
        self.extension_data = Some(extension);
        self
    }

    pub fn set_on_serializing(&mut self, hook: impl Fn(&T) + Send + Sync + 'static) -> &mut Self {
        self.on_serializing = Some(Arc::new(hook));
        self
    }

    pub fn set_on_serialized(&mut self, hook: impl Fn(&T) + Send + Sync + 'static) -> &mut Self {
        self.on_serialized = Some(Arc::new(hook));
        self
    }

    pub fn set_on_deserializing(
        &mut self,
        hook: impl Fn(&mut T) + Send + Sync + 'static,
    ) -> &mut Self {
        self.on_deserializing = Some(Arc::new(hook));
        self
    }

    pub fn set_on_deserialized(
        &mut self,
        hook: impl Fn(&mut T) + Send + Sync + 'static,
    ) -> &mut Self {
        self.on_deserialized = Some(Arc::new(hook));
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.descriptor.name
    }

    pub fn naming_policy(&self) -> Option<&NamingPolicy> {
        self.naming_policy.as_ref()
    }

    pub fn members(&self) -> &[Box<dyn MemberMappingDyn<T>>] {
        &self.members
    }

    pub fn creator(&self) -> Option<&CreatorMapping<T>> {
        self.creator.as_ref()
    }

    pub fn extension_data(&self) -> Option<&ExtensionDataMapping<T>> {
        self.extension_data.as_ref()
    }

    pub fn discriminator(&self) -> Option<&DiscriminatorValue> {
        self.discriminator.as_ref()
    }

    pub fn discriminator_policy(&self) -> DiscriminatorPolicy {
        self.discriminator_policy
    }

    pub fn create_instance(&self) -> Option<T> {
        self.factory.as_ref().map(|factory| factory())
    }

    pub fn on_serializing(&self, value: &T) {
        if let Some(hook) = &self.on_serializing {
            hook(value)
        }
    }

    pub fn on_serialized(&self, value: &T) {
        if let Some(hook) = &self.on_serialized {
            hook(value)
        }
    }

    pub fn on_deserializing(&self, value: &mut T) {
        if let Some(hook) = &self.on_deserializing {
            hook(value)
        }
    }

    pub fn on_deserialized(&self, value: &mut T) {
        if let Some(hook) = &self.on_deserialized {
            hook(value)
        }
    }

    /// Resolves member names, validates erased attributes against member
    /// types and binds creator parameters to members.
    pub fn initialize(&mut self) -> Result<(), Error> {
        let type_name = self.descriptor.name;
        let naming_policy = self.naming_policy;
        let mut names = HashSet::with_capacity(self.members.len());
        for member in self.members.iter_mut() {
            member
                .initialize(naming_policy.as_ref())
                .map_err(|e| e.with_member(member.info().name))?;
            let name = member.name().unwrap_or_default();
            if !names.insert(name.to_string()) {
                return Err(Error::config(format!(
                    "{type_name} maps more than one member to the name {name}"
                )));
            }
        }
        if let Some(creator) = &mut self.creator {
            let views: Vec<MemberView> = self
                .members
                .iter()
                .map(|member| MemberView {
                    declared: member.info().name,
                    wire: member.name().unwrap_or_default(),
                    type_id: member.info().type_id,
                    type_name: member.info().type_name,
                })
                .collect();
            creator.initialize(&views, naming_policy.as_ref())?;
        }
        Ok(())
    }
}

impl<T: 'static> ObjectMappingBuilder for ObjectMapping<T> {
    fn type_name(&self) -> &'static str {
        self.descriptor.name
    }

    fn attributes(&self) -> &TypeAttributes {
        &self.descriptor.attributes
    }

    fn member_infos(&self) -> Vec<MemberInfo> {
        self.descriptor
            .members
            .iter()
            .map(|member| member.info.clone())
            .collect()
    }

    fn map_member(&mut self, name: &str) -> Result<&mut dyn MemberMappingConfig, Error> {
        if let Some(index) = self.members.iter().position(|m| m.info().name == name) {
            return Ok(self.members[index].as_config());
        }
        let descriptor = self.descriptor.member(name).ok_or_else(|| {
            Error::config(format!(
                "{} declares no member named {name}",
                self.descriptor.name
            ))
        })?;
        let member = descriptor.bind().ok_or_else(|| {
            Error::config(format!(
                "member {name} of {} holds extension data",
                self.descriptor.name
            ))
        })?;
        self.members.push(member);
        let index = self.members.len() - 1;
        Ok(self.members[index].as_config())
    }

    fn map_extension_data(&mut self, name: &str) -> Result<(), Error> {
        let extension = self
            .descriptor
            .member(name)
            .and_then(|member| member.bind_extension())
            .ok_or_else(|| {
                Error::config(format!(
                    "member {name} of {} cannot hold extension data",
                    self.descriptor.name
                ))
            })?;
        self.extension_data = Some(extension);
        Ok(())
    }

    fn constructor_count(&self) -> usize {
        self.descriptor.constructors.len()
    }

    fn preferred_constructor(&self) -> Option<usize> {
        self.descriptor
            .constructors
            .iter()
            .position(|constructor| constructor.preferred)
    }

    fn map_constructor(&mut self, index: usize) -> Result<(), Error> {
        let constructor = self.descriptor.constructors.get(index).ok_or_else(|| {
            Error::config(format!(
                "{} has no constructor {index}",
                self.descriptor.name
            ))
        })?;
        self.creator = Some(constructor.creator.clone());
        Ok(())
    }

    fn has_factory(&self) -> bool {
        self.factory.is_some()
    }

    fn set_naming_policy(&mut self, policy: Option<NamingPolicy>) {
        self.naming_policy = policy;
    }

    fn set_discriminator(&mut self, value: Option<DiscriminatorValue>) {
        self.discriminator = value;
    }

    fn set_discriminator_policy(&mut self, policy: DiscriminatorPolicy) {
        self.discriminator_policy = policy;
    }

    fn map_declared_hooks(&mut self) {
        let hooks = &self.descriptor.hooks;
        let on_serializing = hooks.on_serializing.map(|hook| Arc::new(hook) as Hook<T>);
        let on_serialized = hooks.on_serialized.map(|hook| Arc::new(hook) as Hook<T>);
        let (begin_init, end_init) = match hooks.support_initialize {
            Some((begin, end)) => (Some(begin), Some(end)),
            None => (None, None),
        };
        let on_deserializing = hooks
            .on_deserializing
            .or(begin_init)
            .map(|hook| Arc::new(hook) as HookMut<T>);
        let on_deserialized = hooks
            .on_deserialized
            .or(end_init)
            .map(|hook| Arc::new(hook) as HookMut<T>);
        self.on_serializing = on_serializing;
        self.on_serialized = on_serialized;
        self.on_deserializing = on_deserializing;
        self.on_deserialized = on_deserialized;
    }
}
