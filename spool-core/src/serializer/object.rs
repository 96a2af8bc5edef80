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

use crate::buffer::Token;
use crate::config::DiscriminatorPolicy;
use crate::discriminator::{DiscriminatorConvention, DiscriminatorTypeInfo};
use crate::error::Error;
use crate::mapping::creator::{AnyReader, CreatorArgs};
use crate::mapping::{CreatorMapping, JsonObject, MemberConverter, ObjectMapping};
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::type_resolver::TypeResolver;
use crate::serializer::union::{LeafType, PolymorphicConverter};
use crate::serializer::{with_depth, with_write_depth, Converter};
use crate::types::{Shape, ID_PROPERTY, REF_PROPERTY};
use crate::util::ByteTrie;
use serde_json::Value;
use std::any::{Any, TypeId};
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

struct DiscriminatorMember {
    convention: Arc<dyn DiscriminatorConvention>,
    name: Vec<u8>,
    policy: DiscriminatorPolicy,
}

struct CompiledParam {
    name: String,
    reader: Arc<dyn AnyReader>,
    member: Option<usize>,
}

struct CompiledCreator<T> {
    creator: CreatorMapping<T>,
    params: Vec<CompiledParam>,
    names: NameIndex,
}

/// Property name lookup: exact match first, ASCII case-folded match second
/// when case-insensitive matching is on.
struct NameIndex {
    exact: ByteTrie<usize>,
    folded: Option<ByteTrie<usize>>,
}

impl NameIndex {
    fn new(case_insensitive: bool) -> NameIndex {
        NameIndex {
            exact: ByteTrie::new(),
            folded: case_insensitive.then(ByteTrie::new),
        }
    }

    fn insert(&mut self, name: &str, index: usize, type_name: &str) -> Result<(), Error> {
        if self.exact.insert(name.as_bytes(), index).is_err() {
            return Err(Error::config(format!(
                "{type_name} maps more than one member to the name {name}"
            )));
        }
        if let Some(folded) = &mut self.folded {
            if folded
                .insert(&name.as_bytes().to_ascii_lowercase(), index)
                .is_err()
            {
                return Err(Error::config(format!(
                    "{type_name} has members named {name} that differ only in case"
                )));
            }
        }
        Ok(())
    }

    #[inline(always)]
    fn find(&self, name: &[u8]) -> Option<usize> {
        if let Some(&index) = self.exact.get(name) {
            return Some(index);
        }
        let folded = self.folded.as_ref()?;
        folded.get(&name.to_ascii_lowercase()).copied()
    }
}

struct CompiledObject<T> {
    mapping: Arc<ObjectMapping<T>>,
    type_name: &'static str,
    members: Vec<Box<dyn MemberConverter<T>>>,
    names: NameIndex,
    required: Vec<usize>,
    creator: Option<CompiledCreator<T>>,
    discriminator: Option<DiscriminatorMember>,
    preserve: bool,
    error_on_missing: bool,
}

impl<T: 'static> CompiledObject<T> {
    #[inline(always)]
    fn is_discriminator(&self, name: &[u8]) -> bool {
        self.discriminator
            .as_ref()
            .is_some_and(|discriminator| discriminator.name == name)
    }

    fn check_null(&self, index: usize, context: &mut ReadContext) -> Result<(), Error> {
        let member = &self.members[index];
        if member.requirement().disallows_null() && context.reader.peek()? == Token::Null {
            return Err(Error::missing_member(format!(
                "Required property '{}' expects a non-null value",
                member.name()
            ))
            .with_member(member.name()));
        }
        Ok(())
    }

    fn check_required(&self, seen: &[bool]) -> Result<(), Error> {
        for &index in &self.required {
            if !seen[index] {
                return Err(Error::missing_member(format!(
                    "Required property '{}' not found in JSON for {}",
                    self.members[index].name(),
                    self.type_name
                )));
            }
        }
        Ok(())
    }

    /// Handles a property matching no member. Returns the entry for the
    /// extension data member when the type has one.
    fn read_unmatched(
        &self,
        name: &[u8],
        context: &mut ReadContext,
    ) -> Result<Option<(String, Value)>, Error> {
        if self.is_discriminator(name) || (self.preserve && name == ID_PROPERTY) {
            context.reader.skip_value()?;
            return Ok(None);
        }
        if self.preserve && name == REF_PROPERTY {
            return Err(Error::invalid_ref(format!(
                "Cannot resolve a reference into {}; only shared pointers keep identity",
                self.type_name
            )));
        }
        if self.mapping.extension_data().is_some() {
            let value = context.read_untyped()?;
            return Ok(Some((String::from_utf8_lossy(name).into_owned(), value)));
        }
        if self.error_on_missing {
            return Err(Error::not_allowed(format!(
                "Could not find member '{}' on object of type {}",
                String::from_utf8_lossy(name),
                self.type_name
            )));
        }
        context.reader.skip_value()?;
        Ok(None)
    }
}

/// Converter of a mapped type, reading and writing it member by member.
///
/// Compiled on first use: the mapping is looked up, every member converter
/// is resolved and the name index is built. Compiling lazily lets a type
/// reach itself through its members.
pub struct ObjectConverter<T> {
    compiled: OnceLock<CompiledObject<T>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: JsonObject> Default for ObjectConverter<T> {
    fn default() -> Self {
        ObjectConverter::new()
    }
}

impl<T: JsonObject> ObjectConverter<T> {
    pub fn new() -> ObjectConverter<T> {
        ObjectConverter {
            compiled: OnceLock::new(),
            _marker: PhantomData,
        }
    }

    fn compiled(&self, resolver: &TypeResolver) -> Result<&CompiledObject<T>, Error> {
        if let Some(compiled) = self.compiled.get() {
            return Ok(compiled);
        }
        let compiled = Self::compile(resolver)?;
        let _ = self.compiled.set(compiled);
        self.compiled
            .get()
            .ok_or_else(|| Error::unknown("object converter was not compiled"))
    }

    /// Builds the mapping and member converters now instead of on first use.
    pub fn ensure_compiled(&self, resolver: &TypeResolver) -> Result<(), Error> {
        self.compiled(resolver).map(|_| ())
    }

    fn compile(resolver: &TypeResolver) -> Result<CompiledObject<T>, Error> {
        let config = resolver.config();
        let mapping = resolver.mappings().lookup::<T>(config)?;
        let type_name = mapping.type_name();
        let mut names = NameIndex::new(config.is_case_insensitive());
        let mut members = Vec::with_capacity(mapping.members().len());
        let mut required = Vec::new();
        for (index, member) in mapping.members().iter().enumerate() {
            let converter = member
                .create_converter(resolver)
                .map_err(|e| e.with_member(member.info().name))?;
            names.insert(converter.name(), index, type_name)?;
            if converter.requirement().requires_presence() {
                required.push(index);
            }
            members.push(converter);
        }

        let creator = match mapping.creator() {
            Some(creator) => {
                let mut params = Vec::with_capacity(creator.parameters().len());
                let mut param_names = NameIndex::new(config.is_case_insensitive());
                for (index, (parameter, binding)) in creator
                    .parameters()
                    .iter()
                    .zip(creator.bindings())
                    .enumerate()
                {
                    param_names.insert(&binding.wire_name, index, type_name)?;
                    params.push(CompiledParam {
                        name: binding.wire_name.clone(),
                        reader: parameter
                            .create_reader(resolver)
                            .map_err(|e| e.with_member(&binding.wire_name))?,
                        member: binding.member,
                    });
                }
                Some(CompiledCreator {
                    creator: creator.clone(),
                    params,
                    names: param_names,
                })
            }
            None => None,
        };

        let info = DiscriminatorTypeInfo {
            type_id: TypeId::of::<T>(),
            type_name,
            discriminator: mapping.discriminator().cloned(),
        };
        let policy = match mapping.discriminator_policy() {
            DiscriminatorPolicy::Default => config.discriminator_policy(),
            policy => policy,
        };
        let discriminator =
            resolver
                .discriminators()
                .convention_for(&info)?
                .map(|convention| DiscriminatorMember {
                    name: convention.member_name().as_bytes().to_vec(),
                    convention,
                    policy,
                });

        log::debug!("compiled object converter for {type_name}");
        Ok(CompiledObject {
            type_name,
            members,
            names,
            required,
            creator,
            discriminator,
            preserve: config.is_preserve_references(),
            error_on_missing: config.is_error_on_missing_member(),
            mapping,
        })
    }

    fn populate_compiled(
        &self,
        compiled: &CompiledObject<T>,
        instance: &mut T,
        context: &mut ReadContext,
    ) -> Result<(), Error> {
        compiled.mapping.on_deserializing(instance);
        let mut seen = vec![false; compiled.members.len()];
        while let Some(name) = context.reader.read_property_name()? {
            if let Some(index) = compiled.names.find(&name) {
                seen[index] = true;
                compiled.check_null(index, context)?;
                let member = &compiled.members[index];
                member
                    .read(instance, context)
                    .map_err(|e| e.with_member(member.name()))?;
            } else if let Some((name, value)) = compiled.read_unmatched(&name, context)? {
                if let Some(extension) = compiled.mapping.extension_data() {
                    extension.insert(instance, name, value);
                }
            }
        }
        compiled.check_required(&seen)?;
        compiled.mapping.on_deserialized(instance);
        Ok(())
    }

    fn read_with_creator(
        &self,
        compiled: &CompiledObject<T>,
        creator: &CompiledCreator<T>,
        context: &mut ReadContext,
    ) -> Result<T, Error> {
        let mut args: Vec<Option<Box<dyn Any>>> = creator.params.iter().map(|_| None).collect();
        let mut pending: Vec<(usize, Box<dyn Any>)> = Vec::new();
        let mut extension_values: Vec<(String, Value)> = Vec::new();
        let mut seen = vec![false; compiled.members.len()];
        while let Some(name) = context.reader.read_property_name()? {
            if let Some(index) = creator.names.find(&name) {
                let param = &creator.params[index];
                let value = match param.member {
                    Some(member) => {
                        seen[member] = true;
                        compiled.check_null(member, context)?;
                        compiled.members[member].read_value(context)
                    }
                    None => param.reader.read_any(context),
                }
                .map_err(|e| e.with_member(&param.name))?;
                args[index] = Some(value);
            } else if let Some(index) = compiled.names.find(&name) {
                seen[index] = true;
                compiled.check_null(index, context)?;
                let member = &compiled.members[index];
                if member.can_deserialize() {
                    let value = member
                        .read_value(context)
                        .map_err(|e| e.with_member(member.name()))?;
                    pending.push((index, value));
                } else {
                    context.reader.skip_value()?;
                }
            } else if let Some(entry) = compiled.read_unmatched(&name, context)? {
                extension_values.push(entry);
            }
        }
        compiled.check_required(&seen)?;

        for (index, parameter) in creator.creator.parameters().iter().enumerate() {
            if args[index].is_none() {
                args[index] = creator.params[index]
                    .member
                    .and_then(|member| compiled.members[member].default_value())
                    .or_else(|| parameter.type_default());
            }
        }
        let names = creator.params.iter().map(|param| param.name.clone()).collect();
        let mut instance = creator.creator.create(&mut CreatorArgs::new(args, names))?;

        compiled.mapping.on_deserializing(&mut instance);
        for (index, value) in pending {
            let member = &compiled.members[index];
            member
                .assign(&mut instance, value)
                .map_err(|e| e.with_member(member.name()))?;
        }
        if let Some(extension) = compiled.mapping.extension_data() {
            for (name, value) in extension_values {
                extension.insert(&mut instance, name, value);
            }
        }
        compiled.mapping.on_deserialized(&mut instance);
        Ok(instance)
    }

    fn read_body(&self, context: &mut ReadContext) -> Result<T, Error> {
        let compiled = self.compiled(context.type_resolver())?;
        match &compiled.creator {
            Some(creator) => self.read_with_creator(compiled, creator, context),
            None => {
                let mut instance = compiled.mapping.create_instance().ok_or_else(|| {
                    Error::not_allowed(format!(
                        "{} has neither a default factory nor a creator",
                        compiled.type_name
                    ))
                })?;
                self.populate_compiled(compiled, &mut instance, context)?;
                Ok(instance)
            }
        }
    }

    fn write_body(
        &self,
        value: &T,
        context: &mut WriteContext,
        polymorphic: bool,
    ) -> Result<(), Error> {
        let compiled = self.compiled(context.type_resolver())?;
        compiled.mapping.on_serializing(value);
        if let Some(discriminator) = &compiled.discriminator {
            let write = match discriminator.policy {
                DiscriminatorPolicy::Always => true,
                DiscriminatorPolicy::Never => false,
                DiscriminatorPolicy::Auto | DiscriminatorPolicy::Default => polymorphic,
            };
            if write {
                context
                    .writer
                    .write_property_name_bytes(&discriminator.name);
                discriminator
                    .convention
                    .write_discriminator(context.writer, TypeId::of::<T>())?;
            }
        }
        for member in &compiled.members {
            member
                .write(value, context)
                .map_err(|e| e.with_member(member.name()))?;
        }
        if let Some(extension) = compiled.mapping.extension_data() {
            let writer = &mut *context.writer;
            extension.for_each(value, &mut |name, value| {
                writer.write_property_name(name);
                writer.write_value(value);
            });
        }
        compiled.mapping.on_serialized(value);
        Ok(())
    }
}

impl<T: JsonObject> Converter<T> for ObjectConverter<T> {
    fn read(&self, context: &mut ReadContext) -> Result<T, Error> {
        let token = context.reader.peek()?;
        if token != Token::StartObject {
            return Err(Error::type_error(format!(
                "expected an object for {} but found {}",
                std::any::type_name::<T>(),
                token.name()
            )));
        }
        context.reader.read_start_object()?;
        self.read_members(context)
    }

    fn write(&self, value: &T, context: &mut WriteContext) -> Result<(), Error> {
        with_write_depth(context, |context| {
            context.writer.write_start_object();
            self.write_body(value, context, false)?;
            context.writer.write_end_object();
            Ok(())
        })
    }

    #[inline(always)]
    fn shape(&self) -> Shape {
        Shape::Object
    }

    fn create_instance(&self, context: &mut ReadContext) -> Result<Option<T>, Error> {
        let compiled = self.compiled(context.type_resolver())?;
        if compiled.creator.is_some() {
            return Ok(None);
        }
        Ok(compiled.mapping.create_instance())
    }

    fn read_members(&self, context: &mut ReadContext) -> Result<T, Error> {
        with_depth(context, |context| self.read_body(context))
    }

    fn populate_members(&self, target: &mut T, context: &mut ReadContext) -> Result<(), Error> {
        with_depth(context, |context| {
            let compiled = self.compiled(context.type_resolver())?;
            match &compiled.creator {
                Some(creator) => {
                    *target = self.read_with_creator(compiled, creator, context)?;
                    Ok(())
                }
                None => self.populate_compiled(compiled, target, context),
            }
        })
    }

    fn populate(&self, target: &mut T, context: &mut ReadContext) -> Result<(), Error> {
        context.reader.read_start_object()?;
        self.populate_members(target, context)
    }

    fn write_members(&self, value: &T, context: &mut WriteContext) -> Result<(), Error> {
        self.write_body(value, context, false)
    }
}

impl<T: JsonObject> PolymorphicConverter<T> for ObjectConverter<T> {
    fn leaf_types(&self, resolver: &TypeResolver) -> Result<Vec<LeafType>, Error> {
        let compiled = self.compiled(resolver)?;
        Ok(vec![LeafType {
            type_id: TypeId::of::<T>(),
            type_name: compiled.type_name,
            convention: compiled
                .discriminator
                .as_ref()
                .map(|discriminator| discriminator.convention.clone()),
        }])
    }

    fn read_members_as(&self, leaf: Option<TypeId>, context: &mut ReadContext) -> Result<T, Error> {
        if leaf.is_some_and(|leaf| leaf != TypeId::of::<T>()) {
            return Err(Error::unknown_discriminator(format!(
                "discriminator does not denote {}",
                std::any::type_name::<T>()
            )));
        }
        self.read_members(context)
    }

    fn write_members_polymorphic(&self, value: &T, context: &mut WriteContext) -> Result<(), Error> {
        self.write_body(value, context, true)
    }
}
