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

use crate::error::Error;
use crate::mapping::descriptor::{ConverterFn, DefaultValueFn, MemberInfo};
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::type_resolver::TypeResolver;
use crate::serializer::{Converter, JsonType};
use crate::types::{MemberKind, RequirementPolicy};
use crate::util::NamingPolicy;
use std::any::{Any, TypeId};
use std::sync::Arc;

type Setter<T, M> = Arc<dyn Fn(&mut T, M) + Send + Sync>;
type ShouldSerialize<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;
type DefaultValue<M> = Arc<dyn Fn() -> Option<M> + Send + Sync>;

enum Getter<T, M> {
    Field(fn(&T) -> &M),
    Computed(Arc<dyn Fn(&T) -> M + Send + Sync>),
}

impl<T, M> Clone for Getter<T, M> {
    fn clone(&self) -> Self {
        match self {
            Getter::Field(get) => Getter::Field(*get),
            Getter::Computed(get) => Getter::Computed(get.clone()),
        }
    }
}

impl<T, M> Getter<T, M> {
    #[inline(always)]
    fn with<R>(&self, source: &T, f: impl FnOnce(&M) -> R) -> R {
        match self {
            Getter::Field(get) => f(get(source)),
            Getter::Computed(get) => {
                let value = get(source);
                f(&value)
            }
        }
    }
}

/// Type-erased configuration surface of a member mapping, used by
/// conventions and by name-based programmatic mapping.
pub trait MemberMappingConfig {
    fn info(&self) -> &MemberInfo;

    /// The wire name; `None` until set explicitly or resolved at
    /// initialization.
    fn name(&self) -> Option<&str>;

    fn set_name(&mut self, name: &str);

    fn requirement(&self) -> RequirementPolicy;

    fn set_requirement(&mut self, policy: RequirementPolicy);

    fn set_ignore_if_default(&mut self, ignore: bool);

    fn set_default_value_any(&mut self, default: DefaultValueFn);

    fn set_equality_any(&mut self, equality: Arc<dyn Any + Send + Sync>);

    fn set_converter_any(&mut self, converter: ConverterFn);

    fn set_read_only(&mut self, read_only: bool);

    fn set_force_deserialize(&mut self, force: bool);
}

pub trait MemberMappingDyn<T>: MemberMappingConfig + Send + Sync {
    fn as_config(&mut self) -> &mut dyn MemberMappingConfig;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn set_should_serialize(&mut self, predicate: ShouldSerialize<T>);

    /// Resolves the wire name and checks every erased attribute against the
    /// member type.
    fn initialize(&mut self, naming_policy: Option<&NamingPolicy>) -> Result<(), Error>;

    fn create_converter(
        &self,
        resolver: &TypeResolver,
    ) -> Result<Box<dyn MemberConverter<T>>, Error>;
}

/// Mapping of one member of `T` whose value type is `M`.
pub struct MemberMapping<T, M> {
    info: MemberInfo,
    getter: Getter<T, M>,
    field: Option<fn(&mut T) -> &mut M>,
    setter: Option<Setter<T, M>>,
    name: Option<String>,
    converter: Option<Arc<dyn Converter<M>>>,
    converter_source: Option<ConverterFn>,
    default_value: Option<DefaultValue<M>>,
    default_source: Option<DefaultValueFn>,
    equality: Option<fn(&M, &M) -> bool>,
    equality_source: Option<Arc<dyn Any + Send + Sync>>,
    ignore_if_default: bool,
    should_serialize: Option<ShouldSerialize<T>>,
    requirement: RequirementPolicy,
    read_only: bool,
    force_deserialize: bool,
}

impl<T: 'static, M: JsonType> MemberMapping<T, M> {
    fn with_getter(info: MemberInfo, getter: Getter<T, M>) -> MemberMapping<T, M> {
        MemberMapping {
            info,
            getter,
            field: None,
            setter: None,
            name: None,
            converter: None,
            converter_source: None,
            default_value: None,
            default_source: None,
            equality: None,
            equality_source: None,
            ignore_if_default: false,
            should_serialize: None,
            requirement: RequirementPolicy::Never,
            read_only: false,
            force_deserialize: false,
        }
    }

    pub fn field(
        info: MemberInfo,
        get: fn(&T) -> &M,
        get_mut: fn(&mut T) -> &mut M,
    ) -> MemberMapping<T, M> {
        let mut mapping = MemberMapping::with_getter(info, Getter::Field(get));
        mapping.field = Some(get_mut);
        mapping.setter = Some(Arc::new(move |target: &mut T, value: M| {
            *get_mut(target) = value
        }));
        mapping
    }

    pub fn property(
        info: MemberInfo,
        get: fn(&T) -> M,
        set: Option<fn(&mut T, M)>,
    ) -> MemberMapping<T, M> {
        let mut mapping = MemberMapping::with_getter(info, Getter::Computed(Arc::new(get)));
        if let Some(set) = set {
            mapping.setter = Some(Arc::new(set));
        }
        mapping
    }

    /// A read-only member computed from the owner, for programmatic mappings.
    pub fn computed(
        name: &'static str,
        get: impl Fn(&T) -> M + Send + Sync + 'static,
    ) -> MemberMapping<T, M> {
        MemberMapping::with_getter(
            MemberInfo::new::<M>(name, MemberKind::Property),
            Getter::Computed(Arc::new(get)),
        )
    }

    pub fn set_setter(&mut self, set: impl Fn(&mut T, M) + Send + Sync + 'static) -> &mut Self {
        self.setter = Some(Arc::new(set));
        self
    }

    pub fn set_converter(&mut self, converter: Arc<dyn Converter<M>>) -> &mut Self {
        self.converter = Some(converter);
        self.converter_source = None;
        self
    }

    pub fn set_default_value(&mut self, value: M) -> &mut Self
    where
        M: Clone + PartialEq + Send + Sync,
    {
        self.default_value = Some(Arc::new(move || Some(value.clone())));
        self.default_source = None;
        self.equality = Some(<M as PartialEq>::eq);
        self
    }

    pub fn set_should_serialize_when(
        &mut self,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> &mut Self {
        self.should_serialize = Some(Arc::new(predicate));
        self
    }
}

impl<T: 'static, M: JsonType> MemberMappingConfig for MemberMapping<T, M> {
    fn info(&self) -> &MemberInfo {
        &self.info
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn set_name(&mut self, name: &str) {
        self.name = Some(name.to_string());
    }

    fn requirement(&self) -> RequirementPolicy {
        self.requirement
    }

    fn set_requirement(&mut self, policy: RequirementPolicy) {
        self.requirement = policy;
    }

    fn set_ignore_if_default(&mut self, ignore: bool) {
        self.ignore_if_default = ignore;
    }

    fn set_default_value_any(&mut self, default: DefaultValueFn) {
        self.default_source = Some(default);
    }

    fn set_equality_any(&mut self, equality: Arc<dyn Any + Send + Sync>) {
        self.equality_source = Some(equality);
    }

    fn set_converter_any(&mut self, converter: ConverterFn) {
        self.converter_source = Some(converter);
    }

    fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    fn set_force_deserialize(&mut self, force: bool) {
        self.force_deserialize = force;
    }
}

impl<T: 'static, M: JsonType> MemberMappingDyn<T> for MemberMapping<T, M> {
    fn as_config(&mut self) -> &mut dyn MemberMappingConfig {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn set_should_serialize(&mut self, predicate: ShouldSerialize<T>) {
        self.should_serialize = Some(predicate);
    }

    fn initialize(&mut self, naming_policy: Option<&NamingPolicy>) -> Result<(), Error> {
        let member = self.info.name;
        if self.name.is_none() {
            self.name = Some(match naming_policy {
                Some(policy) => policy.convert(member),
                None => member.to_string(),
            });
        }
        if let Some(source) = self.converter_source.take() {
            let converter = source()
                .downcast::<Arc<dyn Converter<M>>>()
                .map_err(|_| {
                    Error::config(format!(
                        "converter of member {member} does not convert {}",
                        std::any::type_name::<M>()
                    ))
                })?;
            self.converter = Some(*converter);
        }
        if let Some(source) = self.default_source.take() {
            if !(*source()).is::<M>() {
                return Err(Error::config(format!(
                    "default value of member {member} is not a {}",
                    std::any::type_name::<M>()
                )));
            }
            self.default_value = Some(Arc::new(move || source().downcast::<M>().ok().map(|v| *v)));
        }
        if let Some(source) = self.equality_source.take() {
            let equality = source
                .downcast_ref::<fn(&M, &M) -> bool>()
                .copied()
                .ok_or_else(|| {
                    Error::config(format!(
                        "equality of member {member} does not compare {}",
                        std::any::type_name::<M>()
                    ))
                })?;
            self.equality = Some(equality);
        }
        if self.ignore_if_default && self.equality.is_none() {
            return Err(Error::config(format!(
                "member {member} skips default values but {} is not comparable",
                std::any::type_name::<M>()
            )));
        }
        Ok(())
    }

    fn create_converter(
        &self,
        resolver: &TypeResolver,
    ) -> Result<Box<dyn MemberConverter<T>>, Error> {
        let config = resolver.config();
        let converter = match &self.converter {
            Some(converter) => converter.clone(),
            None => resolver.get_converter::<M>()?,
        };
        let assign = match (&self.setter, self.field) {
            (Some(setter), _) if !self.read_only || self.force_deserialize => {
                Assign::Setter(setter.clone())
            }
            (_, Some(field)) if config.is_read_only_read() => Assign::Populate(field),
            _ => Assign::Skip,
        };
        Ok(Box::new(TypedMemberConverter {
            name: self.name.clone().unwrap_or_else(|| self.info.name.to_string()),
            type_id: TypeId::of::<M>(),
            requirement: self.requirement,
            getter: self.getter.clone(),
            assign,
            converter,
            default_value: self.default_value.clone(),
            skip_default: if self.ignore_if_default {
                self.equality
            } else {
                None
            },
            should_serialize: self.should_serialize.clone(),
            ignore_null: config.is_ignore_null_values(),
        }))
    }
}

/// Runtime unit reading and writing one member of `T`.
pub trait MemberConverter<T>: Send + Sync {
    /// Wire name.
    fn name(&self) -> &str;

    fn member_type_id(&self) -> TypeId;

    fn requirement(&self) -> RequirementPolicy;

    fn can_deserialize(&self) -> bool;

    /// Reads the member value at the reader position into `target`.
    fn read(&self, target: &mut T, context: &mut ReadContext) -> Result<(), Error>;

    /// Reads the member value without a target, for deferred assignment.
    fn read_value(&self, context: &mut ReadContext) -> Result<Box<dyn Any>, Error>;

    fn assign(&self, target: &mut T, value: Box<dyn Any>) -> Result<(), Error>;

    /// The explicit default value of the member, if one is declared.
    fn default_value(&self) -> Option<Box<dyn Any>>;

    /// Writes name and value, unless the member is skipped for this value.
    fn write(&self, source: &T, context: &mut WriteContext) -> Result<(), Error>;
}

enum Assign<T, M> {
    Setter(Setter<T, M>),
    /// Read-only member filled in place.
    Populate(fn(&mut T) -> &mut M),
    Skip,
}

struct TypedMemberConverter<T, M> {
    name: String,
    type_id: TypeId,
    requirement: RequirementPolicy,
    getter: Getter<T, M>,
    assign: Assign<T, M>,
    converter: Arc<dyn Converter<M>>,
    default_value: Option<DefaultValue<M>>,
    skip_default: Option<fn(&M, &M) -> bool>,
    should_serialize: Option<ShouldSerialize<T>>,
    ignore_null: bool,
}

impl<T: 'static, M: JsonType> MemberConverter<T> for TypedMemberConverter<T, M> {
    #[inline(always)]
    fn name(&self) -> &str {
        &self.name
    }

    fn member_type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline(always)]
    fn requirement(&self) -> RequirementPolicy {
        self.requirement
    }

    fn can_deserialize(&self) -> bool {
        !matches!(self.assign, Assign::Skip)
    }

    fn read(&self, target: &mut T, context: &mut ReadContext) -> Result<(), Error> {
        match &self.assign {
            Assign::Setter(setter) => {
                let value = self.converter.read(context)?;
                setter(target, value);
                Ok(())
            }
            Assign::Populate(field) => self.converter.populate(field(target), context),
            Assign::Skip => context.reader.skip_value(),
        }
    }

    fn read_value(&self, context: &mut ReadContext) -> Result<Box<dyn Any>, Error> {
        Ok(Box::new(self.converter.read(context)?))
    }

    fn assign(&self, target: &mut T, value: Box<dyn Any>) -> Result<(), Error> {
        let value = value.downcast::<M>().map_err(|_| {
            Error::type_error(format!(
                "value assigned to member {} is not a {}",
                self.name,
                std::any::type_name::<M>()
            ))
        })?;
        match &self.assign {
            Assign::Setter(setter) => setter(target, *value),
            Assign::Populate(field) => *field(target) = *value,
            Assign::Skip => {}
        }
        Ok(())
    }

    fn default_value(&self) -> Option<Box<dyn Any>> {
        let value = self.default_value.as_ref().and_then(|default| default())?;
        Some(Box::new(value))
    }

    fn write(&self, source: &T, context: &mut WriteContext) -> Result<(), Error> {
        if let Some(predicate) = &self.should_serialize {
            if !predicate(source) {
                return Ok(());
            }
        }
        self.getter.with(source, |value| {
            if self.ignore_null && self.converter.is_null(value) {
                return Ok(());
            }
            if let Some(eq) = self.skip_default {
                let default = match &self.default_value {
                    Some(default) => default(),
                    None => M::json_default(),
                };
                if default.is_some_and(|default| eq(value, &default)) {
                    return Ok(());
                }
            }
            context.writer.write_property_name(&self.name);
            self.converter.write(value, context)
        })
    }
}
