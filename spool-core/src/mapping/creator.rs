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

//! Construction through a creator function instead of a default factory.
//!
//! A [`CreatorMapping`] lists typed parameters and a function building the
//! object from them. While reading, parameter values are parsed as soon as
//! their property is met and the object is built once the closing brace is
//! reached; members that are not parameters are buffered and assigned
//! afterwards.

use crate::error::Error;
use crate::resolver::context::ReadContext;
use crate::resolver::type_resolver::TypeResolver;
use crate::serializer::{Converter, JsonType};
use crate::util::NamingPolicy;
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;

/// Reads a value of a fixed type and boxes it.
pub(crate) trait AnyReader: Send + Sync {
    fn read_any(&self, context: &mut ReadContext) -> Result<Box<dyn Any>, Error>;
}

struct TypedReader<P>(Arc<dyn Converter<P>>);

impl<P: 'static> AnyReader for TypedReader<P> {
    fn read_any(&self, context: &mut ReadContext) -> Result<Box<dyn Any>, Error> {
        Ok(Box::new(self.0.read(context)?))
    }
}

type ReaderFactory = Arc<dyn Fn(&TypeResolver) -> Result<Arc<dyn AnyReader>, Error> + Send + Sync>;
type TypeDefault = Arc<dyn Fn() -> Option<Box<dyn Any>> + Send + Sync>;
type CreateFn<T> = Arc<dyn Fn(&mut CreatorArgs) -> Result<T, Error> + Send + Sync>;

#[derive(Clone)]
pub struct CreatorParameter {
    name: Cow<'static, str>,
    type_id: TypeId,
    type_name: &'static str,
    reader: ReaderFactory,
    type_default: TypeDefault,
}

impl CreatorParameter {
    pub fn new<P: JsonType>(name: impl Into<Cow<'static, str>>) -> CreatorParameter {
        CreatorParameter {
            name: name.into(),
            type_id: TypeId::of::<P>(),
            type_name: std::any::type_name::<P>(),
            reader: Arc::new(|resolver: &TypeResolver| {
                let converter = resolver.get_converter::<P>()?;
                Ok(Arc::new(TypedReader(converter)) as Arc<dyn AnyReader>)
            }),
            type_default: Arc::new(|| P::json_default().map(|value| Box::new(value) as Box<dyn Any>)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn create_reader(&self, resolver: &TypeResolver) -> Result<Arc<dyn AnyReader>, Error> {
        (self.reader)(resolver)
    }

    pub(crate) fn type_default(&self) -> Option<Box<dyn Any>> {
        (self.type_default)()
    }
}

/// Argument values collected for one creator call.
pub struct CreatorArgs {
    values: Vec<Option<Box<dyn Any>>>,
    names: Vec<String>,
}

impl CreatorArgs {
    pub(crate) fn new(values: Vec<Option<Box<dyn Any>>>, names: Vec<String>) -> CreatorArgs {
        CreatorArgs { values, names }
    }

    fn param_name(&self, index: usize) -> &str {
        self.names.get(index).map_or("?", String::as_str)
    }

    /// Moves the argument at `index` out as a `P`.
    pub fn take<P: 'static>(&mut self, index: usize) -> Result<P, Error> {
        let value = self
            .values
            .get_mut(index)
            .and_then(Option::take)
            .ok_or_else(|| {
                Error::missing_member(format!(
                    "no value for constructor parameter {}",
                    self.param_name(index)
                ))
            })?;
        match value.downcast::<P>() {
            Ok(value) => Ok(*value),
            Err(_) => Err(Error::type_error(format!(
                "constructor parameter {} is not a {}",
                self.param_name(index),
                std::any::type_name::<P>()
            ))),
        }
    }
}

/// Member of the owning mapping as seen by parameter binding.
pub(crate) struct MemberView<'a> {
    pub declared: &'a str,
    pub wire: &'a str,
    pub type_id: TypeId,
    pub type_name: &'static str,
}

#[derive(Clone, Debug)]
pub(crate) struct ParameterBinding {
    pub wire_name: String,
    /// Index of the member mapping the parameter initializes.
    pub member: Option<usize>,
}

pub struct CreatorMapping<T> {
    parameters: Vec<CreatorParameter>,
    member_names: Option<Vec<String>>,
    create: CreateFn<T>,
    bindings: Vec<ParameterBinding>,
}

impl<T> Clone for CreatorMapping<T> {
    fn clone(&self) -> Self {
        CreatorMapping {
            parameters: self.parameters.clone(),
            member_names: self.member_names.clone(),
            create: self.create.clone(),
            bindings: self.bindings.clone(),
        }
    }
}

impl<T: 'static> CreatorMapping<T> {
    pub fn new(
        parameters: Vec<CreatorParameter>,
        create: impl Fn(&mut CreatorArgs) -> Result<T, Error> + Send + Sync + 'static,
    ) -> CreatorMapping<T> {
        CreatorMapping {
            parameters,
            member_names: None,
            create: Arc::new(create),
            bindings: Vec::new(),
        }
    }

    /// A creator from a plain function; `names` are its parameter names in
    /// order, matched against member names ignoring case.
    ///
    /// ```rust
    /// use spool_core::mapping::CreatorMapping;
    ///
    /// struct Point {
    ///     x: i32,
    ///     y: i32,
    /// }
    ///
    /// let creator = CreatorMapping::from_fn(|x: i32, y: i32| Point { x, y }, &["x", "y"]);
    /// assert_eq!(creator.parameters().len(), 2);
    /// ```
    pub fn from_fn<Args, F: CreatorFn<T, Args>>(f: F, names: &[&'static str]) -> CreatorMapping<T> {
        f.into_creator(names)
    }

    /// Binds parameters to members by wire name instead of by inference.
    pub fn set_member_names<S: Into<String>>(
        &mut self,
        names: impl IntoIterator<Item = S>,
    ) -> &mut Self {
        self.member_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn parameters(&self) -> &[CreatorParameter] {
        &self.parameters
    }

    pub(crate) fn bindings(&self) -> &[ParameterBinding] {
        &self.bindings
    }

    pub(crate) fn create(&self, args: &mut CreatorArgs) -> Result<T, Error> {
        (self.create)(args)
    }

    pub(crate) fn initialize(
        &mut self,
        members: &[MemberView],
        naming_policy: Option<&NamingPolicy>,
    ) -> Result<(), Error> {
        if let Some(names) = &self.member_names {
            if names.len() != self.parameters.len() {
                return Err(Error::config(format!(
                    "constructor names {} members but takes {} parameters",
                    names.len(),
                    self.parameters.len()
                )));
            }
        }
        let mut bindings = Vec::with_capacity(self.parameters.len());
        let mut seen = HashSet::new();
        for (index, parameter) in self.parameters.iter().enumerate() {
            let (wire_name, member) = match &self.member_names {
                Some(names) => {
                    let wire = names[index].clone();
                    let member = members.iter().position(|m| m.wire == wire);
                    (wire, member)
                }
                None => {
                    if parameter.name.is_empty() {
                        return Err(Error::config(format!(
                            "constructor parameter {index} has no name"
                        )));
                    }
                    match members
                        .iter()
                        .position(|m| m.declared.eq_ignore_ascii_case(&parameter.name))
                    {
                        Some(member) => (members[member].wire.to_string(), Some(member)),
                        None => (
                            naming_policy.map_or_else(
                                || parameter.name.to_string(),
                                |policy| policy.convert(&parameter.name),
                            ),
                            None,
                        ),
                    }
                }
            };
            if let Some(member) = member {
                let view = &members[member];
                if view.type_id != parameter.type_id {
                    return Err(Error::config(format!(
                        "constructor parameter {} is a {} but member {} is a {}",
                        parameter.name, parameter.type_name, view.declared, view.type_name
                    )));
                }
            }
            if !seen.insert(wire_name.clone()) {
                return Err(Error::config(format!(
                    "constructor parameters bind {wire_name} more than once"
                )));
            }
            bindings.push(ParameterBinding { wire_name, member });
        }
        self.bindings = bindings;
        Ok(())
    }
}

/// Functions usable as creators, implemented for closures and fn items
/// of up to eight [`JsonType`] parameters.
pub trait CreatorFn<T, Args>: Send + Sync + 'static {
    fn into_creator(self, names: &[&'static str]) -> CreatorMapping<T>;
}

macro_rules! impl_creator_fn {
    ($($param:ident => $index:tt),*) => {
        impl<T: 'static, F, $($param: JsonType),*> CreatorFn<T, ($($param,)*)> for F
        where
            F: Fn($($param),*) -> T + Send + Sync + 'static,
        {
            #[allow(unused_variables, unused_mut)]
            fn into_creator(self, names: &[&'static str]) -> CreatorMapping<T> {
                let parameters = vec![
                    $(CreatorParameter::new::<$param>(names.get($index).copied().unwrap_or_default())),*
                ];
                CreatorMapping::new(parameters, move |args: &mut CreatorArgs| {
                    Ok(self($(args.take::<$param>($index)?),*))
                })
            }
        }
    };
}

impl_creator_fn!();
impl_creator_fn!(A => 0);
impl_creator_fn!(A => 0, B => 1);
impl_creator_fn!(A => 0, B => 1, C => 2);
impl_creator_fn!(A => 0, B => 1, C => 2, D => 3);
impl_creator_fn!(A => 0, B => 1, C => 2, D => 3, E => 4);
impl_creator_fn!(A => 0, B => 1, C => 2, D => 3, E => 4, G => 5);
impl_creator_fn!(A => 0, B => 1, C => 2, D => 3, E => 4, G => 5, H => 6);
impl_creator_fn!(A => 0, B => 1, C => 2, D => 3, E => 4, G => 5, H => 6, I => 7);
