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

//! Discriminators: the member telling which concrete type an object holds.
//!
//! A [`DiscriminatorConvention`] names the discriminator member and maps
//! discriminator values to types. Types are bound to the first convention
//! that claims them, consulting the most recently registered convention
//! first, and stay bound for the lifetime of the registry.

use crate::buffer::{Reader, Token, Writer};
use crate::error::Error;
use std::any::TypeId;
use std::borrow::Cow;
use std::fmt;

mod convention;
mod registry;

pub use convention::{DefaultDiscriminatorConvention, TypeNameDiscriminatorConvention};
pub use registry::DiscriminatorConventionRegistry;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DiscriminatorValue {
    Str(Cow<'static, str>),
    Int(i64),
}

impl DiscriminatorValue {
    pub fn read(reader: &mut Reader) -> Result<DiscriminatorValue, Error> {
        match reader.peek()? {
            Token::String => Ok(DiscriminatorValue::Str(Cow::Owned(
                reader.read_string()?.into_owned(),
            ))),
            Token::Number => Ok(DiscriminatorValue::Int(reader.read_i64()?)),
            token => Err(Error::json(format!(
                "expected a string or integer discriminator but found {}",
                token.name()
            ))),
        }
    }

    pub fn write(&self, writer: &mut Writer) {
        match self {
            DiscriminatorValue::Str(value) => writer.write_str(value),
            DiscriminatorValue::Int(value) => writer.write_i64(*value),
        }
    }
}

impl fmt::Display for DiscriminatorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscriminatorValue::Str(value) => write!(f, "\"{value}\""),
            DiscriminatorValue::Int(value) => write!(f, "{value}"),
        }
    }
}

impl From<&'static str> for DiscriminatorValue {
    fn from(value: &'static str) -> Self {
        DiscriminatorValue::Str(Cow::Borrowed(value))
    }
}

impl From<String> for DiscriminatorValue {
    fn from(value: String) -> Self {
        DiscriminatorValue::Str(Cow::Owned(value))
    }
}

impl From<i64> for DiscriminatorValue {
    fn from(value: i64) -> Self {
        DiscriminatorValue::Int(value)
    }
}

/// What a convention sees of a type it is asked to claim.
#[derive(Clone, Debug)]
pub struct DiscriminatorTypeInfo {
    pub type_id: TypeId,
    /// Short type name.
    pub type_name: &'static str,
    /// Discriminator declared by the type's mapping.
    pub discriminator: Option<DiscriminatorValue>,
}

pub trait DiscriminatorConvention: Send + Sync {
    /// Name of the discriminator member.
    fn member_name(&self) -> &str;

    /// Claims the type for this convention. `Ok(false)` lets older
    /// conventions try.
    fn try_register_type(&self, info: &DiscriminatorTypeInfo) -> Result<bool, Error>;

    /// Reads a discriminator value and returns the type it denotes.
    fn read_discriminator(&self, reader: &mut Reader) -> Result<TypeId, Error>;

    fn write_discriminator(&self, writer: &mut Writer, type_id: TypeId) -> Result<(), Error>;
}
