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

use super::{DiscriminatorConvention, DiscriminatorTypeInfo, DiscriminatorValue};
use crate::buffer::{Reader, Writer};
use crate::error::Error;
use crate::types::TYPE_PROPERTY;
use std::any::TypeId;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Two-way map between discriminator values and types.
#[derive(Default)]
struct DiscriminatorTable {
    types: RwLock<HashMap<DiscriminatorValue, TypeId>>,
    values: RwLock<HashMap<TypeId, DiscriminatorValue>>,
}

impl DiscriminatorTable {
    fn bind(&self, value: DiscriminatorValue, info: &DiscriminatorTypeInfo) -> Result<(), Error> {
        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        match types.get(&value) {
            Some(type_id) if *type_id != info.type_id => {
                return Err(Error::config(format!(
                    "discriminator {value} of {} is already used by another type",
                    info.type_name
                )));
            }
            Some(_) => return Ok(()),
            None => {}
        }
        types.insert(value.clone(), info.type_id);
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(info.type_id, value);
        Ok(())
    }

    fn read(&self, reader: &mut Reader) -> Result<TypeId, Error> {
        let value = DiscriminatorValue::read(reader)?;
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
        types.get(&value).copied().ok_or_else(|| {
            Error::unknown_discriminator(format!("Unknown type discriminator: {value}"))
        })
    }

    fn write(&self, writer: &mut Writer, type_id: TypeId) -> Result<(), Error> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        let value = values.get(&type_id).ok_or_else(|| {
            Error::unknown_discriminator("type has no discriminator in this convention")
        })?;
        value.write(writer);
        Ok(())
    }
}

/// Claims types whose mapping declares a discriminator value and writes
/// that value under `$type` (or a custom member name).
pub struct DefaultDiscriminatorConvention {
    member_name: Cow<'static, str>,
    table: DiscriminatorTable,
}

impl Default for DefaultDiscriminatorConvention {
    fn default() -> Self {
        DefaultDiscriminatorConvention::new(TYPE_PROPERTY)
    }
}

impl DefaultDiscriminatorConvention {
    pub fn new(member_name: impl Into<Cow<'static, str>>) -> Self {
        DefaultDiscriminatorConvention {
            member_name: member_name.into(),
            table: DiscriminatorTable::default(),
        }
    }
}

impl DiscriminatorConvention for DefaultDiscriminatorConvention {
    fn member_name(&self) -> &str {
        &self.member_name
    }

    fn try_register_type(&self, info: &DiscriminatorTypeInfo) -> Result<bool, Error> {
        match &info.discriminator {
            Some(value) => {
                self.table.bind(value.clone(), info)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn read_discriminator(&self, reader: &mut Reader) -> Result<TypeId, Error> {
        self.table.read(reader)
    }

    fn write_discriminator(&self, writer: &mut Writer, type_id: TypeId) -> Result<(), Error> {
        self.table.write(writer, type_id)
    }
}

/// Claims every type, using its short type name as discriminator unless
/// the mapping declares one.
pub struct TypeNameDiscriminatorConvention {
    member_name: Cow<'static, str>,
    table: DiscriminatorTable,
}

impl Default for TypeNameDiscriminatorConvention {
    fn default() -> Self {
        TypeNameDiscriminatorConvention::new(TYPE_PROPERTY)
    }
}

impl TypeNameDiscriminatorConvention {
    pub fn new(member_name: impl Into<Cow<'static, str>>) -> Self {
        TypeNameDiscriminatorConvention {
            member_name: member_name.into(),
            table: DiscriminatorTable::default(),
        }
    }
}

impl DiscriminatorConvention for TypeNameDiscriminatorConvention {
    fn member_name(&self) -> &str {
        &self.member_name
    }

    fn try_register_type(&self, info: &DiscriminatorTypeInfo) -> Result<bool, Error> {
        let value = info
            .discriminator
            .clone()
            .unwrap_or(DiscriminatorValue::Str(Cow::Borrowed(info.type_name)));
        self.table.bind(value, info)?;
        Ok(true)
    }

    fn read_discriminator(&self, reader: &mut Reader) -> Result<TypeId, Error> {
        self.table.read(reader)
    }

    fn write_discriminator(&self, writer: &mut Writer, type_id: TypeId) -> Result<(), Error> {
        self.table.write(writer, type_id)
    }
}
