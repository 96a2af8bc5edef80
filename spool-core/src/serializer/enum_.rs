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

//! Unit-only enums, written as their variant names.

use crate::buffer::Token;
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::type_resolver::TypeResolver;
use crate::serializer::key::{key_text, DictionaryKeyConverter};
use crate::serializer::Converter;
use crate::util::ByteTrie;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

pub struct EnumVariant<E> {
    name: Cow<'static, str>,
    value: i64,
    make: fn() -> E,
}

impl<E> EnumVariant<E> {
    pub fn new(name: impl Into<Cow<'static, str>>, value: i64, make: fn() -> E) -> Self {
        EnumVariant {
            name: name.into(),
            value,
            make,
        }
    }
}

/// Implemented by `#[derive(JsonEnum)]`.
pub trait JsonEnum: Sized + 'static {
    fn variants() -> Vec<EnumVariant<Self>>;

    /// Position of `self` in [`JsonEnum::variants`].
    fn variant_index(&self) -> usize;
}

/// Name and integer lookup tables of an enum, built once per resolver.
pub struct EnumTable<E> {
    variants: Vec<EnumVariant<E>>,
    names: ByteTrie<usize>,
    folded: Option<ByteTrie<usize>>,
    values: HashMap<i64, usize>,
}

impl<E: JsonEnum> EnumTable<E> {
    pub fn new(case_insensitive: bool) -> Result<Self, Error> {
        let variants = E::variants();
        let mut names = ByteTrie::new();
        let mut folded = case_insensitive.then(ByteTrie::new);
        let mut values = HashMap::new();
        for (index, variant) in variants.iter().enumerate() {
            let duplicate = names.insert(variant.name.as_bytes(), index).is_err()
                || folded.as_mut().is_some_and(|folded| {
                    folded
                        .insert(&variant.name.as_bytes().to_ascii_lowercase(), index)
                        .is_err()
                });
            if duplicate {
                return Err(Error::config(format!(
                    "{} has more than one variant named {}",
                    std::any::type_name::<E>(),
                    variant.name
                )));
            }
            values.entry(variant.value).or_insert(index);
        }
        Ok(EnumTable {
            variants,
            names,
            folded,
            values,
        })
    }

    fn by_name(&self, name: &[u8]) -> Result<E, Error> {
        let index = self.names.get(name).copied().or_else(|| {
            self.folded
                .as_ref()
                .and_then(|folded| folded.get(&name.to_ascii_lowercase()).copied())
        });
        match index {
            Some(index) => Ok((self.variants[index].make)()),
            None => Err(Error::type_error(format!(
                "\"{}\" is not a variant of {}",
                String::from_utf8_lossy(name),
                std::any::type_name::<E>()
            ))),
        }
    }

    fn by_value(&self, value: i64) -> Result<E, Error> {
        match self.values.get(&value) {
            Some(&index) => Ok((self.variants[index].make)()),
            None => Err(Error::type_error(format!(
                "{value} is not a value of {}",
                std::any::type_name::<E>()
            ))),
        }
    }

    fn name_of(&self, value: &E) -> Result<&str, Error> {
        self.variants
            .get(value.variant_index())
            .map(|variant| variant.name.as_ref())
            .ok_or_else(|| {
                Error::unknown(format!(
                    "variant index out of range for {}",
                    std::any::type_name::<E>()
                ))
            })
    }
}

pub struct EnumConverter<E> {
    table: Arc<EnumTable<E>>,
}

impl<E: JsonEnum> EnumConverter<E> {
    pub fn create(resolver: &TypeResolver) -> Result<Arc<dyn Converter<E>>, Error> {
        let table = EnumTable::new(resolver.config().is_case_insensitive())?;
        Ok(Arc::new(EnumConverter {
            table: Arc::new(table),
        }))
    }
}

impl<E: JsonEnum> Converter<E> for EnumConverter<E> {
    fn read(&self, context: &mut ReadContext) -> Result<E, Error> {
        match context.reader.peek()? {
            Token::String => {
                let name = context.reader.read_string_bytes()?;
                self.table.by_name(&name)
            }
            Token::Number => {
                let value = context.reader.read_i64()?;
                self.table.by_value(value)
            }
            token => Err(Error::type_error(format!(
                "expected a name or number for {} but found {}",
                std::any::type_name::<E>(),
                token.name()
            ))),
        }
    }

    fn write(&self, value: &E, context: &mut WriteContext) -> Result<(), Error> {
        let name = self.table.name_of(value)?;
        context.writer.write_str(name);
        Ok(())
    }
}

pub struct EnumKeyConverter<E> {
    table: Arc<EnumTable<E>>,
}

impl<E: JsonEnum> EnumKeyConverter<E> {
    pub fn create(resolver: &TypeResolver) -> Result<Arc<dyn DictionaryKeyConverter<E>>, Error> {
        let table = EnumTable::new(resolver.config().is_case_insensitive())?;
        Ok(Arc::new(EnumKeyConverter {
            table: Arc::new(table),
        }))
    }
}

impl<E: JsonEnum> DictionaryKeyConverter<E> for EnumKeyConverter<E> {
    fn read_key(&self, name: &[u8], _context: &mut ReadContext) -> Result<E, Error> {
        match self.table.by_name(name) {
            Ok(value) => Ok(value),
            Err(err) => match key_text(name)?.parse::<i64>() {
                Ok(value) => self.table.by_value(value),
                Err(_) => Err(err),
            },
        }
    }

    fn write_key<'k>(&self, key: &'k E, _context: &WriteContext) -> Result<Cow<'k, str>, Error> {
        Ok(Cow::Owned(self.table.name_of(key)?.to_owned()))
    }
}
