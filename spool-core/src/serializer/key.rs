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

//! Dictionary keys: the conversion between a key value and the property
//! name it is written as.

use crate::buffer::{Reader, Writer};
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::type_resolver::TypeResolver;
use crate::serializer::number::Primitive;
use std::borrow::Cow;
use std::rc::Rc;
use std::sync::Arc;

pub trait DictionaryKeyConverter<K>: Send + Sync + 'static {
    /// Parses a key from an unescaped property name.
    fn read_key(&self, name: &[u8], context: &mut ReadContext) -> Result<K, Error>;

    fn write_key<'k>(&self, key: &'k K, context: &WriteContext) -> Result<Cow<'k, str>, Error>;
}

/// A type usable as a dictionary key.
pub trait JsonKey: Sized + 'static {
    fn create_key_converter(
        resolver: &TypeResolver,
    ) -> Result<Arc<dyn DictionaryKeyConverter<Self>>, Error>;
}

#[inline(always)]
pub(crate) fn key_text(name: &[u8]) -> Result<&str, Error> {
    std::str::from_utf8(name).map_err(|_| Error::json("property name is not valid UTF-8"))
}

/// String keys, renamed through the dictionary key policy on write.
struct StrKeyConverter<K> {
    make: fn(&str) -> K,
    view: fn(&K) -> &str,
}

impl<K: 'static> DictionaryKeyConverter<K> for StrKeyConverter<K> {
    fn read_key(&self, name: &[u8], _context: &mut ReadContext) -> Result<K, Error> {
        key_text(name).map(self.make)
    }

    fn write_key<'k>(&self, key: &'k K, context: &WriteContext) -> Result<Cow<'k, str>, Error> {
        let key = (self.view)(key);
        Ok(match context.config().dictionary_key_policy() {
            Some(policy) => Cow::Owned(policy.convert(key)),
            None => Cow::Borrowed(key),
        })
    }
}

macro_rules! impl_str_key {
    ($ty:ty, $make:expr, $view:expr) => {
        impl JsonKey for $ty {
            fn create_key_converter(
                _: &TypeResolver,
            ) -> Result<Arc<dyn DictionaryKeyConverter<Self>>, Error> {
                Ok(Arc::new(StrKeyConverter::<$ty> {
                    make: $make,
                    view: $view,
                }))
            }
        }
    };
}

impl_str_key!(String, str::to_owned, String::as_str);
impl_str_key!(Box<str>, |key| Box::from(key), |key| &**key);
impl_str_key!(Rc<str>, |key| Rc::from(key), |key| &**key);
impl_str_key!(Arc<str>, |key| Arc::from(key), |key| &**key);

/// Keys written as their decimal text, through the same scanner and
/// formatter as integer values.
struct IntKeyConverter<K>(std::marker::PhantomData<fn() -> K>);

impl<K: Primitive> DictionaryKeyConverter<K> for IntKeyConverter<K> {
    fn read_key(&self, name: &[u8], _context: &mut ReadContext) -> Result<K, Error> {
        let not_integer = || {
            Error::type_error(format!(
                "\"{}\" is not an integer key",
                String::from_utf8_lossy(name)
            ))
        };
        // the number scanner skips leading whitespace; keys may not have any
        if !matches!(name.first(), Some(b'-' | b'0'..=b'9')) {
            return Err(not_integer());
        }
        let mut reader = Reader::new(name);
        match K::read_from(&mut reader) {
            Ok(key) if reader.position() == name.len() => Ok(key),
            Ok(_) => Err(not_integer()),
            Err(err @ Error::TypeError(_)) => Err(err),
            Err(_) => Err(not_integer()),
        }
    }

    fn write_key<'k>(&self, key: &'k K, _context: &WriteContext) -> Result<Cow<'k, str>, Error> {
        let mut writer = Writer::default();
        (*key).write_to(&mut writer)?;
        String::from_utf8(writer.into_bytes())
            .map(Cow::Owned)
            .map_err(|_| Error::json("integer key is not valid UTF-8"))
    }
}

macro_rules! impl_int_key {
    ($($ty:ty),*) => {
        $(
            impl JsonKey for $ty {
                fn create_key_converter(
                    _: &TypeResolver,
                ) -> Result<Arc<dyn DictionaryKeyConverter<Self>>, Error> {
                    Ok(Arc::new(IntKeyConverter::<$ty>(std::marker::PhantomData)))
                }
            }
        )*
    };
}

impl_int_key!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

struct BoolKeyConverter;

impl DictionaryKeyConverter<bool> for BoolKeyConverter {
    fn read_key(&self, name: &[u8], _context: &mut ReadContext) -> Result<bool, Error> {
        match name {
            b"true" => Ok(true),
            b"false" => Ok(false),
            _ => Err(Error::type_error(format!(
                "\"{}\" is not a boolean key",
                String::from_utf8_lossy(name)
            ))),
        }
    }

    fn write_key<'k>(&self, key: &'k bool, _context: &WriteContext) -> Result<Cow<'k, str>, Error> {
        Ok(Cow::Borrowed(if *key { "true" } else { "false" }))
    }
}

impl JsonKey for bool {
    fn create_key_converter(_: &TypeResolver) -> Result<Arc<dyn DictionaryKeyConverter<Self>>, Error> {
        Ok(Arc::new(BoolKeyConverter))
    }
}

struct CharKeyConverter;

impl DictionaryKeyConverter<char> for CharKeyConverter {
    fn read_key(&self, name: &[u8], _context: &mut ReadContext) -> Result<char, Error> {
        let text = key_text(name)?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(Error::type_error(format!(
                "\"{text}\" is not a single character key"
            ))),
        }
    }

    fn write_key<'k>(&self, key: &'k char, _context: &WriteContext) -> Result<Cow<'k, str>, Error> {
        Ok(Cow::Owned(key.to_string()))
    }
}

impl JsonKey for char {
    fn create_key_converter(_: &TypeResolver) -> Result<Arc<dyn DictionaryKeyConverter<Self>>, Error> {
        Ok(Arc::new(CharKeyConverter))
    }
}
