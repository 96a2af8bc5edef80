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
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::type_resolver::TypeResolver;
use crate::serializer::{Converter, JsonType};
use std::rc::Rc;
use std::sync::Arc;

/// Converter of the string-like types, parameterized by how the owned
/// value is made from the decoded text.
struct StrConverter<T> {
    make: fn(&str) -> T,
    view: fn(&T) -> &str,
}

impl<T: 'static> Converter<T> for StrConverter<T> {
    #[inline(always)]
    fn read(&self, context: &mut ReadContext) -> Result<T, Error> {
        let text = context.reader.read_string()?;
        Ok((self.make)(&text))
    }

    #[inline(always)]
    fn write(&self, value: &T, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_str((self.view)(value));
        Ok(())
    }
}

macro_rules! impl_json_str {
    ($ty:ty, $make:expr) => {
        impl JsonType for $ty {
            fn create_converter(_: &TypeResolver) -> Result<Arc<dyn Converter<Self>>, Error> {
                Ok(Arc::new(StrConverter::<$ty> {
                    make: $make,
                    view: |value| &**value,
                }))
            }
        }
    };
}

impl_json_str!(Box<str>, |text| Box::from(text));
impl_json_str!(Rc<str>, |text| Rc::from(text));
impl_json_str!(Arc<str>, |text| Arc::from(text));

impl JsonType for String {
    fn create_converter(_: &TypeResolver) -> Result<Arc<dyn Converter<Self>>, Error> {
        Ok(Arc::new(StrConverter::<String> {
            make: str::to_owned,
            view: String::as_str,
        }))
    }

    #[inline(always)]
    fn json_default() -> Option<Self> {
        Some(String::new())
    }
}

struct CharConverter;

impl Converter<char> for CharConverter {
    fn read(&self, context: &mut ReadContext) -> Result<char, Error> {
        let text = context.reader.read_string()?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(Error::type_error(format!(
                "expected a single character but found \"{text}\""
            ))),
        }
    }

    fn write(&self, value: &char, context: &mut WriteContext) -> Result<(), Error> {
        let mut buf = [0u8; 4];
        context.writer.write_str(value.encode_utf8(&mut buf));
        Ok(())
    }
}

impl JsonType for char {
    fn create_converter(_: &TypeResolver) -> Result<Arc<dyn Converter<Self>>, Error> {
        Ok(Arc::new(CharConverter))
    }
}
