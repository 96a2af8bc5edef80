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
use std::sync::Arc;

/// `null` or the inner value.
pub struct OptionConverter<T> {
    inner: Arc<dyn Converter<T>>,
}

impl<T: 'static> OptionConverter<T> {
    pub fn new(inner: Arc<dyn Converter<T>>) -> Self {
        OptionConverter { inner }
    }
}

impl<T: 'static> Converter<Option<T>> for OptionConverter<T> {
    #[inline(always)]
    fn read(&self, context: &mut ReadContext) -> Result<Option<T>, Error> {
        if context.reader.try_read_null()? {
            return Ok(None);
        }
        self.inner.read(context).map(Some)
    }

    #[inline(always)]
    fn write(&self, value: &Option<T>, context: &mut WriteContext) -> Result<(), Error> {
        match value {
            Some(inner) => self.inner.write(inner, context),
            None => {
                context.writer.write_null();
                Ok(())
            }
        }
    }

    #[inline(always)]
    fn is_null(&self, value: &Option<T>) -> bool {
        match value {
            Some(inner) => self.inner.is_null(inner),
            None => true,
        }
    }

    fn populate(&self, target: &mut Option<T>, context: &mut ReadContext) -> Result<(), Error> {
        if context.reader.try_read_null()? {
            *target = None;
            return Ok(());
        }
        match target {
            Some(inner) => self.inner.populate(inner, context),
            None => {
                *target = Some(self.inner.read(context)?);
                Ok(())
            }
        }
    }
}

impl<T: JsonType> JsonType for Option<T> {
    fn create_converter(resolver: &TypeResolver) -> Result<Arc<dyn Converter<Self>>, Error> {
        Ok(Arc::new(OptionConverter::new(resolver.get_converter::<T>()?)))
    }

    #[inline(always)]
    fn json_default() -> Option<Self> {
        Some(None)
    }
}
