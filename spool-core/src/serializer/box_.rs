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
use crate::types::Shape;
use std::sync::Arc;

struct BoxConverter<T> {
    inner: Arc<dyn Converter<T>>,
}

impl<T: 'static> Converter<Box<T>> for BoxConverter<T> {
    fn read(&self, context: &mut ReadContext) -> Result<Box<T>, Error> {
        self.inner.read(context).map(Box::new)
    }

    fn write(&self, value: &Box<T>, context: &mut WriteContext) -> Result<(), Error> {
        self.inner.write(value, context)
    }

    fn shape(&self) -> Shape {
        self.inner.shape()
    }

    fn is_null(&self, value: &Box<T>) -> bool {
        self.inner.is_null(value)
    }

    fn create_instance(&self, context: &mut ReadContext) -> Result<Option<Box<T>>, Error> {
        Ok(self.inner.create_instance(context)?.map(Box::new))
    }

    fn read_members(&self, context: &mut ReadContext) -> Result<Box<T>, Error> {
        self.inner.read_members(context).map(Box::new)
    }

    fn populate_members(&self, target: &mut Box<T>, context: &mut ReadContext) -> Result<(), Error> {
        self.inner.populate_members(target, context)
    }

    fn populate(&self, target: &mut Box<T>, context: &mut ReadContext) -> Result<(), Error> {
        self.inner.populate(target, context)
    }

    fn write_members(&self, value: &Box<T>, context: &mut WriteContext) -> Result<(), Error> {
        self.inner.write_members(value, context)
    }
}

impl<T: JsonType> JsonType for Box<T> {
    fn create_converter(resolver: &TypeResolver) -> Result<Arc<dyn Converter<Self>>, Error> {
        Ok(Arc::new(BoxConverter {
            inner: resolver.get_converter::<T>()?,
        }))
    }

    fn json_default() -> Option<Self> {
        T::json_default().map(Box::new)
    }
}
