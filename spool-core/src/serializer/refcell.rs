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
use crate::serializer::{Converter, JsonType, Populate};
use crate::types::Shape;
use std::cell::RefCell;
use std::sync::Arc;

/// Transparent over the cell. Behind an `Rc`, the cell is what lets a value
/// be registered under its `$id` before its members are read.
pub struct RefCellConverter<T> {
    inner: Arc<dyn Converter<T>>,
}

impl<T: 'static> RefCellConverter<T> {
    fn borrowed(type_name: &str) -> Error {
        Error::not_allowed(format!(
            "RefCell<{type_name}> is mutably borrowed while being written"
        ))
    }
}

impl<T: 'static> Converter<RefCell<T>> for RefCellConverter<T> {
    fn read(&self, context: &mut ReadContext) -> Result<RefCell<T>, Error> {
        self.inner.read(context).map(RefCell::new)
    }

    fn write(&self, value: &RefCell<T>, context: &mut WriteContext) -> Result<(), Error> {
        let value = value
            .try_borrow()
            .map_err(|_| Self::borrowed(std::any::type_name::<T>()))?;
        self.inner.write(&value, context)
    }

    #[inline(always)]
    fn shape(&self) -> Shape {
        self.inner.shape()
    }

    fn is_null(&self, value: &RefCell<T>) -> bool {
        value
            .try_borrow()
            .is_ok_and(|value| self.inner.is_null(&value))
    }

    fn create_instance(&self, context: &mut ReadContext) -> Result<Option<RefCell<T>>, Error> {
        Ok(self.inner.create_instance(context)?.map(RefCell::new))
    }

    fn read_members(&self, context: &mut ReadContext) -> Result<RefCell<T>, Error> {
        self.inner.read_members(context).map(RefCell::new)
    }

    fn populate_members(&self, target: &mut RefCell<T>, context: &mut ReadContext) -> Result<(), Error> {
        self.inner.populate_members(target.get_mut(), context)
    }

    fn populate(&self, target: &mut RefCell<T>, context: &mut ReadContext) -> Result<(), Error> {
        self.inner.populate(target.get_mut(), context)
    }

    fn write_members(&self, value: &RefCell<T>, context: &mut WriteContext) -> Result<(), Error> {
        let value = value
            .try_borrow()
            .map_err(|_| Self::borrowed(std::any::type_name::<T>()))?;
        self.inner.write_members(&value, context)
    }

    #[inline(always)]
    fn supports_shared_population(&self) -> bool {
        true
    }

    fn populate_shared(
        &self,
        target: &RefCell<T>,
        populate: Populate,
        context: &mut ReadContext,
    ) -> Result<(), Error> {
        let mut target = target.try_borrow_mut().map_err(|_| {
            Error::invalid_ref(format!(
                "RefCell<{}> is borrowed while its members are read",
                std::any::type_name::<T>()
            ))
        })?;
        match populate {
            Populate::Members => self.inner.populate_members(&mut target, context),
            Populate::Value => self.inner.populate(&mut target, context),
        }
    }
}

impl<T: JsonType> JsonType for RefCell<T> {
    fn create_converter(resolver: &TypeResolver) -> Result<Arc<dyn Converter<Self>>, Error> {
        Ok(Arc::new(RefCellConverter {
            inner: resolver.get_converter::<T>()?,
        }))
    }

    fn json_default() -> Option<Self> {
        T::json_default().map(RefCell::new)
    }
}
