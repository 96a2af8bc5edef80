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

//! `Mutex` and `RwLock`: transparent like `RefCell`, and fillable in place
//! when shared through an `Arc`. A poisoned lock is still read and written.

use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::type_resolver::TypeResolver;
use crate::serializer::{Converter, JsonType, Populate};
use crate::types::Shape;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Exclusive and shared access to the value behind a lock.
trait Lock<T>: 'static {
    fn new_lock(value: T) -> Self;

    fn with_ref<R>(&self, f: impl FnOnce(&T) -> R) -> R;

    fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> R;

    fn inner_mut(&mut self) -> &mut T;
}

impl<T: 'static> Lock<T> for Mutex<T> {
    fn new_lock(value: T) -> Self {
        Mutex::new(value)
    }

    fn with_ref<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn inner_mut(&mut self) -> &mut T {
        self.get_mut().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: 'static> Lock<T> for RwLock<T> {
    fn new_lock(value: T) -> Self {
        RwLock::new(value)
    }

    fn with_ref<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.write().unwrap_or_else(PoisonError::into_inner))
    }

    fn inner_mut(&mut self) -> &mut T {
        self.get_mut().unwrap_or_else(PoisonError::into_inner)
    }
}

struct LockConverter<L, T> {
    inner: Arc<dyn Converter<T>>,
    _marker: std::marker::PhantomData<fn() -> L>,
}

impl<L: Lock<T>, T: 'static> Converter<L> for LockConverter<L, T> {
    fn read(&self, context: &mut ReadContext) -> Result<L, Error> {
        self.inner.read(context).map(L::new_lock)
    }

    fn write(&self, value: &L, context: &mut WriteContext) -> Result<(), Error> {
        value.with_ref(|value| self.inner.write(value, context))
    }

    #[inline(always)]
    fn shape(&self) -> Shape {
        self.inner.shape()
    }

    fn is_null(&self, value: &L) -> bool {
        value.with_ref(|value| self.inner.is_null(value))
    }

    fn create_instance(&self, context: &mut ReadContext) -> Result<Option<L>, Error> {
        Ok(self.inner.create_instance(context)?.map(L::new_lock))
    }

    fn read_members(&self, context: &mut ReadContext) -> Result<L, Error> {
        self.inner.read_members(context).map(L::new_lock)
    }

    fn populate_members(&self, target: &mut L, context: &mut ReadContext) -> Result<(), Error> {
        self.inner.populate_members(target.inner_mut(), context)
    }

    fn populate(&self, target: &mut L, context: &mut ReadContext) -> Result<(), Error> {
        self.inner.populate(target.inner_mut(), context)
    }

    fn write_members(&self, value: &L, context: &mut WriteContext) -> Result<(), Error> {
        value.with_ref(|value| self.inner.write_members(value, context))
    }

    #[inline(always)]
    fn supports_shared_population(&self) -> bool {
        true
    }

    fn populate_shared(
        &self,
        target: &L,
        populate: Populate,
        context: &mut ReadContext,
    ) -> Result<(), Error> {
        target.with_mut(|target| match populate {
            Populate::Members => self.inner.populate_members(target, context),
            Populate::Value => self.inner.populate(target, context),
        })
    }
}

impl<T: JsonType> JsonType for Mutex<T> {
    fn create_converter(resolver: &TypeResolver) -> Result<Arc<dyn Converter<Self>>, Error> {
        Ok(Arc::new(LockConverter::<Mutex<T>, T> {
            inner: resolver.get_converter::<T>()?,
            _marker: std::marker::PhantomData,
        }))
    }
}

impl<T: JsonType> JsonType for RwLock<T> {
    fn create_converter(resolver: &TypeResolver) -> Result<Arc<dyn Converter<Self>>, Error> {
        Ok(Arc::new(LockConverter::<RwLock<T>, T> {
            inner: resolver.get_converter::<T>()?,
            _marker: std::marker::PhantomData,
        }))
    }
}
