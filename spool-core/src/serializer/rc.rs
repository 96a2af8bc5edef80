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

//! Identity carrying pointers and the `$id`/`$ref`/`$values` protocol.
//!
//! With reference preservation on, the first time a pointer is written its
//! value gets an `$id`; later occurrences of the same pointer are written as
//! `{"$ref":"<id>"}`. Object values carry `$id` as their first member, array
//! values are wrapped as `{"$id":"<id>","$values":[...]}`. Scalars never
//! carry identity.
//!
//! While reading, a pointer is registered under its `$id` as early as
//! possible: before its members are read when the inner converter can fill a
//! value already behind the pointer, right after construction otherwise.

use crate::buffer::Token;
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::ref_resolver::{RefReader, RefWriter, Tracked};
use crate::resolver::type_resolver::TypeResolver;
use crate::serializer::{with_depth, with_write_depth, Converter, JsonType, Populate};
use crate::types::{Shape, ID_PROPERTY, REF_PROPERTY, VALUES_PROPERTY};
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;

/// A reference counted pointer whose identity is tracked.
pub trait SharedPointer<T>: Clone + 'static {
    fn wrap(value: T) -> Self;

    fn target(&self) -> &T;

    fn addr(&self) -> usize;

    fn track(&self, ref_writer: &mut RefWriter) -> Tracked;

    fn store(&self, id: &str, ref_reader: &mut RefReader) -> Result<(), Error>;

    fn resolve(id: &str, ref_reader: &RefReader) -> Result<Self, Error>;
}

impl<T: 'static> SharedPointer<T> for Rc<T> {
    #[inline(always)]
    fn wrap(value: T) -> Self {
        Rc::new(value)
    }

    #[inline(always)]
    fn target(&self) -> &T {
        self
    }

    #[inline(always)]
    fn addr(&self) -> usize {
        Rc::as_ptr(self) as *const () as usize
    }

    fn track(&self, ref_writer: &mut RefWriter) -> Tracked {
        ref_writer.track_rc(self)
    }

    fn store(&self, id: &str, ref_reader: &mut RefReader) -> Result<(), Error> {
        ref_reader.store_rc_ref(id, self.clone())
    }

    fn resolve(id: &str, ref_reader: &RefReader) -> Result<Self, Error> {
        ref_reader.get_rc_ref(id)
    }
}

/// Converter of [`SharedPointer`]s to values with a converter of their own.
pub struct SharedConverter<P, T> {
    inner: Arc<dyn Converter<T>>,
    _marker: PhantomData<fn() -> P>,
}

impl<P: SharedPointer<T>, T: 'static> SharedConverter<P, T> {
    pub fn new(inner: Arc<dyn Converter<T>>) -> Self {
        SharedConverter {
            inner,
            _marker: PhantomData,
        }
    }

    fn read_id(context: &mut ReadContext) -> Result<String, Error> {
        if context.reader.peek()? != Token::String {
            return Err(Error::json("reference id must be a string"));
        }
        Ok(context.reader.read_string()?.into_owned())
    }

    /// Reads the members that follow `$id` and registers the pointer.
    fn read_identified(&self, id: &str, context: &mut ReadContext) -> Result<P, Error> {
        let shape = self.inner.shape();
        if shape == Shape::Array {
            match context.reader.read_property_name()? {
                Some(name) if &*name == VALUES_PROPERTY => {}
                _ => {
                    return Err(Error::json(format!(
                        "expected \"$values\" after \"$id\" {id}"
                    )))
                }
            }
        }
        let populate = match shape {
            Shape::Array => Populate::Value,
            _ => Populate::Members,
        };
        let pointer = match self.shared_instance(context)? {
            Some(pointer) => {
                pointer.store(id, &mut context.ref_reader)?;
                self.inner
                    .populate_shared(pointer.target(), populate, context)?;
                pointer
            }
            None => {
                let value = match populate {
                    Populate::Value => self.inner.read(context)?,
                    Populate::Members => self.inner.read_members(context)?,
                };
                let pointer = P::wrap(value);
                pointer.store(id, &mut context.ref_reader)?;
                pointer
            }
        };
        if shape == Shape::Array {
            context.reader.read_end_object()?;
        }
        Ok(pointer)
    }

    /// A pointer to an empty instance, when the inner value can be filled
    /// in place.
    fn shared_instance(&self, context: &mut ReadContext) -> Result<Option<P>, Error> {
        if !self.inner.supports_shared_population() {
            return Ok(None);
        }
        Ok(self.inner.create_instance(context)?.map(P::wrap))
    }

    fn read_preserved(&self, context: &mut ReadContext) -> Result<P, Error> {
        let shape = self.inner.shape();
        let token = context.reader.peek()?;
        if shape == Shape::Value || token != Token::StartObject {
            return self.inner.read(context).map(P::wrap);
        }
        context.reader.read_start_object()?;
        with_depth(context, |context| {
            let first = context.reader.peek_property_name()?;
            match first.as_deref() {
                Some(REF_PROPERTY) => {
                    context.reader.read_property_name()?;
                    let id = Self::read_id(context)?;
                    if let Some(name) = context.reader.read_property_name()? {
                        return Err(Error::json(format!(
                            "\"$ref\" {id} cannot have sibling member \"{}\"",
                            String::from_utf8_lossy(&name)
                        )));
                    }
                    P::resolve(&id, &context.ref_reader)
                }
                Some(ID_PROPERTY) => {
                    context.reader.read_property_name()?;
                    let id = Self::read_id(context)?;
                    self.read_identified(&id, context)
                }
                _ if shape == Shape::Array => Err(Error::json(
                    "expected \"$id\" or \"$ref\" in the wrapper object of a collection",
                )),
                _ => self.inner.read_members(context).map(P::wrap),
            }
        })
    }

    fn write_preserved(&self, value: &P, context: &mut WriteContext) -> Result<(), Error> {
        let shape = self.inner.shape();
        if shape == Shape::Value || self.inner.is_null(value.target()) {
            return self.inner.write(value.target(), context);
        }
        match value.track(&mut context.ref_writer) {
            Tracked::Seen(id) => {
                context.writer.write_start_object();
                context.writer.write_property_name_bytes(REF_PROPERTY);
                context.writer.write_str(&id.to_string());
                context.writer.write_end_object();
                Ok(())
            }
            Tracked::First(id) => with_write_depth(context, |context| {
                context.writer.write_start_object();
                context.writer.write_property_name_bytes(ID_PROPERTY);
                context.writer.write_str(&id.to_string());
                if shape == Shape::Array {
                    context.writer.write_property_name_bytes(VALUES_PROPERTY);
                    self.inner.write(value.target(), context)?;
                } else {
                    self.inner.write_members(value.target(), context)?;
                }
                context.writer.write_end_object();
                Ok(())
            }),
        }
    }
}

impl<P: SharedPointer<T>, T: 'static> Converter<P> for SharedConverter<P, T> {
    fn read(&self, context: &mut ReadContext) -> Result<P, Error> {
        if context.config().is_preserve_references() {
            self.read_preserved(context)
        } else {
            self.inner.read(context).map(P::wrap)
        }
    }

    fn write(&self, value: &P, context: &mut WriteContext) -> Result<(), Error> {
        if context.config().is_preserve_references() {
            return self.write_preserved(value, context);
        }
        if self.inner.shape() == Shape::Value {
            return self.inner.write(value.target(), context);
        }
        let addr = value.addr();
        context
            .ref_writer
            .begin_visit(addr, std::any::type_name::<T>())?;
        let result = self.inner.write(value.target(), context);
        context.ref_writer.end_visit(addr);
        result
    }

    #[inline(always)]
    fn is_null(&self, value: &P) -> bool {
        self.inner.is_null(value.target())
    }
}

impl<T: JsonType> JsonType for Rc<T> {
    fn create_converter(resolver: &TypeResolver) -> Result<Arc<dyn Converter<Self>>, Error> {
        Ok(Arc::new(SharedConverter::<Rc<T>, T>::new(
            resolver.get_converter::<T>()?,
        )))
    }
}
