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

//! Sequences written as JSON arrays.
//!
//! Growable collections are filled one element at a time through `Extend`,
//! which also lets them be populated in place. Fixed shapes such as
//! `Box<[T]>` are collected from a working `Vec` once the array is closed.

use crate::buffer::Token;
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::type_resolver::TypeResolver;
use crate::serializer::{with_depth, with_write_depth, Converter, JsonType};
use crate::types::Shape;
use std::collections::{BTreeSet, BinaryHeap, HashSet, LinkedList, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;
use std::ops::Deref;
use std::rc::Rc;
use std::sync::Arc;

/// Checks the next token opens an array of `C`.
pub(crate) fn expect_array<C: ?Sized>(context: &mut ReadContext) -> Result<(), Error> {
    let token = context.reader.peek()?;
    if token != Token::StartArray {
        return Err(Error::type_error(format!(
            "expected an array for {} but found {}",
            std::any::type_name::<C>(),
            token.name()
        )));
    }
    Ok(())
}

/// Reads array elements through the closing bracket, handing each to `push`.
pub(crate) fn read_elements<T: 'static>(
    element: &dyn Converter<T>,
    context: &mut ReadContext,
    mut push: impl FnMut(T),
) -> Result<(), Error> {
    context.reader.read_start_array()?;
    with_depth(context, |context| {
        let mut index = 0;
        while context.reader.next_element()? {
            let item = element.read(context).map_err(|e| e.with_index(index))?;
            push(item);
            index += 1;
        }
        Ok(())
    })
}

pub(crate) fn write_elements<'a, T: 'static>(
    element: &dyn Converter<T>,
    items: impl IntoIterator<Item = &'a T>,
    context: &mut WriteContext,
) -> Result<(), Error> {
    with_write_depth(context, |context| {
        context.writer.write_start_array();
        for (index, item) in items.into_iter().enumerate() {
            element
                .write(item, context)
                .map_err(|e| e.with_index(index))?;
        }
        context.writer.write_end_array();
        Ok(())
    })
}

/// Converter of any growable collection of `T`.
pub struct CollectionConverter<C, T> {
    element: Arc<dyn Converter<T>>,
    _marker: PhantomData<fn() -> C>,
}

impl<C, T> CollectionConverter<C, T> {
    pub fn new(element: Arc<dyn Converter<T>>) -> Self {
        CollectionConverter {
            element,
            _marker: PhantomData,
        }
    }
}

impl<C, T> Converter<C> for CollectionConverter<C, T>
where
    C: Default + Extend<T> + 'static,
    for<'a> &'a C: IntoIterator<Item = &'a T>,
    T: 'static,
{
    fn read(&self, context: &mut ReadContext) -> Result<C, Error> {
        let mut collection = C::default();
        self.populate(&mut collection, context)?;
        Ok(collection)
    }

    fn write(&self, value: &C, context: &mut WriteContext) -> Result<(), Error> {
        write_elements(self.element.as_ref(), value, context)
    }

    #[inline(always)]
    fn shape(&self) -> Shape {
        Shape::Array
    }

    fn create_instance(&self, _context: &mut ReadContext) -> Result<Option<C>, Error> {
        Ok(Some(C::default()))
    }

    /// Appends the elements read to `target`.
    fn populate(&self, target: &mut C, context: &mut ReadContext) -> Result<(), Error> {
        expect_array::<C>(context)?;
        read_elements(self.element.as_ref(), context, |item| {
            target.extend(std::iter::once(item))
        })
    }
}

/// Converter of fixed shapes built from all elements at once.
pub struct CollectedConverter<C, T> {
    element: Arc<dyn Converter<T>>,
    _marker: PhantomData<fn() -> C>,
}

impl<C, T> CollectedConverter<C, T> {
    pub fn new(element: Arc<dyn Converter<T>>) -> Self {
        CollectedConverter {
            element,
            _marker: PhantomData,
        }
    }
}

impl<C, T> Converter<C> for CollectedConverter<C, T>
where
    C: FromIterator<T> + Deref<Target = [T]> + 'static,
    T: 'static,
{
    fn read(&self, context: &mut ReadContext) -> Result<C, Error> {
        expect_array::<C>(context)?;
        let mut items = Vec::new();
        read_elements(self.element.as_ref(), context, |item| items.push(item))?;
        Ok(items.into_iter().collect())
    }

    fn write(&self, value: &C, context: &mut WriteContext) -> Result<(), Error> {
        write_elements(self.element.as_ref(), value.iter(), context)
    }

    #[inline(always)]
    fn shape(&self) -> Shape {
        Shape::Array
    }
}

macro_rules! impl_json_collection {
    ($($ty:ident<T $(: $bound:path)*>),* $(,)?) => {
        $(
            impl<T: JsonType $(+ $bound)*> JsonType for $ty<T> {
                fn create_converter(
                    resolver: &TypeResolver,
                ) -> Result<Arc<dyn Converter<Self>>, Error> {
                    Ok(Arc::new(CollectionConverter::<$ty<T>, T>::new(
                        resolver.get_converter::<T>()?,
                    )))
                }

                fn json_default() -> Option<Self> {
                    Some($ty::new())
                }
            }
        )*
    };
}

impl_json_collection!(
    Vec<T>,
    VecDeque<T>,
    LinkedList<T>,
    BinaryHeap<T: Ord>,
    BTreeSet<T: Ord>,
);

impl<T, S> JsonType for HashSet<T, S>
where
    T: JsonType + Eq + Hash,
    S: BuildHasher + Default + 'static,
{
    fn create_converter(resolver: &TypeResolver) -> Result<Arc<dyn Converter<Self>>, Error> {
        Ok(Arc::new(CollectionConverter::<HashSet<T, S>, T>::new(
            resolver.get_converter::<T>()?,
        )))
    }

    fn json_default() -> Option<Self> {
        Some(HashSet::default())
    }
}

macro_rules! impl_json_slice {
    ($($ptr:ident),*) => {
        $(
            impl<T: JsonType> JsonType for $ptr<[T]> {
                fn create_converter(
                    resolver: &TypeResolver,
                ) -> Result<Arc<dyn Converter<Self>>, Error> {
                    Ok(Arc::new(CollectedConverter::<$ptr<[T]>, T>::new(
                        resolver.get_converter::<T>()?,
                    )))
                }
            }
        )*
    };
}

impl_json_slice!(Box, Rc, Arc);
