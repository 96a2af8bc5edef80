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

//! Converters: the per-type read/write units of spool.
//!
//! Every type that can be written or read implements [`JsonType`], which
//! names the [`Converter`] the [`TypeResolver`] builds for it. Converters are
//! created once per type and shared, so they must be `Send + Sync` and keep no
//! per-call state; everything transient lives in the read and write
//! contexts.
//!
//! Besides whole-value `read`/`write`, object and array shaped converters
//! expose the finer entry points identity wrappers need to put `$id` in front
//! of the members and to register an instance before its members are read.

use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::type_resolver::TypeResolver;
use crate::types::Shape;
use std::sync::Arc;

pub mod arc;
pub mod array;
mod bool;
mod box_;
pub mod collection;
mod datetime;
pub mod enum_;
pub mod key;
pub mod map;
pub mod mutex;
mod number;
pub mod object;
mod option;
pub mod rc;
pub mod refcell;
mod string;
pub mod union;
mod value;

pub use object::ObjectConverter;
pub use union::{JsonPolymorphic, LeafType, PolymorphicConverter, UnionConverter};

/// What [`Converter::populate_shared`] reads into the shared target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Populate {
    /// The members of an object whose opening brace is already consumed.
    Members,
    /// A complete value, such as the array under `$values`.
    Value,
}

pub trait Converter<T>: Send + Sync + 'static {
    fn read(&self, context: &mut ReadContext) -> Result<T, Error>;

    fn write(&self, value: &T, context: &mut WriteContext) -> Result<(), Error>;

    #[inline(always)]
    fn shape(&self) -> Shape {
        Shape::Value
    }

    /// Whether `value` is written as JSON `null`.
    #[inline(always)]
    fn is_null(&self, _value: &T) -> bool {
        false
    }

    /// An empty instance members can be populated into, when `T` has one.
    fn create_instance(&self, _context: &mut ReadContext) -> Result<Option<T>, Error> {
        Ok(None)
    }

    /// Reads the remaining members of an object whose opening brace was
    /// already consumed, through the closing brace.
    fn read_members(&self, _context: &mut ReadContext) -> Result<T, Error> {
        Err(Error::unsupported(format!(
            "{} is not read from a JSON object",
            std::any::type_name::<T>()
        )))
    }

    fn populate_members(&self, target: &mut T, context: &mut ReadContext) -> Result<(), Error> {
        *target = self.read_members(context)?;
        Ok(())
    }

    /// Reads a whole value into `target`. Converters for growable containers
    /// fill the existing instance instead of replacing it.
    fn populate(&self, target: &mut T, context: &mut ReadContext) -> Result<(), Error> {
        *target = self.read(context)?;
        Ok(())
    }

    /// Writes the members of an object without the surrounding braces.
    fn write_members(&self, _value: &T, _context: &mut WriteContext) -> Result<(), Error> {
        Err(Error::unsupported(format!(
            "{} is not written as a JSON object",
            std::any::type_name::<T>()
        )))
    }

    /// Whether [`Converter::populate_shared`] can fill a value that is
    /// already behind a shared pointer.
    #[inline(always)]
    fn supports_shared_population(&self) -> bool {
        false
    }

    fn populate_shared(
        &self,
        _target: &T,
        _populate: Populate,
        _context: &mut ReadContext,
    ) -> Result<(), Error> {
        Err(Error::unsupported(format!(
            "{} cannot be populated through a shared reference",
            std::any::type_name::<T>()
        )))
    }
}

/// A type spool knows how to convert.
///
/// Derived by `#[derive(JsonObject)]`, `#[derive(JsonUnion)]` and
/// `#[derive(JsonEnum)]`; implemented here for primitives, strings, dates,
/// smart pointers and the std collections.
pub trait JsonType: Sized + 'static {
    fn create_converter(resolver: &TypeResolver) -> Result<Arc<dyn Converter<Self>>, Error>;

    /// Value substituted for an absent constructor argument.
    #[inline(always)]
    fn json_default() -> Option<Self> {
        None
    }
}

/// Runs `f` one nesting level deeper, failing past the configured maximum.
#[inline(always)]
pub(crate) fn with_depth<'de, 'bf, R>(
    context: &mut ReadContext<'de, 'bf>,
    f: impl FnOnce(&mut ReadContext<'de, 'bf>) -> Result<R, Error>,
) -> Result<R, Error> {
    context.inc_depth()?;
    let result = f(context);
    context.dec_depth();
    result
}

#[inline(always)]
pub(crate) fn with_write_depth<'se>(
    context: &mut WriteContext<'se>,
    f: impl FnOnce(&mut WriteContext<'se>) -> Result<(), Error>,
) -> Result<(), Error> {
    context.inc_depth()?;
    let result = f(context);
    context.dec_depth();
    result
}
