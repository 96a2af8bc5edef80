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

use crate::buffer::{Reader, Writer};
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::type_resolver::TypeResolver;
use crate::serializer::{Converter, JsonType};
use std::marker::PhantomData;
use std::sync::Arc;

/// A scalar with a direct token representation.
pub(crate) trait Primitive: Copy + Send + Sync + 'static {
    fn read_from(reader: &mut Reader) -> Result<Self, Error>;

    fn write_to(self, writer: &mut Writer) -> Result<(), Error>;
}

pub(crate) struct PrimitiveConverter<T>(PhantomData<fn() -> T>);

impl<T: Primitive> PrimitiveConverter<T> {
    pub(crate) fn shared() -> Arc<dyn Converter<T>> {
        Arc::new(PrimitiveConverter(PhantomData))
    }
}

impl<T: Primitive> Converter<T> for PrimitiveConverter<T> {
    #[inline(always)]
    fn read(&self, context: &mut ReadContext) -> Result<T, Error> {
        T::read_from(&mut context.reader)
    }

    #[inline(always)]
    fn write(&self, value: &T, context: &mut WriteContext) -> Result<(), Error> {
        value.write_to(context.writer)
    }
}

/// Narrows a wide integer read, failing with a type error when out of range.
#[inline(always)]
pub(crate) fn narrow<W, N>(value: W) -> Result<N, Error>
where
    W: Copy + std::fmt::Display,
    N: TryFrom<W>,
{
    N::try_from(value).map_err(|_| {
        Error::type_error(format!(
            "{value} is out of range for {}",
            std::any::type_name::<N>()
        ))
    })
}

macro_rules! impl_wide_number {
    ($ty:ty, $read:ident, $write:ident) => {
        impl Primitive for $ty {
            #[inline(always)]
            fn read_from(reader: &mut Reader) -> Result<Self, Error> {
                reader.$read()
            }

            #[inline(always)]
            fn write_to(self, writer: &mut Writer) -> Result<(), Error> {
                writer.$write(self);
                Ok(())
            }
        }
    };
}

macro_rules! impl_narrow_number {
    ($ty:ty, $read:ident, $write:ident, $wide:ty) => {
        impl Primitive for $ty {
            #[inline(always)]
            fn read_from(reader: &mut Reader) -> Result<Self, Error> {
                narrow(reader.$read()?)
            }

            #[inline(always)]
            fn write_to(self, writer: &mut Writer) -> Result<(), Error> {
                writer.$write(self as $wide);
                Ok(())
            }
        }
    };
}

macro_rules! impl_json_number {
    ($($ty:ty => $zero:expr),* $(,)?) => {
        $(
            impl JsonType for $ty {
                fn create_converter(_: &TypeResolver) -> Result<Arc<dyn Converter<Self>>, Error> {
                    Ok(PrimitiveConverter::<$ty>::shared())
                }

                #[inline(always)]
                fn json_default() -> Option<Self> {
                    Some($zero)
                }
            }
        )*
    };
}

impl_wide_number!(i64, read_i64, write_i64);
impl_wide_number!(u64, read_u64, write_u64);
impl_wide_number!(i128, read_i128, write_i128);
impl_wide_number!(u128, read_u128, write_u128);
impl_narrow_number!(i8, read_i64, write_i64, i64);
impl_narrow_number!(i16, read_i64, write_i64, i64);
impl_narrow_number!(i32, read_i64, write_i64, i64);
impl_narrow_number!(isize, read_i64, write_i64, i64);
impl_narrow_number!(u8, read_u64, write_u64, u64);
impl_narrow_number!(u16, read_u64, write_u64, u64);
impl_narrow_number!(u32, read_u64, write_u64, u64);
impl_narrow_number!(usize, read_u64, write_u64, u64);

impl Primitive for f64 {
    #[inline(always)]
    fn read_from(reader: &mut Reader) -> Result<Self, Error> {
        reader.read_f64()
    }

    #[inline(always)]
    fn write_to(self, writer: &mut Writer) -> Result<(), Error> {
        writer.write_f64(self)
    }
}

impl Primitive for f32 {
    #[inline(always)]
    fn read_from(reader: &mut Reader) -> Result<Self, Error> {
        reader.read_f32()
    }

    #[inline(always)]
    fn write_to(self, writer: &mut Writer) -> Result<(), Error> {
        writer.write_f32(self)
    }
}

impl_json_number!(
    i8 => 0, i16 => 0, i32 => 0, i64 => 0, i128 => 0, isize => 0,
    u8 => 0, u16 => 0, u32 => 0, u64 => 0, u128 => 0, usize => 0,
    f32 => 0.0, f64 => 0.0,
);
