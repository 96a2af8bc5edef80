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
use crate::serializer::collection::{expect_array, read_elements, write_elements};
use crate::serializer::{Converter, JsonType};
use crate::types::Shape;
use std::sync::Arc;

/// Fixed-length arrays; the JSON array must have exactly `N` elements.
pub struct ArrayConverter<T, const N: usize> {
    element: Arc<dyn Converter<T>>,
}

impl<T: 'static, const N: usize> Converter<[T; N]> for ArrayConverter<T, N> {
    fn read(&self, context: &mut ReadContext) -> Result<[T; N], Error> {
        expect_array::<[T; N]>(context)?;
        let mut items = Vec::with_capacity(N);
        read_elements(self.element.as_ref(), context, |item| items.push(item))?;
        let len = items.len();
        items.try_into().map_err(|_| {
            Error::type_error(format!("expected an array of {N} elements but found {len}"))
        })
    }

    fn write(&self, value: &[T; N], context: &mut WriteContext) -> Result<(), Error> {
        write_elements(self.element.as_ref(), value, context)
    }

    #[inline(always)]
    fn shape(&self) -> Shape {
        Shape::Array
    }
}

impl<T: JsonType, const N: usize> JsonType for [T; N] {
    fn create_converter(resolver: &TypeResolver) -> Result<Arc<dyn Converter<Self>>, Error> {
        Ok(Arc::new(ArrayConverter::<T, N> {
            element: resolver.get_converter::<T>()?,
        }))
    }
}
