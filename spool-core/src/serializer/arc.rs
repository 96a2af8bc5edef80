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
use crate::resolver::ref_resolver::{RefReader, RefWriter, Tracked};
use crate::resolver::type_resolver::TypeResolver;
use crate::serializer::rc::{SharedConverter, SharedPointer};
use crate::serializer::{Converter, JsonType};
use std::sync::Arc;

impl<T: 'static> SharedPointer<T> for Arc<T> {
    #[inline(always)]
    fn wrap(value: T) -> Self {
        Arc::new(value)
    }

    #[inline(always)]
    fn target(&self) -> &T {
        self
    }

    #[inline(always)]
    fn addr(&self) -> usize {
        Arc::as_ptr(self) as *const () as usize
    }

    fn track(&self, ref_writer: &mut RefWriter) -> Tracked {
        ref_writer.track_arc(self)
    }

    fn store(&self, id: &str, ref_reader: &mut RefReader) -> Result<(), Error> {
        ref_reader.store_arc_ref(id, self.clone())
    }

    fn resolve(id: &str, ref_reader: &RefReader) -> Result<Self, Error> {
        ref_reader.get_arc_ref(id)
    }
}

impl<T: JsonType> JsonType for Arc<T> {
    fn create_converter(resolver: &TypeResolver) -> Result<Arc<dyn Converter<Self>>, Error> {
        Ok(Arc::new(SharedConverter::<Arc<T>, T>::new(
            resolver.get_converter::<T>()?,
        )))
    }
}
