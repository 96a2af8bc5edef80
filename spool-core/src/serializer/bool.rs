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
use crate::resolver::type_resolver::TypeResolver;
use crate::serializer::number::{Primitive, PrimitiveConverter};
use crate::serializer::{Converter, JsonType};
use std::sync::Arc;

impl Primitive for bool {
    #[inline(always)]
    fn read_from(reader: &mut Reader) -> Result<Self, Error> {
        reader.read_bool()
    }

    #[inline(always)]
    fn write_to(self, writer: &mut Writer) -> Result<(), Error> {
        writer.write_bool(self);
        Ok(())
    }
}

impl JsonType for bool {
    fn create_converter(_: &TypeResolver) -> Result<Arc<dyn Converter<Self>>, Error> {
        Ok(PrimitiveConverter::<bool>::shared())
    }

    #[inline(always)]
    fn json_default() -> Option<Self> {
        Some(false)
    }
}
