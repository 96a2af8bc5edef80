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
use crate::serializer::map::DictionaryConverter;
use crate::serializer::{Converter, JsonType};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Untyped JSON, kept as a [`serde_json::Value`] tree.
struct ValueConverter;

impl Converter<Value> for ValueConverter {
    fn read(&self, context: &mut ReadContext) -> Result<Value, Error> {
        context.read_untyped()
    }

    fn write(&self, value: &Value, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_value(value);
        Ok(())
    }

    #[inline(always)]
    fn is_null(&self, value: &Value) -> bool {
        value.is_null()
    }
}

impl JsonType for Value {
    fn create_converter(_: &TypeResolver) -> Result<Arc<dyn Converter<Self>>, Error> {
        Ok(Arc::new(ValueConverter))
    }

    fn json_default() -> Option<Self> {
        Some(Value::Null)
    }
}

impl JsonType for Map<String, Value> {
    fn create_converter(resolver: &TypeResolver) -> Result<Arc<dyn Converter<Self>>, Error> {
        Ok(Arc::new(DictionaryConverter::<Map<String, Value>, String, Value>::new(
            resolver.get_key_converter::<String>()?,
            resolver.get_converter::<Value>()?,
        )))
    }

    fn json_default() -> Option<Self> {
        Some(Map::new())
    }
}
