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

//! Dictionaries written as JSON objects, keys converted to property names.

use crate::buffer::Token;
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::type_resolver::TypeResolver;
use crate::serializer::key::{DictionaryKeyConverter, JsonKey};
use crate::serializer::{with_depth, with_write_depth, Converter, JsonType};
use crate::types::{Shape, ID_PROPERTY, REF_PROPERTY};
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;
use std::sync::Arc;

/// Converter of any map of `K` to `V` that can be extended with pairs.
pub struct DictionaryConverter<M, K, V> {
    key: Arc<dyn DictionaryKeyConverter<K>>,
    value: Arc<dyn Converter<V>>,
    _marker: PhantomData<fn() -> M>,
}

impl<M, K, V> DictionaryConverter<M, K, V> {
    pub fn new(key: Arc<dyn DictionaryKeyConverter<K>>, value: Arc<dyn Converter<V>>) -> Self {
        DictionaryConverter {
            key,
            value,
            _marker: PhantomData,
        }
    }
}

impl<M, K, V> Converter<M> for DictionaryConverter<M, K, V>
where
    M: Default + Extend<(K, V)> + 'static,
    for<'a> &'a M: IntoIterator<Item = (&'a K, &'a V)>,
    K: 'static,
    V: 'static,
{
    fn read(&self, context: &mut ReadContext) -> Result<M, Error> {
        let mut map = M::default();
        self.populate(&mut map, context)?;
        Ok(map)
    }

    fn write(&self, value: &M, context: &mut WriteContext) -> Result<(), Error> {
        with_write_depth(context, |context| {
            context.writer.write_start_object();
            self.write_members(value, context)?;
            context.writer.write_end_object();
            Ok(())
        })
    }

    #[inline(always)]
    fn shape(&self) -> Shape {
        Shape::Object
    }

    fn create_instance(&self, _context: &mut ReadContext) -> Result<Option<M>, Error> {
        Ok(Some(M::default()))
    }

    fn read_members(&self, context: &mut ReadContext) -> Result<M, Error> {
        let mut map = M::default();
        self.populate_members(&mut map, context)?;
        Ok(map)
    }

    fn populate_members(&self, target: &mut M, context: &mut ReadContext) -> Result<(), Error> {
        let preserve = context.config().is_preserve_references();
        with_depth(context, |context| {
            while let Some(name) = context.reader.read_property_name()? {
                if preserve && &*name == ID_PROPERTY {
                    context.reader.skip_value()?;
                    continue;
                }
                if preserve && &*name == REF_PROPERTY {
                    return Err(Error::invalid_ref(format!(
                        "Cannot resolve a reference into {}; only shared pointers keep identity",
                        std::any::type_name::<M>()
                    )));
                }
                let member = String::from_utf8_lossy(&name);
                let key = self
                    .key
                    .read_key(&name, context)
                    .map_err(|e| e.with_member(&member))?;
                let value = self
                    .value
                    .read(context)
                    .map_err(|e| e.with_member(&member))?;
                target.extend(std::iter::once((key, value)));
            }
            Ok(())
        })
    }

    fn populate(&self, target: &mut M, context: &mut ReadContext) -> Result<(), Error> {
        let token = context.reader.peek()?;
        if token != Token::StartObject {
            return Err(Error::type_error(format!(
                "expected an object for {} but found {}",
                std::any::type_name::<M>(),
                token.name()
            )));
        }
        context.reader.read_start_object()?;
        self.populate_members(target, context)
    }

    fn write_members(&self, value: &M, context: &mut WriteContext) -> Result<(), Error> {
        for (key, item) in value {
            let name = self.key.write_key(key, context)?;
            context.writer.write_property_name(&name);
            self.value
                .write(item, context)
                .map_err(|e| e.with_member(&name))?;
        }
        Ok(())
    }
}

impl<K, V, S> JsonType for HashMap<K, V, S>
where
    K: JsonKey + Eq + Hash,
    V: JsonType,
    S: BuildHasher + Default + 'static,
{
    fn create_converter(resolver: &TypeResolver) -> Result<Arc<dyn Converter<Self>>, Error> {
        Ok(Arc::new(DictionaryConverter::<HashMap<K, V, S>, K, V>::new(
            resolver.get_key_converter::<K>()?,
            resolver.get_converter::<V>()?,
        )))
    }

    fn json_default() -> Option<Self> {
        Some(HashMap::default())
    }
}

impl<K, V> JsonType for BTreeMap<K, V>
where
    K: JsonKey + Ord,
    V: JsonType,
{
    fn create_converter(resolver: &TypeResolver) -> Result<Arc<dyn Converter<Self>>, Error> {
        Ok(Arc::new(DictionaryConverter::<BTreeMap<K, V>, K, V>::new(
            resolver.get_key_converter::<K>()?,
            resolver.get_converter::<V>()?,
        )))
    }

    fn json_default() -> Option<Self> {
        Some(BTreeMap::new())
    }
}
