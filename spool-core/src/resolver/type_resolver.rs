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

use crate::config::Config;
use crate::discriminator::DiscriminatorConventionRegistry;
use crate::error::Error;
use crate::mapping::{JsonObject, ObjectMappingRegistry};
use crate::serializer::key::{DictionaryKeyConverter, JsonKey};
use crate::serializer::union::JsonUnion;
use crate::serializer::{Converter, JsonType, ObjectConverter, UnionConverter};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Builds converters for types it claims, keyed by runtime type id.
///
/// `create_converter` must return an `Arc<dyn Converter<T>>` boxed as `Any`
/// for the `T` whose id it was asked about; anything else is reported as a
/// configuration error when the converter is first requested.
pub trait ConverterFactory: Send + Sync {
    fn can_convert(&self, type_id: TypeId) -> bool;

    fn create_converter(
        &self,
        type_id: TypeId,
        resolver: &TypeResolver,
    ) -> Result<Box<dyn Any + Send + Sync>, Error>;
}

enum CustomConverter {
    Typed(TypeId, Box<dyn Any + Send + Sync>),
    Factory(Arc<dyn ConverterFactory>),
}

/// Lazily filled map from `TypeId` to a shared value of a per-type type.
///
/// Values are built without holding the lock and inserted if absent, so a
/// builder may reenter the cache for other types and concurrent builders of
/// the same type converge on the first inserted value.
pub(crate) struct TypeCache {
    entries: RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl Default for TypeCache {
    fn default() -> Self {
        TypeCache {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl TypeCache {
    pub(crate) fn get<V: Clone + 'static>(&self, type_id: TypeId) -> Option<V> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&type_id)
            .and_then(|entry| entry.downcast_ref::<V>())
            .cloned()
    }

    pub(crate) fn insert_if_absent<V: Clone + Send + Sync + 'static>(
        &self,
        type_id: TypeId,
        value: V,
    ) -> V {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entry = entries
            .entry(type_id)
            .or_insert_with(|| Box::new(value.clone()));
        entry.downcast_ref::<V>().cloned().unwrap_or(value)
    }

    pub(crate) fn get_or_try_insert<V, F>(&self, type_id: TypeId, build: F) -> Result<V, Error>
    where
        V: Clone + Send + Sync + 'static,
        F: FnOnce() -> Result<V, Error>,
    {
        if let Some(value) = self.get::<V>(type_id) {
            return Ok(value);
        }
        let value = build()?;
        Ok(self.insert_if_absent(type_id, value))
    }

    pub(crate) fn clear(&mut self) {
        self.entries
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Resolves and caches the converter of every type spool touches.
///
/// Lookup order for a type `T`:
/// 1. the cache,
/// 2. custom converters and converter factories, in registration order,
/// 3. the converter `T` declares through [`JsonType`].
pub struct TypeResolver {
    config: Config,
    custom_converters: Vec<CustomConverter>,
    custom_key_converters: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    converters: TypeCache,
    key_converters: TypeCache,
    objects: TypeCache,
    unions: TypeCache,
    mappings: ObjectMappingRegistry,
    discriminators: DiscriminatorConventionRegistry,
}

impl Default for TypeResolver {
    fn default() -> Self {
        TypeResolver::new(Config::default())
    }
}

impl TypeResolver {
    pub fn new(config: Config) -> TypeResolver {
        TypeResolver {
            config,
            custom_converters: Vec::new(),
            custom_key_converters: HashMap::new(),
            converters: TypeCache::default(),
            key_converters: TypeCache::default(),
            objects: TypeCache::default(),
            unions: TypeCache::default(),
            mappings: ObjectMappingRegistry::default(),
            discriminators: DiscriminatorConventionRegistry::default(),
        }
    }

    #[inline(always)]
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn mappings(&self) -> &ObjectMappingRegistry {
        &self.mappings
    }

    pub fn discriminators(&self) -> &DiscriminatorConventionRegistry {
        &self.discriminators
    }

    /// Mutable configuration. Derived converters and mappings are dropped
    /// since they may have captured the previous settings.
    pub(crate) fn config_mut(&mut self) -> &mut Config {
        self.reset_caches();
        &mut self.config
    }

    pub(crate) fn mappings_mut(&mut self) -> &mut ObjectMappingRegistry {
        self.reset_caches();
        &mut self.mappings
    }

    pub(crate) fn discriminators_mut(&mut self) -> &mut DiscriminatorConventionRegistry {
        self.reset_caches();
        &mut self.discriminators
    }

    pub(crate) fn reset_caches(&mut self) {
        self.converters.clear();
        self.key_converters.clear();
        self.objects.clear();
        self.unions.clear();
        self.mappings.reset();
        self.discriminators.reset();
    }

    pub(crate) fn register_converter<T: 'static>(&mut self, converter: Arc<dyn Converter<T>>) {
        self.reset_caches();
        self.custom_converters
            .push(CustomConverter::Typed(TypeId::of::<T>(), Box::new(converter)));
    }

    pub(crate) fn register_converter_factory(&mut self, factory: Arc<dyn ConverterFactory>) {
        self.reset_caches();
        self.custom_converters.push(CustomConverter::Factory(factory));
    }

    pub(crate) fn register_key_converter<K: 'static>(
        &mut self,
        converter: Arc<dyn DictionaryKeyConverter<K>>,
    ) {
        self.reset_caches();
        self.custom_key_converters
            .insert(TypeId::of::<K>(), Box::new(converter));
    }

    fn custom_converter<T: 'static>(&self) -> Result<Option<Arc<dyn Converter<T>>>, Error> {
        let type_id = TypeId::of::<T>();
        for custom in &self.custom_converters {
            let boxed = match custom {
                CustomConverter::Typed(id, converter) if *id == type_id => {
                    return Ok(converter.downcast_ref::<Arc<dyn Converter<T>>>().cloned());
                }
                CustomConverter::Typed(..) => continue,
                CustomConverter::Factory(factory) if factory.can_convert(type_id) => {
                    factory.create_converter(type_id, self)?
                }
                CustomConverter::Factory(_) => continue,
            };
            return match boxed.downcast::<Arc<dyn Converter<T>>>() {
                Ok(converter) => Ok(Some(*converter)),
                Err(_) => Err(Error::config(format!(
                    "converter factory claimed {} but produced a converter for another type",
                    std::any::type_name::<T>()
                ))),
            };
        }
        Ok(None)
    }

    /// The converter for `T`, built on first use.
    pub fn get_converter<T: JsonType>(&self) -> Result<Arc<dyn Converter<T>>, Error> {
        self.converters
            .get_or_try_insert(TypeId::of::<T>(), || match self.custom_converter::<T>()? {
                Some(converter) => Ok(converter),
                None => {
                    log::debug!("creating converter for {}", std::any::type_name::<T>());
                    T::create_converter(self)
                }
            })
    }

    /// The shared object converter of a mapped type. Custom converters do not
    /// apply here; this is what the type itself resolves to.
    pub fn object_converter<T: JsonObject>(&self) -> Result<Arc<ObjectConverter<T>>, Error> {
        self.objects.get_or_try_insert(TypeId::of::<T>(), || {
            Ok(Arc::new(ObjectConverter::<T>::new()))
        })
    }

    pub fn union_converter<U: JsonUnion>(&self) -> Result<Arc<UnionConverter<U>>, Error> {
        self.unions.get_or_try_insert(TypeId::of::<U>(), || {
            Ok(Arc::new(UnionConverter::<U>::new()))
        })
    }

    pub fn get_key_converter<K: JsonKey>(&self) -> Result<Arc<dyn DictionaryKeyConverter<K>>, Error> {
        let type_id = TypeId::of::<K>();
        self.key_converters.get_or_try_insert(type_id, || {
            match self.custom_key_converters.get(&type_id) {
                Some(custom) => custom
                    .downcast_ref::<Arc<dyn DictionaryKeyConverter<K>>>()
                    .cloned()
                    .ok_or_else(|| {
                        Error::config(format!(
                            "key converter registered for {} has another key type",
                            std::any::type_name::<K>()
                        ))
                    }),
                None => K::create_key_converter(self),
            }
        })
    }
}
