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
use crate::error::Error;
use crate::mapping::convention::{
    DefaultObjectMappingConventionProvider, ObjectMappingConvention, ObjectMappingConventionProvider,
};
use crate::mapping::descriptor::TypeAttributes;
use crate::mapping::object::ObjectMapping;
use crate::mapping::JsonObject;
use crate::resolver::type_resolver::TypeCache;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Programmatic mapping of one type, run instead of its convention.
pub type MappingBuilder<T> = Arc<dyn Fn(&mut ObjectMapping<T>) -> Result<(), Error> + Send + Sync>;

/// Holds the object mapping of every type, built lazily on first lookup.
pub struct ObjectMappingRegistry {
    builders: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    providers: Vec<Arc<dyn ObjectMappingConventionProvider>>,
    mappings: TypeCache,
}

impl Default for ObjectMappingRegistry {
    fn default() -> Self {
        ObjectMappingRegistry {
            builders: HashMap::new(),
            providers: vec![Arc::new(DefaultObjectMappingConventionProvider)],
            mappings: TypeCache::default(),
        }
    }
}

impl ObjectMappingRegistry {
    pub(crate) fn register<T: JsonObject>(&mut self, builder: MappingBuilder<T>) {
        self.builders.insert(TypeId::of::<T>(), Box::new(builder));
    }

    pub(crate) fn register_convention_provider(
        &mut self,
        provider: Arc<dyn ObjectMappingConventionProvider>,
    ) {
        self.providers.push(provider);
    }

    pub(crate) fn reset(&mut self) {
        self.mappings.clear();
    }

    fn convention_for(
        &self,
        type_id: TypeId,
        attributes: &TypeAttributes,
        type_name: &str,
    ) -> Result<Arc<dyn ObjectMappingConvention>, Error> {
        self.providers
            .iter()
            .rev()
            .find_map(|provider| provider.get_convention(type_id, attributes))
            .ok_or_else(|| {
                Error::config(format!("no object mapping convention applies to {type_name}"))
            })
    }

    /// The initialized mapping of `T`.
    pub fn lookup<T: JsonObject>(&self, config: &Config) -> Result<Arc<ObjectMapping<T>>, Error> {
        let type_id = TypeId::of::<T>();
        self.mappings.get_or_try_insert(type_id, || {
            let descriptor = T::descriptor();
            let type_name = descriptor.name;
            let convention = self.convention_for(type_id, &descriptor.attributes, type_name)?;
            let mut mapping =
                ObjectMapping::new(descriptor, config.naming_policy().copied(), convention);
            let builder = self
                .builders
                .get(&type_id)
                .and_then(|builder| builder.downcast_ref::<MappingBuilder<T>>());
            match builder {
                Some(builder) => builder(&mut mapping)?,
                None => {
                    mapping.auto_map()?;
                }
            }
            mapping
                .initialize()
                .map_err(|e| Error::config(format!("invalid mapping of {type_name}: {e}")))?;
            log::debug!(
                "mapped {type_name} with {} members{}",
                mapping.members().len(),
                if mapping.creator().is_some() {
                    " and a creator"
                } else {
                    ""
                }
            );
            Ok(Arc::new(mapping))
        })
    }
}
