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
use crate::config::{
    Config, DiscriminatorPolicy, MissingMemberHandling, ReadOnlyPropertyHandling,
    ReferenceHandling,
};
use crate::discriminator::DiscriminatorConvention;
use crate::error::Error;
use crate::mapping::{JsonObject, ObjectMapping, ObjectMappingConventionProvider};
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::type_resolver::{ConverterFactory, TypeResolver};
use crate::serializer::key::DictionaryKeyConverter;
use crate::serializer::union::JsonUnion;
use crate::serializer::{Converter, JsonType};
use crate::util::NamingPolicy;
use std::sync::Arc;

/// The entry point of spool: configuration, registrations and the caches of
/// everything built from them.
///
/// Options are set with chained consuming setters. Registrations take
/// `&mut self`; serialization and deserialization take `&self`, so a
/// configured `Spool` can be shared between threads.
///
/// # Examples
///
/// ```rust
/// use spool_core::config::ReferenceHandling;
/// use spool_core::util::NamingPolicy;
/// use spool_core::Spool;
///
/// let spool = Spool::default()
///     .naming_policy(NamingPolicy::CamelCase)
///     .reference_handling(ReferenceHandling::Preserve)
///     .max_depth(32);
///
/// let json = spool.serialize_to_string(&vec![1u8, 2, 3]).unwrap();
/// assert_eq!(json, "[1,2,3]");
/// let back: Vec<u8> = spool.deserialize_str(&json).unwrap();
/// assert_eq!(back, vec![1, 2, 3]);
/// ```
#[derive(Default)]
pub struct Spool {
    type_resolver: TypeResolver,
}

impl Spool {
    pub fn with_config(config: Config) -> Spool {
        Spool {
            type_resolver: TypeResolver::new(config),
        }
    }

    /// Naming policy for members without an explicit name.
    pub fn naming_policy(mut self, policy: NamingPolicy) -> Self {
        self.type_resolver.config_mut().naming_policy = Some(policy);
        self
    }

    /// Naming policy for string dictionary keys on write.
    pub fn dictionary_key_policy(mut self, policy: NamingPolicy) -> Self {
        self.type_resolver.config_mut().dictionary_key_policy = Some(policy);
        self
    }

    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.type_resolver.config_mut().case_insensitive = case_insensitive;
        self
    }

    pub fn ignore_null_values(mut self, ignore: bool) -> Self {
        self.type_resolver.config_mut().ignore_null_values = ignore;
        self
    }

    /// Sets the maximum nesting of objects and arrays, 64 by default.
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.type_resolver.config_mut().max_depth = max_depth;
        self
    }

    /// Whether shared pointers are written with `$id`/`$ref` metadata.
    ///
    /// ```rust
    /// use spool_core::config::ReferenceHandling;
    /// use spool_core::Spool;
    /// use std::rc::Rc;
    ///
    /// let spool = Spool::default().reference_handling(ReferenceHandling::Preserve);
    /// let shared = Rc::new(vec![1]);
    /// let json = spool.serialize_to_string(&vec![shared.clone(), shared]).unwrap();
    /// assert_eq!(json, r#"[{"$id":"1","$values":[1]},{"$ref":"1"}]"#);
    /// ```
    pub fn reference_handling(mut self, handling: ReferenceHandling) -> Self {
        self.type_resolver.config_mut().reference_handling = handling;
        self
    }

    pub fn missing_member_handling(mut self, handling: MissingMemberHandling) -> Self {
        self.type_resolver.config_mut().missing_member_handling = handling;
        self
    }

    pub fn read_only_handling(mut self, handling: ReadOnlyPropertyHandling) -> Self {
        self.type_resolver.config_mut().read_only_handling = handling;
        self
    }

    /// Registry level discriminator policy, applied to types that do not
    /// declare their own.
    pub fn discriminator_policy(mut self, policy: DiscriminatorPolicy) -> Self {
        self.type_resolver.config_mut().discriminator_policy = policy;
        self
    }

    #[inline(always)]
    pub fn config(&self) -> &Config {
        self.type_resolver.config()
    }

    #[inline(always)]
    pub fn get_type_resolver(&self) -> &TypeResolver {
        &self.type_resolver
    }

    /// Builds the mapping and converter of `T` now, so mapping errors are
    /// reported here instead of at the first read or write.
    pub fn register<T: JsonObject>(&mut self) -> Result<(), Error> {
        let converter = self.type_resolver.object_converter::<T>()?;
        converter.ensure_compiled(&self.type_resolver)
    }

    /// Replaces the automatic mapping of `T` with `builder`, which starts
    /// from an empty mapping. Call [`ObjectMapping::auto_map`] in the builder
    /// to start from the convention instead.
    pub fn register_mapping<T, F>(&mut self, builder: F) -> Result<(), Error>
    where
        T: JsonObject,
        F: Fn(&mut ObjectMapping<T>) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.type_resolver
            .mappings_mut()
            .register::<T>(Arc::new(builder));
        self.register::<T>()
    }

    /// Binds every variant of `U` to its discriminator convention.
    pub fn register_union<U: JsonUnion>(&mut self) -> Result<(), Error> {
        let converter = self.type_resolver.union_converter::<U>()?;
        converter.ensure_compiled(&self.type_resolver)
    }

    /// Uses `converter` for `T` everywhere, instead of what `T` resolves to.
    pub fn register_converter<T: JsonType>(
        &mut self,
        converter: Arc<dyn Converter<T>>,
    ) -> Result<(), Error> {
        self.type_resolver.register_converter::<T>(converter);
        Ok(())
    }

    pub fn register_converter_factory(
        &mut self,
        factory: Arc<dyn ConverterFactory>,
    ) -> Result<(), Error> {
        self.type_resolver.register_converter_factory(factory);
        Ok(())
    }

    /// Adds a convention provider, consulted before the ones registered
    /// earlier.
    pub fn register_convention_provider(
        &mut self,
        provider: Arc<dyn ObjectMappingConventionProvider>,
    ) -> Result<(), Error> {
        self.type_resolver
            .mappings_mut()
            .register_convention_provider(provider);
        Ok(())
    }

    /// Adds a discriminator convention, tried before the ones registered
    /// earlier when a type is bound.
    pub fn register_discriminator_convention(
        &mut self,
        convention: Arc<dyn DiscriminatorConvention>,
    ) -> Result<(), Error> {
        self.type_resolver
            .discriminators_mut()
            .register_convention(convention);
        Ok(())
    }

    pub fn register_key_converter<K: 'static>(
        &mut self,
        converter: Arc<dyn DictionaryKeyConverter<K>>,
    ) -> Result<(), Error> {
        self.type_resolver.register_key_converter::<K>(converter);
        Ok(())
    }

    pub fn serialize<T: JsonType>(&self, value: &T) -> Result<Vec<u8>, Error> {
        let mut writer = Writer::default();
        let mut context = WriteContext::new(self, &mut writer);
        self.serialize_with_context(value, &mut context)?;
        Ok(writer.into_bytes())
    }

    pub fn serialize_to_string<T: JsonType>(&self, value: &T) -> Result<String, Error> {
        let bytes = self.serialize(value)?;
        String::from_utf8(bytes).map_err(|e| Error::unknown(e.to_string()))
    }

    /// Writes `value` into the writer of `context`. Pointers met in one call
    /// are only tracked for that call.
    pub fn serialize_with_context<T: JsonType>(
        &self,
        value: &T,
        context: &mut WriteContext,
    ) -> Result<(), Error> {
        context.ref_writer.enter();
        let result = context.write_value(value);
        context.ref_writer.exit();
        result
    }

    pub fn deserialize<T: JsonType>(&self, bf: &[u8]) -> Result<T, Error> {
        let mut context = ReadContext::new(self, Reader::new(bf));
        let value = self.deserialize_with_context(&mut context)?;
        context.reader.finish()?;
        Ok(value)
    }

    pub fn deserialize_str<T: JsonType>(&self, json: &str) -> Result<T, Error> {
        self.deserialize(json.as_bytes())
    }

    /// Reads the next value from the reader of `context`.
    pub fn deserialize_with_context<T: JsonType>(
        &self,
        context: &mut ReadContext,
    ) -> Result<T, Error> {
        context.ref_reader.enter();
        let result = context.read_value::<T>();
        context.ref_reader.exit();
        result
    }
}
