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

use super::{DefaultDiscriminatorConvention, DiscriminatorConvention, DiscriminatorTypeInfo};
use crate::error::Error;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

type Binding = Option<Arc<dyn DiscriminatorConvention>>;

/// Ordered discriminator conventions and the memoized binding of each type.
pub struct DiscriminatorConventionRegistry {
    conventions: Vec<Arc<dyn DiscriminatorConvention>>,
    bindings: RwLock<HashMap<TypeId, Binding>>,
}

impl Default for DiscriminatorConventionRegistry {
    fn default() -> Self {
        DiscriminatorConventionRegistry {
            conventions: vec![Arc::new(DefaultDiscriminatorConvention::default())],
            bindings: RwLock::new(HashMap::new()),
        }
    }
}

impl DiscriminatorConventionRegistry {
    pub(crate) fn register_convention(&mut self, convention: Arc<dyn DiscriminatorConvention>) {
        self.conventions.push(convention);
    }

    pub(crate) fn reset(&mut self) {
        self.bindings
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// The convention bound to the type, binding it on first request.
    pub fn convention_for(&self, info: &DiscriminatorTypeInfo) -> Result<Binding, Error> {
        if let Some(binding) = self.get_convention(info.type_id) {
            return Ok(binding);
        }
        let mut claimed = None;
        for convention in self.conventions.iter().rev() {
            if convention.try_register_type(info)? {
                claimed = Some(convention.clone());
                break;
            }
        }
        if let Some(convention) = &claimed {
            log::debug!(
                "{} bound to discriminator member {}",
                info.type_name,
                convention.member_name()
            );
        }
        let mut bindings = self.bindings.write().unwrap_or_else(PoisonError::into_inner);
        Ok(bindings.entry(info.type_id).or_insert(claimed).clone())
    }

    /// The binding of a type already looked up through
    /// [`DiscriminatorConventionRegistry::convention_for`].
    pub fn get_convention(&self, type_id: TypeId) -> Option<Binding> {
        self.bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .cloned()
    }
}
