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

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::sync::Arc;

/// A container receiving properties that match no member of its owner.
pub trait ExtensionData: 'static {
    fn insert_value(&mut self, name: String, value: Value);

    fn for_each_value(&self, f: &mut dyn FnMut(&str, &Value));
}

impl ExtensionData for Map<String, Value> {
    fn insert_value(&mut self, name: String, value: Value) {
        self.insert(name, value);
    }

    fn for_each_value(&self, f: &mut dyn FnMut(&str, &Value)) {
        for (name, value) in self {
            f(name, value);
        }
    }
}

impl ExtensionData for BTreeMap<String, Value> {
    fn insert_value(&mut self, name: String, value: Value) {
        self.insert(name, value);
    }

    fn for_each_value(&self, f: &mut dyn FnMut(&str, &Value)) {
        for (name, value) in self {
            f(name, value);
        }
    }
}

impl<S: BuildHasher + 'static> ExtensionData for HashMap<String, Value, S> {
    fn insert_value(&mut self, name: String, value: Value) {
        self.insert(name, value);
    }

    fn for_each_value(&self, f: &mut dyn FnMut(&str, &Value)) {
        for (name, value) in self {
            f(name, value);
        }
    }
}

/// Created on the first unmatched property.
impl<E: ExtensionData + Default> ExtensionData for Option<E> {
    fn insert_value(&mut self, name: String, value: Value) {
        self.get_or_insert_with(E::default).insert_value(name, value);
    }

    fn for_each_value(&self, f: &mut dyn FnMut(&str, &Value)) {
        if let Some(data) = self {
            data.for_each_value(f);
        }
    }
}

type Insert<T> = Arc<dyn Fn(&mut T, String, Value) + Send + Sync>;
type Visit<T> = Arc<dyn Fn(&T, &mut dyn FnMut(&str, &Value)) + Send + Sync>;

/// Binding of the extension data member of `T`.
pub struct ExtensionDataMapping<T> {
    name: &'static str,
    insert: Insert<T>,
    visit: Visit<T>,
}

impl<T> Clone for ExtensionDataMapping<T> {
    fn clone(&self) -> Self {
        ExtensionDataMapping {
            name: self.name,
            insert: self.insert.clone(),
            visit: self.visit.clone(),
        }
    }
}

impl<T: 'static> ExtensionDataMapping<T> {
    pub fn new<E: ExtensionData>(
        name: &'static str,
        get: fn(&T) -> &E,
        get_mut: fn(&mut T) -> &mut E,
    ) -> ExtensionDataMapping<T> {
        ExtensionDataMapping {
            name,
            insert: Arc::new(move |target: &mut T, name: String, value: Value| {
                get_mut(target).insert_value(name, value)
            }),
            visit: Arc::new(move |source: &T, f: &mut dyn FnMut(&str, &Value)| {
                get(source).for_each_value(f)
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn insert(&self, target: &mut T, name: String, value: Value) {
        (self.insert)(target, name, value)
    }

    pub fn for_each(&self, source: &T, f: &mut dyn FnMut(&str, &Value)) {
        (self.visit)(source, f)
    }
}
