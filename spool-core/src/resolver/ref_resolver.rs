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
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::sync::Arc;

/// Outcome of offering a shared pointer to the [`RefWriter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tracked {
    /// First encounter; the value must be written with this `$id`.
    First(u32),
    /// Already written; only a `$ref` to this id is emitted.
    Seen(u32),
}

/// Reference writer for tracking shared pointers during serialization.
///
/// RefWriter maps pointer addresses to identity tokens. Ids are assigned in
/// first-visit order starting at `1`, and a pointer is registered before its
/// contents are written, so a value that reaches itself again while being
/// written produces a `$ref` instead of recursing.
///
/// Maps live for one top-level operation: [`RefWriter::enter`] and
/// [`RefWriter::exit`] bracket every root call and the maps are cleared when
/// the outermost call returns.
///
/// # Examples
///
/// ```rust
/// use spool_core::resolver::ref_resolver::{RefWriter, Tracked};
/// use std::rc::Rc;
///
/// let mut ref_writer = RefWriter::new();
/// let rc = Rc::new(42);
///
/// assert_eq!(ref_writer.track_rc(&rc), Tracked::First(1));
/// assert_eq!(ref_writer.track_rc(&rc.clone()), Tracked::Seen(1));
/// ```
#[derive(Default)]
pub struct RefWriter {
    /// Maps pointer addresses to reference ids
    refs: HashMap<usize, u32>,
    next_ref_id: u32,
    /// Pointers currently being written when references are not preserved
    visiting: HashSet<usize>,
    depth: u32,
}

impl RefWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a reference scope.
    pub fn enter(&mut self) {
        self.depth += 1;
    }

    /// Closes a reference scope, dropping every tracked pointer once the
    /// outermost scope is left.
    pub fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.clear();
        }
    }

    #[inline(always)]
    fn track_addr(&mut self, ptr_addr: usize) -> Tracked {
        if let Some(&ref_id) = self.refs.get(&ptr_addr) {
            Tracked::Seen(ref_id)
        } else {
            self.next_ref_id += 1;
            self.refs.insert(ptr_addr, self.next_ref_id);
            Tracked::First(self.next_ref_id)
        }
    }

    /// Registers an `Rc<T>` or returns the id it was registered with.
    pub fn track_rc<T: ?Sized>(&mut self, rc: &Rc<T>) -> Tracked {
        self.track_addr(Rc::as_ptr(rc) as *const () as usize)
    }

    /// Registers an `Arc<T>` or returns the id it was registered with.
    pub fn track_arc<T: ?Sized>(&mut self, arc: &Arc<T>) -> Tracked {
        self.track_addr(Arc::as_ptr(arc) as *const () as usize)
    }

    /// Marks `ptr_addr` as being written. Fails when it is already on the
    /// current path, which means the graph loops back to itself.
    pub fn begin_visit(&mut self, ptr_addr: usize, type_name: &str) -> Result<(), Error> {
        if !self.visiting.insert(ptr_addr) {
            return Err(Error::reference_loop(format!(
                "Self referencing loop detected for a value of type {type_name}; \
                 enable reference preservation to write cyclic graphs"
            )));
        }
        Ok(())
    }

    pub fn end_visit(&mut self, ptr_addr: usize) {
        self.visiting.remove(&ptr_addr);
    }

    /// Clear all stored references.
    pub fn clear(&mut self) {
        if !self.refs.is_empty() {
            log::trace!("reference scope closed, {} ids released", self.refs.len());
        }
        self.refs.clear();
        self.visiting.clear();
        self.next_ref_id = 0;
    }
}

/// Reference reader for resolving `$ref` tokens during deserialization.
///
/// Values are stored under their `$id` as soon as the containing shared
/// pointer exists, which for mutable containers is before their members are
/// read. Lookups downcast to the requested pointer type, so a token that
/// names a value of another type is reported instead of reinterpreted.
///
/// # Examples
///
/// ```rust
/// use spool_core::resolver::ref_resolver::RefReader;
/// use std::rc::Rc;
///
/// let mut ref_reader = RefReader::new();
/// let rc = Rc::new(42);
/// ref_reader.store_rc_ref("1", rc.clone()).unwrap();
///
/// let retrieved = ref_reader.get_rc_ref::<i32>("1").unwrap();
/// assert!(Rc::ptr_eq(&rc, &retrieved));
/// assert!(ref_reader.get_rc_ref::<String>("1").is_err());
/// ```
#[derive(Default)]
pub struct RefReader {
    refs: HashMap<String, Box<dyn Any>>,
    depth: u32,
}

impl RefReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self) {
        self.depth += 1;
    }

    pub fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.clear();
        }
    }

    fn store<R: 'static>(&mut self, id: &str, value: R) -> Result<(), Error> {
        if self.refs.contains_key(id) {
            return Err(Error::invalid_ref(format!(
                "Error reading object reference '{id}': the id is already defined"
            )));
        }
        self.refs.insert(id.to_string(), Box::new(value));
        Ok(())
    }

    fn get<R: Clone + 'static>(&self, id: &str) -> Result<R, Error> {
        let value = self.refs.get(id).ok_or_else(|| {
            Error::invalid_ref(format!("Could not resolve reference '{id}'"))
        })?;
        value.downcast_ref::<R>().cloned().ok_or_else(|| {
            Error::invalid_ref(format!(
                "Reference '{id}' resolves to a value that is not a {}",
                std::any::type_name::<R>()
            ))
        })
    }

    /// Store an `Rc<T>` under `id` for later `$ref` resolution.
    pub fn store_rc_ref<T: 'static>(&mut self, id: &str, rc: Rc<T>) -> Result<(), Error> {
        self.store(id, rc)
    }

    /// Store an `Arc<T>` under `id` for later `$ref` resolution.
    pub fn store_arc_ref<T: 'static>(&mut self, id: &str, arc: Arc<T>) -> Result<(), Error> {
        self.store(id, arc)
    }

    pub fn get_rc_ref<T: 'static>(&self, id: &str) -> Result<Rc<T>, Error> {
        self.get::<Rc<T>>(id)
    }

    pub fn get_arc_ref<T: 'static>(&self, id: &str) -> Result<Arc<T>, Error> {
        self.get::<Arc<T>>(id)
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn clear(&mut self) {
        self.refs.clear();
    }
}
