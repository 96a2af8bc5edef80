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

//! Polymorphic values: a closed set of variant types selected on read by a
//! discriminator member.
//!
//! A union is an enum deriving `JsonUnion` whose variants each wrap one
//! [`JsonPolymorphic`] type: a mapped object, or another union. Every
//! concrete object reachable through the variants is a leaf; the
//! discriminator convention bound to the leaf names it on the wire.
//!
//! The discriminator does not have to be the first member. When it is not,
//! the members are scanned ahead until it is found and the reader is then
//! rewound to the start of the object.

use crate::buffer::Token;
use crate::discriminator::DiscriminatorConvention;
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::type_resolver::TypeResolver;
use crate::serializer::{with_write_depth, Converter, JsonType};
use crate::types::Shape;
use std::any::TypeId;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

/// A concrete type a polymorphic value may hold at runtime.
#[derive(Clone)]
pub struct LeafType {
    pub type_id: TypeId,
    pub type_name: &'static str,
    /// Convention that writes and recognizes the leaf's discriminator.
    pub convention: Option<Arc<dyn DiscriminatorConvention>>,
}

/// Converter side of [`JsonPolymorphic`].
pub trait PolymorphicConverter<T>: Send + Sync {
    fn leaf_types(&self, resolver: &TypeResolver) -> Result<Vec<LeafType>, Error>;

    /// Reads the members of the object whose opening brace was consumed as
    /// the given leaf, or as the default when no discriminator was found.
    fn read_members_as(&self, leaf: Option<TypeId>, context: &mut ReadContext) -> Result<T, Error>;

    /// Writes the members, discriminator included when the policy allows it.
    fn write_members_polymorphic(&self, value: &T, context: &mut WriteContext) -> Result<(), Error>;
}

/// Types usable as union variants.
pub trait JsonPolymorphic: JsonType {
    fn polymorphic_converter(
        resolver: &TypeResolver,
    ) -> Result<Arc<dyn PolymorphicConverter<Self>>, Error>;
}

/// An enum whose variants each wrap one polymorphic type.
///
/// Implemented by `#[derive(JsonUnion)]`.
pub trait JsonUnion: Sized + 'static {
    fn union_name() -> &'static str;

    fn variants() -> Vec<UnionVariant<Self>>;
}

trait VariantConverter<U>: Send + Sync {
    fn leaf_types(&self, resolver: &TypeResolver) -> Result<Vec<LeafType>, Error>;

    fn read_as(&self, leaf: Option<TypeId>, context: &mut ReadContext) -> Result<U, Error>;

    /// Writes `value` when it holds this variant. Returns `false` otherwise.
    fn write(&self, value: &U, context: &mut WriteContext) -> Result<bool, Error>;
}

struct TypedVariant<U, V> {
    inner: Arc<dyn PolymorphicConverter<V>>,
    wrap: fn(V) -> U,
    unwrap: fn(&U) -> Option<&V>,
}

impl<U: 'static, V: 'static> VariantConverter<U> for TypedVariant<U, V> {
    fn leaf_types(&self, resolver: &TypeResolver) -> Result<Vec<LeafType>, Error> {
        self.inner.leaf_types(resolver)
    }

    fn read_as(&self, leaf: Option<TypeId>, context: &mut ReadContext) -> Result<U, Error> {
        self.inner.read_members_as(leaf, context).map(self.wrap)
    }

    fn write(&self, value: &U, context: &mut WriteContext) -> Result<bool, Error> {
        match (self.unwrap)(value) {
            Some(inner) => {
                self.inner.write_members_polymorphic(inner, context)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

type VariantFactory<U> =
    Box<dyn Fn(&TypeResolver) -> Result<Box<dyn VariantConverter<U>>, Error> + Send + Sync>;

pub struct UnionVariant<U> {
    name: &'static str,
    is_default: bool,
    factory: VariantFactory<U>,
}

impl<U: 'static> UnionVariant<U> {
    pub fn new<V: JsonPolymorphic>(
        name: &'static str,
        wrap: fn(V) -> U,
        unwrap: fn(&U) -> Option<&V>,
    ) -> UnionVariant<U> {
        UnionVariant {
            name,
            is_default: false,
            factory: Box::new(move |resolver: &TypeResolver| {
                let inner = V::polymorphic_converter(resolver)?;
                Ok(Box::new(TypedVariant {
                    inner,
                    wrap,
                    unwrap,
                }) as Box<dyn VariantConverter<U>>)
            }),
        }
    }

    /// Marks the variant read when an object carries no discriminator.
    pub fn default_variant(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }
}

/// Conventions sharing one discriminator member name.
struct DiscriminatorSlot {
    name: Vec<u8>,
    conventions: Vec<Arc<dyn DiscriminatorConvention>>,
}

struct CompiledUnion<U> {
    variants: Vec<Box<dyn VariantConverter<U>>>,
    leaves: Vec<LeafType>,
    leaf_variants: HashMap<TypeId, usize>,
    slots: Vec<DiscriminatorSlot>,
    default_variant: Option<usize>,
}

impl<U> CompiledUnion<U> {
    fn slot(&self, name: &[u8]) -> Option<&DiscriminatorSlot> {
        self.slots.iter().find(|slot| slot.name == name)
    }

    /// Reads the discriminator value following its property name.
    fn read_leaf(
        &self,
        slot: &DiscriminatorSlot,
        context: &mut ReadContext,
    ) -> Result<TypeId, Error> {
        if context.reader.peek()? != Token::String && context.reader.peek()? != Token::Number {
            return Err(Error::unknown_discriminator(format!(
                "discriminator {} must be a string or a number",
                String::from_utf8_lossy(&slot.name)
            )));
        }
        let mut last = None;
        for convention in &slot.conventions {
            let checkpoint = context.reader.checkpoint();
            match convention.read_discriminator(&mut context.reader) {
                Ok(type_id) => return Ok(type_id),
                Err(err) => {
                    context.reader.restore(checkpoint);
                    last = Some(err);
                }
            }
        }
        Err(last.unwrap_or_else(|| Error::unknown_discriminator("no discriminator convention")))
    }

    /// Finds the leaf named by the discriminator, leaving the reader at the
    /// first member of the object.
    fn find_leaf(&self, context: &mut ReadContext) -> Result<Option<TypeId>, Error> {
        if let Some(name) = context.reader.peek_property_name()? {
            if let Some(slot) = self.slot(&name) {
                context.reader.read_property_name()?;
                return self.read_leaf(slot, context).map(Some);
            }
        }
        let checkpoint = context.reader.checkpoint();
        let mut leaf = None;
        while let Some(name) = context.reader.read_property_name()? {
            if let Some(slot) = self.slot(&name) {
                leaf = Some(self.read_leaf(slot, context)?);
                break;
            }
            context.reader.skip_value()?;
        }
        context.reader.restore(checkpoint);
        Ok(leaf)
    }

    fn dispatch(
        &self,
        leaf: Option<TypeId>,
        union_name: &str,
        context: &mut ReadContext,
    ) -> Result<U, Error> {
        match leaf {
            Some(leaf) => {
                let variant = self.leaf_variants.get(&leaf).ok_or_else(|| {
                    Error::unknown_discriminator(format!(
                        "discriminator does not denote a variant of {union_name}"
                    ))
                })?;
                self.variants[*variant].read_as(Some(leaf), context)
            }
            None => match self.default_variant {
                Some(variant) => self.variants[variant].read_as(None, context),
                None => Err(Error::unknown_discriminator(format!(
                    "object has no discriminator and {union_name} has no default variant"
                ))),
            },
        }
    }
}

/// Converter of a [`JsonUnion`], compiled on first use.
pub struct UnionConverter<U> {
    compiled: OnceLock<CompiledUnion<U>>,
    _marker: PhantomData<fn() -> U>,
}

impl<U: JsonUnion> Default for UnionConverter<U> {
    fn default() -> Self {
        UnionConverter::new()
    }
}

impl<U: JsonUnion> UnionConverter<U> {
    pub fn new() -> UnionConverter<U> {
        UnionConverter {
            compiled: OnceLock::new(),
            _marker: PhantomData,
        }
    }

    fn compiled(&self, resolver: &TypeResolver) -> Result<&CompiledUnion<U>, Error> {
        if let Some(compiled) = self.compiled.get() {
            return Ok(compiled);
        }
        let compiled = Self::compile(resolver)?;
        let _ = self.compiled.set(compiled);
        self.compiled
            .get()
            .ok_or_else(|| Error::unknown("union converter was not compiled"))
    }

    pub fn ensure_compiled(&self, resolver: &TypeResolver) -> Result<(), Error> {
        self.compiled(resolver).map(|_| ())
    }

    fn compile(resolver: &TypeResolver) -> Result<CompiledUnion<U>, Error> {
        let union_name = U::union_name();
        let mut variants = Vec::new();
        let mut leaves = Vec::new();
        let mut leaf_variants = HashMap::new();
        let mut slots: Vec<DiscriminatorSlot> = Vec::new();
        let mut default_variant = None;
        for (index, variant) in U::variants().into_iter().enumerate() {
            if variant.is_default {
                if default_variant.is_some() {
                    return Err(Error::config(format!(
                        "{union_name} declares more than one default variant"
                    )));
                }
                default_variant = Some(index);
            }
            let converter = (variant.factory)(resolver).map_err(|e| e.with_member(variant.name))?;
            for leaf in converter.leaf_types(resolver)? {
                if leaf_variants.insert(leaf.type_id, index).is_some() {
                    return Err(Error::config(format!(
                        "{} appears in more than one variant of {union_name}",
                        leaf.type_name
                    )));
                }
                if let Some(convention) = &leaf.convention {
                    let name = convention.member_name().as_bytes();
                    match slots.iter_mut().find(|slot| slot.name == name) {
                        Some(slot) => {
                            if !slot.conventions.iter().any(|c| Arc::ptr_eq(c, convention)) {
                                slot.conventions.push(convention.clone());
                            }
                        }
                        None => slots.push(DiscriminatorSlot {
                            name: name.to_vec(),
                            conventions: vec![convention.clone()],
                        }),
                    }
                } else if default_variant != Some(index) {
                    log::warn!(
                        "{} in {union_name} has no discriminator and can only be read as the default",
                        leaf.type_name
                    );
                }
                leaves.push(leaf);
            }
            variants.push(converter);
        }
        log::debug!(
            "compiled union {union_name} with {} variants and {} leaves",
            variants.len(),
            leaves.len()
        );
        Ok(CompiledUnion {
            variants,
            leaves,
            leaf_variants,
            slots,
            default_variant,
        })
    }

    fn read_body(&self, context: &mut ReadContext) -> Result<U, Error> {
        let compiled = self.compiled(context.type_resolver())?;
        let leaf = compiled.find_leaf(context)?;
        compiled.dispatch(leaf, U::union_name(), context)
    }

    fn write_body(&self, value: &U, context: &mut WriteContext) -> Result<(), Error> {
        let compiled = self.compiled(context.type_resolver())?;
        for variant in &compiled.variants {
            if variant.write(value, context)? {
                return Ok(());
            }
        }
        Err(Error::not_allowed(format!(
            "value of {} matches none of its variants",
            U::union_name()
        )))
    }
}

impl<U: JsonUnion> Converter<U> for UnionConverter<U> {
    fn read(&self, context: &mut ReadContext) -> Result<U, Error> {
        let token = context.reader.peek()?;
        if token != Token::StartObject {
            return Err(Error::type_error(format!(
                "expected an object for {} but found {}",
                U::union_name(),
                token.name()
            )));
        }
        context.reader.read_start_object()?;
        self.read_members(context)
    }

    fn write(&self, value: &U, context: &mut WriteContext) -> Result<(), Error> {
        with_write_depth(context, |context| {
            context.writer.write_start_object();
            self.write_body(value, context)?;
            context.writer.write_end_object();
            Ok(())
        })
    }

    #[inline(always)]
    fn shape(&self) -> Shape {
        Shape::Object
    }

    fn read_members(&self, context: &mut ReadContext) -> Result<U, Error> {
        self.read_body(context)
    }

    fn write_members(&self, value: &U, context: &mut WriteContext) -> Result<(), Error> {
        self.write_body(value, context)
    }
}

impl<U: JsonUnion> PolymorphicConverter<U> for UnionConverter<U> {
    fn leaf_types(&self, resolver: &TypeResolver) -> Result<Vec<LeafType>, Error> {
        Ok(self.compiled(resolver)?.leaves.clone())
    }

    fn read_members_as(&self, leaf: Option<TypeId>, context: &mut ReadContext) -> Result<U, Error> {
        let compiled = self.compiled(context.type_resolver())?;
        compiled.dispatch(leaf, U::union_name(), context)
    }

    fn write_members_polymorphic(&self, value: &U, context: &mut WriteContext) -> Result<(), Error> {
        self.write_body(value, context)
    }
}
