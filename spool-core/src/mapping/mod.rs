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

//! Object mappings: which members of a type are read and written, under
//! which names, and how instances are created.

pub mod convention;
pub mod creator;
pub mod descriptor;
pub mod extension;
pub mod member;
pub mod object;
pub mod registry;

pub use convention::{
    AnonymousObjectMappingConvention, DefaultObjectMappingConvention,
    DefaultObjectMappingConventionProvider, ObjectMappingConvention,
    ObjectMappingConventionProvider, OptInObjectMappingConvention,
};
pub use creator::{CreatorArgs, CreatorFn, CreatorMapping, CreatorParameter};
pub use descriptor::{
    ConstructorDescriptor, Hooks, MemberAttributes, MemberDescriptor, MemberInfo, TypeAttributes,
    TypeDescriptor,
};
pub use extension::{ExtensionData, ExtensionDataMapping};
pub use member::{MemberConverter, MemberMapping, MemberMappingConfig, MemberMappingDyn};
pub use object::{ObjectMapping, ObjectMappingBuilder};
pub use registry::{MappingBuilder, ObjectMappingRegistry};

/// A struct read and written member by member.
///
/// Implemented by `#[derive(JsonObject)]`, which also implements
/// [`JsonType`](crate::serializer::JsonType) and
/// [`JsonPolymorphic`](crate::serializer::JsonPolymorphic) for the type.
pub trait JsonObject: Sized + 'static {
    fn descriptor() -> TypeDescriptor<Self>;
}

/// Begin/end notifications run around reading a type that declares
/// `#[json(support_initialize)]` and no explicit deserialization hooks.
pub trait SupportInitialize {
    fn begin_init(&mut self);

    fn end_init(&mut self);
}
