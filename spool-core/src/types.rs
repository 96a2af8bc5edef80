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

/// Reserved property name carrying the identity token of a preserved value.
pub const ID_PROPERTY: &[u8] = b"$id";
/// Reserved property name referencing a previously written identity token.
pub const REF_PROPERTY: &[u8] = b"$ref";
/// Reserved property name wrapping the elements of a preserved array.
pub const VALUES_PROPERTY: &[u8] = b"$values";
/// Default discriminator member name.
pub const TYPE_PROPERTY: &str = "$type";

/// JSON shape a converter produces.
///
/// Identity wrappers use it to decide where `$id` goes: objects get it as a
/// leading member, arrays are wrapped into `{"$id": .., "$values": [..]}` and
/// scalars never carry an identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Value,
    Object,
    Array,
}

/// Presence and nullability rule checked for a member while reading.
///
/// | policy         | absent | null  | value |
/// |----------------|--------|-------|-------|
/// | `Never`        | ok     | ok    | ok    |
/// | `Always`       | error  | error | ok    |
/// | `AllowNull`    | error  | ok    | ok    |
/// | `DisallowNull` | ok     | error | ok    |
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequirementPolicy {
    #[default]
    Never,
    Always,
    AllowNull,
    DisallowNull,
}

impl RequirementPolicy {
    #[inline(always)]
    pub fn requires_presence(self) -> bool {
        matches!(self, RequirementPolicy::Always | RequirementPolicy::AllowNull)
    }

    #[inline(always)]
    pub fn disallows_null(self) -> bool {
        matches!(
            self,
            RequirementPolicy::Always | RequirementPolicy::DisallowNull
        )
    }

    pub fn from_name(name: &str) -> Option<RequirementPolicy> {
        match name {
            "never" => Some(RequirementPolicy::Never),
            "always" => Some(RequirementPolicy::Always),
            "allow_null" => Some(RequirementPolicy::AllowNull),
            "disallow_null" => Some(RequirementPolicy::DisallowNull),
            _ => None,
        }
    }
}

/// How a member is stored on its owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberKind {
    /// A struct field, readable and writable in place.
    Field,
    /// A getter with an optional setter, without addressable storage.
    Property,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}
