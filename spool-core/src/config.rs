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

use crate::util::naming::NamingPolicy;

/// Whether shared and cyclic `Rc`/`Arc` graphs are written with `$id`/`$ref` metadata.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReferenceHandling {
    /// Every visit writes the full value; a cycle is a fatal error.
    #[default]
    Off,
    /// First visit writes `$id`, later visits write `{"$ref": ..}`.
    Preserve,
}

/// What to do with a JSON property that matches no mapped member.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingMemberHandling {
    #[default]
    Ignore,
    Error,
}

/// Whether members without a setter are populated when read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReadOnlyPropertyHandling {
    /// Read-only members are skipped unless marked force-deserialize.
    #[default]
    Default,
    /// Read-only members holding a populatable value are always read.
    Read,
}

/// When a discriminator member is emitted for an object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DiscriminatorPolicy {
    /// Defer to the next level: per-type falls back to global, global means `Auto`.
    #[default]
    Default,
    /// Only when the runtime type differs from the declared type.
    Auto,
    Never,
    Always,
}

/// Configuration for spool serialization.
///
/// This struct holds the options shared by every converter built from one
/// [`crate::spool::Spool`]. It is read through the contexts during I/O and
/// never changes once the first converter has been created.
#[derive(Clone, Debug)]
pub struct Config {
    /// Naming policy applied to member names without an explicit rename.
    pub naming_policy: Option<NamingPolicy>,
    /// Naming policy applied to string dictionary keys on write.
    pub dictionary_key_policy: Option<NamingPolicy>,
    /// Match property names ignoring ASCII case when no exact match exists.
    pub case_insensitive: bool,
    /// Skip members whose value is null on write.
    pub ignore_null_values: bool,
    /// Maximum nesting of objects and arrays.
    pub max_depth: u32,
    pub reference_handling: ReferenceHandling,
    pub missing_member_handling: MissingMemberHandling,
    pub read_only_handling: ReadOnlyPropertyHandling,
    /// Registry level discriminator policy.
    pub discriminator_policy: DiscriminatorPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            naming_policy: None,
            dictionary_key_policy: None,
            case_insensitive: false,
            ignore_null_values: false,
            max_depth: 64,
            reference_handling: ReferenceHandling::Off,
            missing_member_handling: MissingMemberHandling::Ignore,
            read_only_handling: ReadOnlyPropertyHandling::Default,
            discriminator_policy: DiscriminatorPolicy::Default,
        }
    }
}

impl Config {
    /// Creates a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn naming_policy(&self) -> Option<&NamingPolicy> {
        self.naming_policy.as_ref()
    }

    #[inline(always)]
    pub fn dictionary_key_policy(&self) -> Option<&NamingPolicy> {
        self.dictionary_key_policy.as_ref()
    }

    #[inline(always)]
    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    #[inline(always)]
    pub fn is_ignore_null_values(&self) -> bool {
        self.ignore_null_values
    }

    #[inline(always)]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Check if `$id`/`$ref` reference preservation is enabled.
    #[inline(always)]
    pub fn is_preserve_references(&self) -> bool {
        self.reference_handling == ReferenceHandling::Preserve
    }

    #[inline(always)]
    pub fn is_error_on_missing_member(&self) -> bool {
        self.missing_member_handling == MissingMemberHandling::Error
    }

    #[inline(always)]
    pub fn is_read_only_read(&self) -> bool {
        self.read_only_handling == ReadOnlyPropertyHandling::Read
    }

    /// Registry level policy with `Default` resolved to `Auto`.
    #[inline(always)]
    pub fn discriminator_policy(&self) -> DiscriminatorPolicy {
        match self.discriminator_policy {
            DiscriminatorPolicy::Default => DiscriminatorPolicy::Auto,
            policy => policy,
        }
    }
}
