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

mod test_helpers;

use spool::{Error, JsonObject, Spool};
use spool_core::mapping::{
    ObjectMappingBuilder, ObjectMappingConvention, ObjectMappingConventionProvider,
    TypeAttributes,
};
use std::any::TypeId;
use std::sync::Arc;
use test_helpers::{assert_json, init_logger};

#[derive(JsonObject, Debug, Default, PartialEq)]
#[json(default, opt_in)]
pub struct Contract {
    #[json(include)]
    pub id: u32,
    pub cache_key: String,
    #[json(include, rename = "secret")]
    token: String,
}

impl Contract {
    fn token(&self) -> &str {
        &self.token
    }
}

#[test]
fn test_opt_in_maps_only_included_members() {
    init_logger();
    let spool = Spool::default();
    let contract = Contract {
        id: 3,
        cache_key: "k".to_string(),
        token: "t".to_string(),
    };
    assert_json(&spool, &contract, r#"{"id":3,"secret":"t"}"#);

    let read: Contract = spool
        .deserialize_str(r#"{"id":4,"cache_key":"ignored","secret":"s"}"#)
        .unwrap();
    assert_eq!(read.id, 4);
    assert_eq!(read.cache_key, "");
    assert_eq!(read.token(), "s");
}

#[derive(JsonObject, Debug, Default, PartialEq)]
#[json(default)]
pub struct Legacy {
    pub code: String,
    count: u32,
}

impl Legacy {
    fn count(&self) -> u32 {
        self.count
    }
}

/// Maps every member, private ones included, under an upper-case name.
struct ShoutingConvention;

impl ObjectMappingConvention for ShoutingConvention {
    fn apply(&self, mapping: &mut dyn ObjectMappingBuilder) -> Result<(), Error> {
        for info in mapping.member_infos() {
            let member = mapping.map_member(info.name)?;
            member.set_name(&info.name.to_uppercase());
        }
        Ok(())
    }
}

struct LegacyProvider;

impl ObjectMappingConventionProvider for LegacyProvider {
    fn get_convention(
        &self,
        type_id: TypeId,
        _attributes: &TypeAttributes,
    ) -> Option<Arc<dyn ObjectMappingConvention>> {
        if type_id == TypeId::of::<Legacy>() {
            Some(Arc::new(ShoutingConvention))
        } else {
            None
        }
    }
}

#[test]
fn test_custom_convention_provider() {
    init_logger();
    let mut spool = Spool::default();
    spool
        .register_convention_provider(Arc::new(LegacyProvider))
        .unwrap();

    let legacy: Legacy = spool
        .deserialize_str(r#"{"CODE":"x1","COUNT":9}"#)
        .unwrap();
    assert_eq!(legacy.code, "x1");
    assert_eq!(legacy.count(), 9);
    assert_json(&spool, &legacy, r#"{"CODE":"x1","COUNT":9}"#);

    // other types still use the default convention
    let contract: Contract = spool.deserialize_str(r#"{"id":1}"#).unwrap();
    assert_eq!(contract.id, 1);
}

#[test]
fn test_provider_chain_declines_to_none() {
    init_logger();
    struct Nothing;

    impl ObjectMappingConventionProvider for Nothing {
        fn get_convention(
            &self,
            _type_id: TypeId,
            _attributes: &TypeAttributes,
        ) -> Option<Arc<dyn ObjectMappingConvention>> {
            None
        }
    }

    let mut spool = Spool::default();
    spool.register_convention_provider(Arc::new(Nothing)).unwrap();
    // declining falls through to the built-in provider
    let legacy: Legacy = spool.deserialize_str(r#"{"code":"a","count":2}"#).unwrap();
    assert_eq!(legacy.code, "a");
    assert_eq!(legacy.count(), 0);
}
