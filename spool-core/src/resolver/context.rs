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
use crate::config::Config;
use crate::error::Error;
use crate::resolver::ref_resolver::{RefReader, RefWriter};
use crate::resolver::type_resolver::TypeResolver;
use crate::serializer::JsonType;
use crate::spool::Spool;
use serde_json::Value;

pub struct WriteContext<'se> {
    pub writer: &'se mut Writer,
    spool: &'se Spool,
    pub ref_writer: RefWriter,
    max_depth: u32,
    current_depth: u32,
}

impl<'se> WriteContext<'se> {
    pub fn new(spool: &'se Spool, writer: &'se mut Writer) -> WriteContext<'se> {
        WriteContext {
            writer,
            spool,
            ref_writer: RefWriter::new(),
            max_depth: spool.config().max_depth(),
            current_depth: 0,
        }
    }

    #[inline(always)]
    pub fn get_spool(&self) -> &'se Spool {
        self.spool
    }

    #[inline(always)]
    pub fn config(&self) -> &'se Config {
        self.spool.config()
    }

    #[inline(always)]
    pub fn type_resolver(&self) -> &'se TypeResolver {
        self.spool.get_type_resolver()
    }

    /// Writes `value` with the converter resolved for `T`, inside the
    /// reference scope of the current operation.
    pub fn write_value<T: JsonType>(&mut self, value: &T) -> Result<(), Error> {
        let converter = self.type_resolver().get_converter::<T>()?;
        converter.write(value, self)
    }

    pub fn inc_depth(&mut self) -> Result<(), Error> {
        self.current_depth += 1;
        if self.current_depth > self.max_depth {
            return Err(Error::depth_exceed(format!(
                "Maximum object nesting depth ({}) exceeded while writing. \
                 This may indicate a self referencing graph; enable reference \
                 preservation or raise max_depth if this is expected.",
                self.max_depth
            )));
        }
        Ok(())
    }

    #[inline(always)]
    pub fn dec_depth(&mut self) {
        self.current_depth = self.current_depth.saturating_sub(1);
    }
}

pub struct ReadContext<'de, 'bf: 'de> {
    pub reader: Reader<'bf>,
    spool: &'de Spool,
    pub ref_reader: RefReader,
    max_depth: u32,
    current_depth: u32,
}

impl<'de, 'bf: 'de> ReadContext<'de, 'bf> {
    pub fn new(spool: &'de Spool, reader: Reader<'bf>) -> ReadContext<'de, 'bf> {
        ReadContext {
            reader,
            spool,
            ref_reader: RefReader::new(),
            max_depth: spool.config().max_depth(),
            current_depth: 0,
        }
    }

    #[inline(always)]
    pub fn get_spool(&self) -> &'de Spool {
        self.spool
    }

    #[inline(always)]
    pub fn config(&self) -> &'de Config {
        self.spool.config()
    }

    #[inline(always)]
    pub fn type_resolver(&self) -> &'de TypeResolver {
        self.spool.get_type_resolver()
    }

    /// Reads a `T` with the converter resolved for it, sharing the reference
    /// table of the current operation.
    pub fn read_value<T: JsonType>(&mut self) -> Result<T, Error> {
        let converter = self.type_resolver().get_converter::<T>()?;
        converter.read(self)
    }

    /// Parses the next value as an untyped tree within the remaining depth.
    pub fn read_untyped(&mut self) -> Result<Value, Error> {
        let levels = self.max_depth.saturating_sub(self.current_depth);
        self.reader.read_value_within(levels)
    }

    pub fn inc_depth(&mut self) -> Result<(), Error> {
        self.current_depth += 1;
        if self.current_depth > self.max_depth {
            return Err(Error::depth_exceed(format!(
                "Maximum object nesting depth ({}) exceeded while reading at offset {}",
                self.max_depth,
                self.reader.position()
            )));
        }
        Ok(())
    }

    #[inline(always)]
    pub fn dec_depth(&mut self) {
        self.current_depth = self.current_depth.saturating_sub(1);
    }
}
