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
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::type_resolver::TypeResolver;
use crate::serializer::{Converter, JsonType};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use std::sync::Arc;

/// Date and time values as ISO 8601 strings.
trait IsoText: Sized + Send + Sync + 'static {
    fn parse_iso(text: &str) -> Result<Self, chrono::ParseError>;

    fn to_iso(&self) -> String;
}

impl IsoText for DateTime<Utc> {
    fn parse_iso(text: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(text).map(|dt| dt.with_timezone(&Utc))
    }

    fn to_iso(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl IsoText for DateTime<FixedOffset> {
    fn parse_iso(text: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(text)
    }

    fn to_iso(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::AutoSi, false)
    }
}

impl IsoText for NaiveDateTime {
    fn parse_iso(text: &str) -> Result<Self, chrono::ParseError> {
        text.parse()
    }

    fn to_iso(&self) -> String {
        self.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
    }
}

impl IsoText for NaiveDate {
    fn parse_iso(text: &str) -> Result<Self, chrono::ParseError> {
        text.parse()
    }

    fn to_iso(&self) -> String {
        self.format("%Y-%m-%d").to_string()
    }
}

struct IsoConverter;

impl<T: IsoText> Converter<T> for IsoConverter {
    fn read(&self, context: &mut ReadContext) -> Result<T, Error> {
        let text = context.reader.read_string()?;
        T::parse_iso(&text).map_err(|e| {
            Error::type_error(format!(
                "\"{text}\" is not a valid {}: {e}",
                std::any::type_name::<T>()
            ))
        })
    }

    fn write(&self, value: &T, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_str(&value.to_iso());
        Ok(())
    }
}

macro_rules! impl_json_iso {
    ($($ty:ty),*) => {
        $(
            impl JsonType for $ty {
                fn create_converter(_: &TypeResolver) -> Result<Arc<dyn Converter<Self>>, Error> {
                    Ok(Arc::new(IsoConverter))
                }
            }
        )*
    };
}

impl_json_iso!(DateTime<Utc>, DateTime<FixedOffset>, NaiveDateTime, NaiveDate);
