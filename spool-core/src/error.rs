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

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

/// Global flag to check if SPOOL_PANIC_ON_ERROR environment variable is set at compile time.
/// Set SPOOL_PANIC_ON_ERROR=1 at compile time to enable panic on error.
pub const PANIC_ON_ERROR: bool = option_env!("SPOOL_PANIC_ON_ERROR").is_some();

/// Check if SPOOL_PANIC_ON_ERROR environment variable is set.
#[inline(always)]
pub const fn should_panic_on_error() -> bool {
    PANIC_ON_ERROR
}

/// Error type for every spool read, write and configuration operation.
///
/// # Always Use Static Constructor Functions
///
/// Do not construct variants directly; use the static constructors
/// (`Error::json`, `Error::type_error`, ...). They accept anything convertible
/// into `Cow<'static, str>` and honour `SPOOL_PANIC_ON_ERROR`.
///
/// ```rust
/// use spool_core::error::Error;
///
/// let err = Error::type_error("expected a string");
/// let err = Error::missing_member(format!("missing required member {}", "Id"));
/// ```
///
/// ## Member paths
///
/// Errors raised below an object member or a collection element are wrapped
/// on the way up with [`Error::with_member`] and [`Error::with_index`], so the
/// caller sees the full path from the document root:
///
/// ```rust
/// use spool_core::error::Error;
///
/// let err = Error::type_error("expected a number")
///     .with_member("Age")
///     .with_index(2)
///     .with_member("People");
/// assert_eq!(err.path(), Some("People[2].Age"));
/// assert_eq!(err.to_string(), "expected a number Path: $.People[2].Age");
/// ```
///
/// ## Debug Mode: SPOOL_PANIC_ON_ERROR
///
/// ```bash
/// RUST_BACKTRACE=1 SPOOL_PANIC_ON_ERROR=1 cargo test
/// ```
///
/// With the variable set, every constructor panics where the error is created.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Malformed JSON or a token of the wrong kind at an expected position.
    ///
    /// Do not construct this variant directly; use [`Error::json`] instead.
    #[error("{0}")]
    Json(Cow<'static, str>),

    /// A value cannot be converted to the declared type of its target.
    ///
    /// Do not construct this variant directly; use [`Error::type_error`] instead.
    #[error("{0}")]
    TypeError(Cow<'static, str>),

    /// A required member is absent or null.
    ///
    /// Do not construct this variant directly; use [`Error::missing_member`] instead.
    #[error("{0}")]
    MissingMember(Cow<'static, str>),

    /// A discriminator value has no registered type, or a polymorphic read has no discriminator.
    ///
    /// Do not construct this variant directly; use [`Error::unknown_discriminator`] instead.
    #[error("{0}")]
    UnknownDiscriminator(Cow<'static, str>),

    /// A `$ref` token that was never registered with `$id`.
    ///
    /// Do not construct this variant directly; use [`Error::invalid_ref`] instead.
    #[error("{0}")]
    InvalidRef(Cow<'static, str>),

    /// A cyclic graph written while reference preservation is off.
    ///
    /// Do not construct this variant directly; use [`Error::reference_loop`] instead.
    #[error("{0}")]
    ReferenceLoop(Cow<'static, str>),

    /// Maximum nesting depth exceeded.
    ///
    /// Do not construct this variant directly; use [`Error::depth_exceed`] instead.
    #[error("{0}")]
    DepthExceed(Cow<'static, str>),

    /// Ill-formed mapping or registration, detected before any I/O.
    ///
    /// Do not construct this variant directly; use [`Error::config`] instead.
    #[error("{0}")]
    Config(Cow<'static, str>),

    /// Operation not allowed in current context.
    ///
    /// Do not construct this variant directly; use [`Error::not_allowed`] instead.
    #[error("{0}")]
    NotAllowed(Cow<'static, str>),

    /// Unsupported operation or feature.
    ///
    /// Do not construct this variant directly; use [`Error::unsupported`] instead.
    #[error("{0}")]
    Unsupported(Cow<'static, str>),

    /// Generic unknown error.
    ///
    /// Do not construct this variant directly; use [`Error::unknown`] instead.
    #[error("{0}")]
    Unknown(Cow<'static, str>),

    /// Another error annotated with the member path where it happened.
    #[error("{source} Path: {}", DisplayPath(.path))]
    Path {
        path: String,
        #[source]
        source: Box<Error>,
    },
}

struct DisplayPath<'a>(&'a str);

impl fmt::Display for DisplayPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.starts_with('[') {
            write!(f, "${}", self.0)
        } else {
            write!(f, "$.{}", self.0)
        }
    }
}

macro_rules! error_constructor {
    ($(#[$meta:meta])* $name:ident => $variant:ident) => {
        $(#[$meta])*
        #[inline(always)]
        #[cold]
        #[track_caller]
        pub fn $name<S: Into<Cow<'static, str>>>(s: S) -> Self {
            let err = Error::$variant(s.into());
            if PANIC_ON_ERROR {
                panic!("SPOOL_PANIC_ON_ERROR: {}", err);
            }
            err
        }
    };
}

impl Error {
    error_constructor!(
        /// Creates a new [`Error::Json`] for malformed input or an unexpected token.
        json => Json
    );
    error_constructor!(
        /// Creates a new [`Error::TypeError`].
        type_error => TypeError
    );
    error_constructor!(
        /// Creates a new [`Error::MissingMember`].
        missing_member => MissingMember
    );
    error_constructor!(
        /// Creates a new [`Error::UnknownDiscriminator`].
        unknown_discriminator => UnknownDiscriminator
    );
    error_constructor!(
        /// Creates a new [`Error::InvalidRef`].
        invalid_ref => InvalidRef
    );
    error_constructor!(
        /// Creates a new [`Error::ReferenceLoop`].
        reference_loop => ReferenceLoop
    );
    error_constructor!(
        /// Creates a new [`Error::DepthExceed`].
        depth_exceed => DepthExceed
    );
    error_constructor!(
        /// Creates a new [`Error::Config`].
        ///
        /// ```
        /// use spool_core::error::Error;
        ///
        /// let err = Error::config(format!("duplicate member name {}", "id"));
        /// ```
        config => Config
    );
    error_constructor!(
        /// Creates a new [`Error::NotAllowed`].
        not_allowed => NotAllowed
    );
    error_constructor!(
        /// Creates a new [`Error::Unsupported`].
        unsupported => Unsupported
    );
    error_constructor!(
        /// Creates a new [`Error::Unknown`].
        unknown => Unknown
    );

    /// Prefixes the error path with an object member name.
    #[cold]
    #[inline(never)]
    pub fn with_member(self, member: &str) -> Error {
        match self {
            Error::Path { path, source } => {
                let path = if path.starts_with('[') {
                    format!("{member}{path}")
                } else {
                    format!("{member}.{path}")
                };
                Error::Path { path, source }
            }
            err => Error::Path {
                path: member.to_string(),
                source: Box::new(err),
            },
        }
    }

    /// Prefixes the error path with a collection index.
    #[cold]
    #[inline(never)]
    pub fn with_index(self, index: usize) -> Error {
        match self {
            Error::Path { path, source } => {
                let path = if path.starts_with('[') {
                    format!("[{index}]{path}")
                } else {
                    format!("[{index}].{path}")
                };
                Error::Path { path, source }
            }
            err => Error::Path {
                path: format!("[{index}]"),
                source: Box::new(err),
            },
        }
    }

    /// The accumulated member path, without the leading `$`.
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::Path { path, .. } => Some(path),
            _ => None,
        }
    }

    /// The innermost error, with any path annotation removed.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Path { source, .. } => source.root_cause(),
            err => err,
        }
    }

    /// Enhances a [`Error::TypeError`] with the name of the type being converted.
    #[inline(never)]
    pub fn enhance_type_error<T: ?Sized + 'static>(err: Error) -> Error {
        if let Error::TypeError(s) = err {
            let mut msg = s.to_string();
            msg.push_str(" (type: ");
            msg.push_str(std::any::type_name::<T>());
            msg.push(')');
            Error::type_error(msg)
        } else {
            err
        }
    }
}

/// Ensures a condition is true; otherwise returns an [`enum@Error`].
///
/// # Examples
/// ```
/// use spool_core::ensure;
/// use spool_core::error::Error;
///
/// fn check_value(n: i32) -> Result<(), Error> {
///     ensure!(n > 0, "value must be positive");
///     ensure!(n < 10, Error::type_error("value too large"));
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal) => {
        if !$cond {
            return Err($crate::error::Error::unknown($msg));
        }
    };
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::error::Error::unknown(format!($fmt, $($arg)*)));
        }
    };
}

/// Returns early with an [`enum@Error`].
///
/// # Examples
/// ```
/// use spool_core::bail;
/// use spool_core::error::Error;
///
/// fn fail_fast() -> Result<(), Error> {
///     bail!("something went wrong");
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($crate::error::Error::unknown($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::unknown(format!($fmt, $($arg)*)))
    };
}

/// Returns early with a [`Error::NotAllowed`].
///
/// # Examples
/// ```
/// use spool_core::not_allowed;
/// use spool_core::error::Error;
///
/// fn check_operation(op: &str) -> Result<(), Error> {
///     not_allowed!("operation {} not allowed", op);
/// }
/// ```
#[macro_export]
macro_rules! not_allowed {
    ($err:expr) => {
        return Err($crate::error::Error::not_allowed($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::not_allowed(format!($fmt, $($arg)*)))
    };
}
