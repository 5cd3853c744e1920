// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message family contract.
//!
//! Every request and reply the proxy understands implements [`Message`]:
//! a compile-time identifier, a name, and optional fields. Optional fields
//! are declared through the `HAS_*` constants and exposed through accessors
//! whose default bodies model an absent field. Generic proxy code never
//! calls the accessors directly; it goes through [`crate::capability`],
//! which consults the constants so that absent fields cost nothing.

use crate::payload::Payload;

/// A statically known message type.
///
/// # Example
///
/// ```
/// use msgroute::{Message, Payload};
///
/// struct SetRequest {
///     value: Payload,
///     flags: u64,
/// }
///
/// impl Message for SetRequest {
///     const TYPE_ID: usize = 3;
///     const NAME: &'static str = "set";
///     const HAS_VALUE: bool = true;
///     const HAS_FLAGS: bool = true;
///
///     fn value(&self) -> Option<&Payload> {
///         Some(&self.value)
///     }
///
///     fn value_mut(&mut self) -> Option<&mut Payload> {
///         Some(&mut self.value)
///     }
///
///     fn flags(&self) -> u64 {
///         self.flags
///     }
/// }
/// ```
pub trait Message: Sized + Send + Sync + 'static {
    /// Identifier, unique within the family.
    const TYPE_ID: usize;

    /// Name, unique within the family.
    const NAME: &'static str;

    /// The type carries a binary value.
    const HAS_VALUE: bool = false;

    /// The type carries a 64-bit flags field.
    const HAS_FLAGS: bool = false;

    /// The type carries a free-text message.
    const HAS_MESSAGE: bool = false;

    /// The binary value, if set.
    ///
    /// Types with `HAS_VALUE` may still return `None` when the field is
    /// optional and unset.
    fn value(&self) -> Option<&Payload> {
        None
    }

    /// Mutable access to the binary value, if set.
    fn value_mut(&mut self) -> Option<&mut Payload> {
        None
    }

    /// The flags field.
    fn flags(&self) -> u64 {
        0
    }

    /// Mutable access to the free-text message.
    fn message_mut(&mut self) -> Option<&mut String> {
        None
    }
}

/// A request, associated with the reply type it produces.
pub trait Request: Message {
    /// Reply produced for this request.
    type Reply: Reply;

    /// Failed requests of this kind are recorded to the async log.
    const ASYNCLOG: bool = false;
}

/// A reply carrying a result code.
pub trait Reply: Message {
    /// Build a reply with the given result and otherwise default fields.
    fn from_result(result: ResultCode) -> Self;

    /// Result code of this reply.
    fn result(&self) -> ResultCode;
}

/// Requests that can be routed by shard.
pub trait ShardKey {
    /// Shard this request belongs to.
    fn shard_id(&self) -> u32;
}

/// Outcome of a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ResultCode {
    #[default]
    Unknown,
    Ok,
    NotFound,
    LocalError,
    RemoteError,
    Timeout,
    Busy,
}

impl ResultCode {
    /// Check if the result denotes a failure.
    pub fn is_error(self) -> bool {
        matches!(
            self,
            Self::LocalError | Self::RemoteError | Self::Timeout | Self::Busy
        )
    }

    /// Short lowercase name, as printed in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Ok => "ok",
            Self::NotFound => "notfound",
            Self::LocalError => "local_error",
            Self::RemoteError => "remote_error",
            Self::Timeout => "timeout",
            Self::Busy => "busy",
        }
    }
}

impl std::fmt::Display for ResultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
