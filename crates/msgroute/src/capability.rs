// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Uniform access to optional message fields.
//!
//! Generic proxy code handles unrelated message structs through these
//! functions. Each one branches on a `HAS_*` constant of the type, which is
//! resolved when the function is monomorphized; for a type without the
//! field the call folds down to the default (`None`, `0`, empty slice or
//! nothing at all). A missing field is never an error.

use crate::message::Message;
use crate::payload::Payload;

/// The binary value of a message, if the type carries one and it is set.
pub fn value_ptr<R: Message>(msg: &R) -> Option<&Payload> {
    if R::HAS_VALUE {
        msg.value()
    } else {
        None
    }
}

/// Mutable access to the binary value of a message.
pub fn value_ptr_mut<R: Message>(msg: &mut R) -> Option<&mut Payload> {
    if R::HAS_VALUE {
        msg.value_mut()
    } else {
        None
    }
}

/// Contiguous view of the binary value.
///
/// Coalesces a chained value in place, so this is the slow path; prefer
/// [`value_ptr`] when the segments can be consumed as they are. Types
/// without a value, or with an unset one, yield an empty slice.
pub fn value_range_slow<R: Message>(msg: &mut R) -> &[u8] {
    match value_ptr_mut(msg) {
        Some(value) => value.coalesce(),
        None => &[],
    }
}

/// Flags of a message, or 0 for types without flags.
pub fn get_flags<R: Message>(msg: &R) -> u64 {
    if R::HAS_FLAGS {
        msg.flags()
    } else {
        0
    }
}

/// Store `text` in the message field of types that have one.
///
/// Silently does nothing for other types.
pub fn set_message_if_present<R: Message>(msg: &mut R, text: impl Into<String>) {
    if !R::HAS_MESSAGE {
        return;
    }
    if let Some(slot) = msg.message_mut() {
        *slot = text.into();
    }
}

/// Optional fields declared by a message type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub value: bool,
    pub flags: bool,
    pub message: bool,
}

impl Capabilities {
    /// Capabilities of `M`.
    pub const fn of<M: Message>() -> Self {
        Self {
            value: M::HAS_VALUE,
            flags: M::HAS_FLAGS,
            message: M::HAS_MESSAGE,
        }
    }
}

impl std::fmt::Display for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = [
            (self.value, "value"),
            (self.flags, "flags"),
            (self.message, "message"),
        ]
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, name)| *name)
        .collect();

        if names.is_empty() {
            f.write_str("-")
        } else {
            f.write_str(&names.join(","))
        }
    }
}
