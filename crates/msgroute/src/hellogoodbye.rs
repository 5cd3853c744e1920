// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Hello/Goodbye: a small reference message family.
//!
//! | Type             | Id | Value    | Flags | Message |
//! |------------------|----|----------|-------|---------|
//! | `HelloRequest`   | 65 | yes      | yes   |         |
//! | `HelloReply`     | 66 | optional |       | yes     |
//! | `GoodbyeRequest` | 67 |          |       |         |
//! | `GoodbyeReply`   | 68 |          |       | yes     |
//!
//! Goodbye requests are async-logged when they fail.

use crate::message::{Message, Reply, Request, ResultCode, ShardKey};
use crate::payload::Payload;

/// Request types of the family.
pub type RequestList = crate::type_list![HelloRequest, GoodbyeRequest];

/// Reply types of the family.
pub type ReplyList = crate::type_list![HelloReply, GoodbyeReply];

/// Every type of the family.
pub type MessageList = crate::type_list![HelloRequest, HelloReply, GoodbyeRequest, GoodbyeReply];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelloRequest {
    pub shard_id: u32,
    pub key: String,
    pub value: Payload,
    pub flags: u64,
}

impl HelloRequest {
    pub fn new(shard_id: u32, key: impl Into<String>) -> Self {
        Self {
            shard_id,
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<Payload>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_flags(mut self, flags: u64) -> Self {
        self.flags = flags;
        self
    }
}

impl Message for HelloRequest {
    const TYPE_ID: usize = 65;
    const NAME: &'static str = "hello";
    const HAS_VALUE: bool = true;
    const HAS_FLAGS: bool = true;

    fn value(&self) -> Option<&Payload> {
        Some(&self.value)
    }

    fn value_mut(&mut self) -> Option<&mut Payload> {
        Some(&mut self.value)
    }

    fn flags(&self) -> u64 {
        self.flags
    }
}

impl Request for HelloRequest {
    type Reply = HelloReply;
}

impl ShardKey for HelloRequest {
    fn shard_id(&self) -> u32 {
        self.shard_id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelloReply {
    pub result: ResultCode,
    pub message: String,
    pub value: Option<Payload>,
}

impl Message for HelloReply {
    const TYPE_ID: usize = 66;
    const NAME: &'static str = "hello_reply";
    const HAS_VALUE: bool = true;
    const HAS_MESSAGE: bool = true;

    fn value(&self) -> Option<&Payload> {
        self.value.as_ref()
    }

    fn value_mut(&mut self) -> Option<&mut Payload> {
        self.value.as_mut()
    }

    fn message_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.message)
    }
}

impl Reply for HelloReply {
    fn from_result(result: ResultCode) -> Self {
        Self {
            result,
            ..Default::default()
        }
    }

    fn result(&self) -> ResultCode {
        self.result
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoodbyeRequest {
    pub shard_id: u32,
    pub key: String,
}

impl GoodbyeRequest {
    pub fn new(shard_id: u32, key: impl Into<String>) -> Self {
        Self {
            shard_id,
            key: key.into(),
        }
    }
}

impl Message for GoodbyeRequest {
    const TYPE_ID: usize = 67;
    const NAME: &'static str = "goodbye";
}

impl Request for GoodbyeRequest {
    type Reply = GoodbyeReply;
    const ASYNCLOG: bool = true;
}

impl ShardKey for GoodbyeRequest {
    fn shard_id(&self) -> u32 {
        self.shard_id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoodbyeReply {
    pub result: ResultCode,
    pub message: String,
}

impl Message for GoodbyeReply {
    const TYPE_ID: usize = 68;
    const NAME: &'static str = "goodbye_reply";
    const HAS_MESSAGE: bool = true;

    fn message_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.message)
    }
}

impl Reply for GoodbyeReply {
    fn from_result(result: ResultCode) -> Self {
        Self {
            result,
            ..Default::default()
        }
    }

    fn result(&self) -> ResultCode {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{get_flags, set_message_if_present, value_ptr, Capabilities};
    use crate::type_list::{type_id_by_name, TypeList};

    #[test]
    fn test_family_limits() {
        assert_eq!(RequestList::MIN_ID, 65);
        assert_eq!(RequestList::MAX_ID, 67);
        assert_eq!(ReplyList::RANGE_SIZE, 3);
        assert_eq!(MessageList::LEN, 4);
        assert_eq!(MessageList::RANGE_SIZE, 4);
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(type_id_by_name::<MessageList>("hello"), 65);
        assert_eq!(type_id_by_name::<MessageList>("goodbye_reply"), 68);
        assert_eq!(type_id_by_name::<RequestList>("hello_reply"), 0);
    }

    #[test]
    fn test_capabilities_per_type() {
        assert_eq!(
            Capabilities::of::<HelloRequest>().to_string(),
            "value,flags"
        );
        assert_eq!(Capabilities::of::<HelloReply>().to_string(), "value,message");
        assert_eq!(Capabilities::of::<GoodbyeRequest>().to_string(), "-");
        assert_eq!(Capabilities::of::<GoodbyeReply>().to_string(), "message");
    }

    #[test]
    fn test_adapters_on_family() {
        let hello = HelloRequest::new(1, "k").with_flags(42).with_value("v");
        assert_eq!(get_flags(&hello), 42);
        assert_eq!(value_ptr(&hello).map(Payload::to_vec), Some(b"v".to_vec()));

        assert_eq!(get_flags(&GoodbyeRequest::new(1, "k")), 0);

        let mut reply = GoodbyeReply::from_result(ResultCode::LocalError);
        set_message_if_present(&mut reply, "gone");
        assert_eq!(reply.message, "gone");
        assert!(reply.result().is_error());
    }
}
