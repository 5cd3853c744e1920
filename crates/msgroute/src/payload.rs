// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary message values.
//!
//! A [`Payload`] is a chain of reference-counted segments, as produced by a
//! reader that does not copy incoming frames. Most consumers only need the
//! segments; [`Payload::coalesce`] builds a contiguous view on demand.

use bytes::{Bytes, BytesMut};

/// Possibly fragmented binary value.
#[derive(Debug, Clone, Default)]
pub struct Payload {
    segments: Vec<Bytes>,
}

impl Payload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment to the end of the chain.
    ///
    /// Empty segments are dropped.
    pub fn append(&mut self, segment: impl Into<Bytes>) {
        let segment = segment.into();
        if !segment.is_empty() {
            self.segments.push(segment);
        }
    }

    /// Total number of bytes across all segments.
    pub fn len(&self) -> usize {
        self.segments.iter().map(Bytes::len).sum()
    }

    /// Check if the payload holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments in the chain.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Check if the payload spans more than one segment.
    pub fn is_chained(&self) -> bool {
        self.segments.len() > 1
    }

    /// Segments in order.
    pub fn segments(&self) -> &[Bytes] {
        &self.segments
    }

    /// Return a contiguous view of the payload.
    ///
    /// Chained payloads are merged into a single segment first; this is the
    /// slow path and copies every byte once. Subsequent calls are free.
    pub fn coalesce(&mut self) -> &[u8] {
        if self.is_chained() {
            let mut merged = BytesMut::with_capacity(self.len());
            for segment in &self.segments {
                merged.extend_from_slice(segment);
            }
            self.segments = vec![merged.freeze()];
        }
        self.segments.first().map_or(&[][..], |s| &s[..])
    }

    /// Copy the payload into a fresh vector.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        for segment in &self.segments {
            out.extend_from_slice(segment);
        }
        out
    }

    fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.segments.iter().flat_map(|s| s.iter().copied())
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.bytes().eq(other.bytes())
    }
}

impl Eq for Payload {}

impl From<Bytes> for Payload {
    fn from(segment: Bytes) -> Self {
        let mut payload = Self::new();
        payload.append(segment);
        payload
    }
}

impl From<Vec<u8>> for Payload {
    fn from(data: Vec<u8>) -> Self {
        Self::from(Bytes::from(data))
    }
}

impl From<&'static [u8]> for Payload {
    fn from(data: &'static [u8]) -> Self {
        Self::from(Bytes::from_static(data))
    }
}

impl From<&'static str> for Payload {
    fn from(data: &'static str) -> Self {
        Self::from(data.as_bytes())
    }
}

impl FromIterator<Bytes> for Payload {
    fn from_iter<I: IntoIterator<Item = Bytes>>(iter: I) -> Self {
        let mut payload = Self::new();
        for segment in iter {
            payload.append(segment);
        }
        payload
    }
}
