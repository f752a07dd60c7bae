// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Error types/enumerations for the `vrt49` crate.
*/

use thiserror::Error;

/// Generic `vrt49` crate error enumeration.
#[derive(Error, Debug)]
pub enum VitaError {
    /// Indicates a payload that requires an even number of 32-bit words
    /// was given something else.
    #[error("payload must be an even number of 32-bit words")]
    PayloadUneven32BitWords,
    /// Error given when a function that can only operate on signal
    /// data packets is executed on something else.
    #[error("function can only run on signal data packets")]
    SignalDataOnly,
    /// Error given when a function that can only operate on context
    /// packets is executed on something else.
    #[error("function can only run on context packets")]
    ContextOnly,
    /// Error given when a function that can only operate on command
    /// packets is executed on something else.
    #[error("function can only run on command packets")]
    CommandOnly,
    /// Error given when a function that can only operate on control
    /// sub-packets is executed on something else.
    #[error("function can only run on control command packets")]
    ControlOnly,
    /// Error given when a function that can only operate on cancellation
    /// sub-packets is executed on something else.
    #[error("function can only run on cancellation command packets")]
    CancellationOnly,
    /// Error given when a function that can only operate on validation ACK
    /// sub-packets is executed on something else.
    #[error("function can only run on validation ACK command packets")]
    ValidationAckOnly,
    /// Error given when a function that can only operate on execution ACK
    /// sub-packets is executed on something else.
    #[error("function can only run on execution ACK command packets")]
    ExecAckOnly,
    /// Error given when a function that can only operate on query ACK
    /// sub-packets is executed on something else.
    #[error("function can only run on query ACK command packets")]
    QueryAckOnly,
    /// Error given when attempting to set a timestamp field with a
    /// Tsi or Tsf mode that doesn't make sense.
    #[error("attempted to set timestamp field with Tsi/Tsf mode that doesn't make sense")]
    TimestampModeMismatch,
    /// Error given when attempting to use a controller/controllee ID
    /// while the UUID is set. ID and UUID are mutually exclusive.
    #[error("attempted to set controllee/controller ID field when UUID field is set")]
    TriedIdWhenUuidSet,
    /// Error given when attempting to use a controller/controllee UUID
    /// while the ID is set. ID and UUID are mutually exclusive.
    #[error("attempted to set controllee/controller UUID field when ID field is set")]
    TriedUuidWhenIdSet,
    /// Error given when attempting to use an out-of-range value.
    #[error("out of range")]
    OutOfRange,
    /// Error given when trying to set a reserved value.
    #[error("attempted to set reserved field")]
    ReservedField,
    /// Error given when a packet's declared size disagrees with the
    /// data it carries.
    #[error("packet size field ({declared} words) does not match actual size ({actual} words)")]
    PacketSizeMismatch {
        /// Size declared in the packet header (32-bit words).
        declared: u16,
        /// Size of the data actually present (32-bit words).
        actual: u16,
    },
    /// Error given when a class identifier carries a non-zero value in
    /// its reserved high bits (a valid OUI only spans 24 bits).
    #[error("invalid OUI (upper 8 bits of the class identifier word must be zero)")]
    InvalidOui,
    /// Error given when a payload format can't be expressed as a
    /// standard data packet class ID (or vice versa).
    #[error("payload format has no standard data packet class ID equivalent")]
    UnsupportedPayloadFormat,
    /// Error given when an octet that should hold a packed boolean
    /// holds something other than -1, 0, or +1 (strict mode only).
    #[error("illegal value ({0}) when expecting boolean (-1=false, 0=null, +1=true)")]
    IllegalPackedBoolean(i8),
    /// Error given when a malformed UTF-8 sequence is found and no
    /// replacement character was supplied.
    #[error("invalid UTF-8 sequence at offset {0}")]
    InvalidUtf8(usize),
    /// Error given for time conversions before the leap-second table
    /// begins (1961 for fractional lookups, 1972 for integer lookups).
    #[error("time conversion not supported before {0}")]
    TimeBeforeTable(i32),
    /// Error given when a time value exceeds the 32-bit second range
    /// (past the year 2106).
    #[error("input time exceeds max value")]
    TimeOverflow,
    /// Error given when converting between epochs that have no defined
    /// relationship (e.g. `Other` to UTC).
    #[error("can not convert between the requested time epochs")]
    EpochMismatch,
    /// Error given for NORAD/IRIG component values outside their legal
    /// ranges.
    #[error("illegal time components: {0}")]
    IllegalTimeComponents(String),
    /// Error given when a time string can't be parsed.
    #[error("invalid time format: {0}")]
    InvalidTimeFormat(String),
    /// Error given when a leap-seconds file is missing lines or doesn't
    /// match the expected USNO `tai-utc.dat` content.
    #[error("TAI to UTC mapping file ({0}) appears to be out of date or invalid")]
    InvalidLeapSecondsFile(String),
    /// Error given when a packet flags itself as incompatible with
    /// VITA-49.0 but the consumer runs in strict V49 mode.
    #[error("packet is flagged as not VITA-49.0 compatible")]
    NotV490Compatible,
    /// Error given when a buffer doesn't start with the VRL frame
    /// alignment word.
    #[error("buffer does not start with the VRL frame alignment word")]
    NotAVrlFrame,
    /// Error given when a VRL frame's trailer CRC doesn't match its
    /// contents.
    #[error("VRL frame CRC check failed")]
    FrameCrcMismatch,
    /// Error given when a VRL frame's length field disagrees with the
    /// buffer or with the packets it encloses.
    #[error("VRL frame length field does not match frame contents")]
    FrameLengthMismatch,
    /// Error given when packets won't fit in the frame size requested.
    #[error("frame size limit too small to hold a packet")]
    FrameTooSmall,
    /// Error given when the receive socket can't be created, bound, or
    /// joined to the multicast group.
    #[error("socket setup failed: {0}")]
    SocketSetup(String),
    /// Error given when the reader is asked to stop from one of its own
    /// worker threads.
    #[error("stop(true) may not be called from a reader thread")]
    StopFromReaderThread,
    /// Pass-through for serialization errors from the wire codec.
    #[error(transparent)]
    Deku(#[from] deku::DekuError),
    /// Pass-through for I/O errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
