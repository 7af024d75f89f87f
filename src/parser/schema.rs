//! Typed representation of one NS2 trace line.
//!
//! A record is built once from a single 12-field line and never
//! mutated afterwards.

use crate::utils::config::EMPTY_FLAGS_FIELD;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Event column of a trace line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceEvent {
    /// `r` - packet received at `to_node`
    #[default]
    Receive,
    /// `+` - packet entered a queue
    Enqueue,
    /// `-` - packet left a queue
    Dequeue,
    /// `d` - packet dropped
    Drop,
    /// MAC level collision. No trace code maps here yet.
    Collision,
}

impl TraceEvent {
    /// Map a trace event code to an event
    ///
    /// Returns `None` for codes the parser does not know about.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "r" => Some(Self::Receive),
            "+" => Some(Self::Enqueue),
            "-" => Some(Self::Dequeue),
            "d" => Some(Self::Drop),
            _ => None,
        }
    }

    /// Trace event code for this event
    pub fn code(self) -> &'static str {
        match self {
            Self::Receive => "r",
            Self::Enqueue => "+",
            Self::Dequeue => "-",
            Self::Drop => "d",
            Self::Collision => "c",
        }
    }
}

/// NS2 pseudo-address (`address.port`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Address {
    pub address: i64,
    pub port: i64,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.address, self.port)
    }
}

/// One parsed trace line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub event: TraceEvent,

    /// Simulation time in seconds
    pub time: f64,

    pub from_node: u32,
    pub to_node: u32,

    /// Packet type tag, kept verbatim (`tcp`, `cbr`, `ack`, ...)
    pub packet_type: String,

    /// Packet size in bytes
    pub packet_size: u64,

    /// Reserved. The flags column is not decoded and this stays zero.
    pub flags: u8,

    pub flow_id: i64,
    pub source_addr: Address,
    pub dest_addr: Address,
    pub sequence_num: i64,

    /// Identifies a packet across its enqueue/receive lifecycle
    pub unique_packet_id: i64,
}

impl TraceRecord {
    /// Re-serialize the record as a 12-field trace line
    ///
    /// The flags column is written as a placeholder since it is never decoded.
    pub fn to_line(&self) -> String {
        format!(
            "{} {} {} {} {} {} {} {} {} {} {} {}",
            self.event.code(),
            self.time,
            self.from_node,
            self.to_node,
            self.packet_type,
            self.packet_size,
            EMPTY_FLAGS_FIELD,
            self.flow_id,
            self.source_addr,
            self.dest_addr,
            self.sequence_num,
            self.unique_packet_id,
        )
    }
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}
