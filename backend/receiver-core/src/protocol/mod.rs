//! Wire format of inbound control messages.
//!
//! One UTF-8 JSON object per WebSocket message:
//!
//! - `{"type": "speed", "value": <number>}`
//! - `{"type": "direction", "x": <number>, "y": <number>}`
//!
//! Nothing is sent back to the client.

mod decode;

pub use decode::{decode_command, decode_frame};
