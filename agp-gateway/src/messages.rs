use serde::{Deserialize, Serialize};

/// Control frames exchanged during session setup.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlFrame {
    /// Sent by this service to register under its agent identity.
    Register { agent: String },
    /// Gateway accepted the registration.
    Ack,
    /// Gateway refused the registration.
    Error { message: String },
}

/// Per-message error reply on an established session.
///
/// This is the shape AGP clients check for: a numeric `error` field plus a
/// human-readable `message`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorReply {
    pub error: u16,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_frame_is_tagged() {
        let frame = ControlFrame::Register {
            agent: "tf_code_reviewer".into(),
        };
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["type"], "register");
        assert_eq!(json["agent"], "tf_code_reviewer");
    }

    #[test]
    fn ack_round_trips() {
        let frame: ControlFrame = serde_json::from_str(r#"{"type":"ack"}"#).unwrap();
        assert!(matches!(frame, ControlFrame::Ack));
    }
}
