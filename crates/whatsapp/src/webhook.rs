use serde::Deserialize;

/// Channel tag the provider prefixes onto every WhatsApp identity.
const CHANNEL_PREFIX: &str = "whatsapp:";

/// The form-encoded webhook body the provider posts for each inbound
/// message. Only the fields the bot consumes are modeled.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct InboundMessage {
    #[serde(rename = "MessageSid", default)]
    pub message_sid: Option<String>,
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "Body", default)]
    pub body: String,
}

/// Strips the channel tag so the roster sees bare E.164 numbers.
pub fn normalize_sender(raw: &str) -> String {
    raw.trim().strip_prefix(CHANNEL_PREFIX).unwrap_or(raw.trim()).to_owned()
}

/// Re-applies the channel tag for outbound sends.
pub fn channel_address(number: &str) -> String {
    if number.starts_with(CHANNEL_PREFIX) {
        number.to_owned()
    } else {
        format!("{CHANNEL_PREFIX}{number}")
    }
}
