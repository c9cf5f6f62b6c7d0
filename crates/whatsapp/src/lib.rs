//! WhatsApp transport - Twilio-style webhook in, provider API out
//!
//! This crate is the messaging edge of shiftbot:
//! - **Webhook** (`webhook`) - inbound form payload types and sender
//!   identity normalization (`whatsapp:+44...` -> `+44...`)
//! - **TwiML** (`twiml`) - the XML reply document the webhook returns
//! - **Client** (`client`) - outbound sends through the provider REST API
//!
//! The reply for a processed message is delivered through the provider API
//! (`ReplySender`); the TwiML response doubles as the carrier of last resort
//! so the channel always receives a well-formed reply payload.

pub mod client;
pub mod twiml;
pub mod webhook;

pub use client::{NoopReplySender, ReplySender, TransportError, WhatsAppClient};
pub use webhook::{channel_address, normalize_sender, InboundMessage};
