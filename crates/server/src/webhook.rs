use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use tracing::{info, warn};
use uuid::Uuid;

use shiftbot_core::controller::ConversationController;
use shiftbot_core::gateway::TimesheetGateway;
use shiftbot_core::replies;
use shiftbot_whatsapp::client::ReplySender;
use shiftbot_whatsapp::twiml;
use shiftbot_whatsapp::webhook::{normalize_sender, InboundMessage};

pub struct WebhookState<G> {
    pub controller: Arc<ConversationController<G>>,
    pub reply_sender: Arc<dyn ReplySender>,
}

impl<G> Clone for WebhookState<G> {
    fn clone(&self) -> Self {
        Self { controller: self.controller.clone(), reply_sender: self.reply_sender.clone() }
    }
}

pub fn router<G>(state: WebhookState<G>) -> Router
where
    G: TimesheetGateway + 'static,
{
    Router::new().route("/webhook", post(receive_message::<G>)).with_state(state)
}

/// One inbound message, one well-formed TwiML response. The reply itself is
/// delivered through the provider API; the TwiML document carries it only
/// when that send fails, so the channel never sees a transport error.
pub async fn receive_message<G>(
    State(state): State<WebhookState<G>>,
    payload: Result<Form<InboundMessage>, FormRejection>,
) -> Response
where
    G: TimesheetGateway + 'static,
{
    let correlation_id = Uuid::new_v4().to_string();

    let Ok(Form(inbound)) = payload else {
        warn!(
            event_name = "transport.webhook.bad_payload",
            correlation_id = %correlation_id,
            "webhook payload could not be parsed"
        );
        return twiml_response(twiml::message_response(&replies::apology()));
    };

    let sender = normalize_sender(&inbound.from);
    info!(
        event_name = "transport.webhook.received",
        correlation_id = %correlation_id,
        sender = %sender,
        message_sid = %inbound.message_sid.as_deref().unwrap_or("unknown"),
        "inbound message received"
    );

    let reply = state.controller.handle_message(&sender, &inbound.body).await;

    match state.reply_sender.send(&sender, &reply).await {
        Ok(()) => twiml_response(twiml::empty_response()),
        Err(error) => {
            warn!(
                event_name = "transport.webhook.send_fallback",
                correlation_id = %correlation_id,
                error = %error,
                "provider send failed, replying inline"
            );
            twiml_response(twiml::message_response(&reply))
        }
    }
}

fn twiml_response(document: String) -> Response {
    ([(header::CONTENT_TYPE, "application/xml")], document).into_response()
}
