//! Minimal TwiML rendering: the webhook must always answer with a
//! well-formed messaging response document, with or without a message body.

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// A response carrying one outbound message.
pub fn message_response(body: &str) -> String {
    format!("{XML_HEADER}<Response><Message>{}</Message></Response>", escape_xml(body))
}

/// An acknowledgement with no message, used when the reply was already
/// delivered through the provider API.
pub fn empty_response() -> String {
    format!("{XML_HEADER}<Response></Response>")
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{empty_response, message_response};

    #[test]
    fn message_body_is_wrapped_and_escaped() {
        let twiml = message_response("pay < £400 & confirmed");

        assert!(twiml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(twiml.contains("<Message>pay &lt; £400 &amp; confirmed</Message>"));
    }

    #[test]
    fn empty_response_has_no_message_element() {
        let twiml = empty_response();

        assert!(twiml.ends_with("<Response></Response>"));
        assert!(!twiml.contains("<Message>"));
    }

    #[test]
    fn multiline_replies_survive_verbatim() {
        let twiml = message_response("line one\nline two");

        assert!(twiml.contains("line one\nline two"));
    }
}
