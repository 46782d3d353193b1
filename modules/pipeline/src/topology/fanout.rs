//! Inbound message fan-out pipeline: `inbound-message` → `create-chat` +
//! `create-message`.
//!
//! Derives exactly one CreateChatEvent and one CreateMessageEvent from each
//! inbound envelope (1→2 fan-out, not a filter). Fail-open policy: a record
//! that cannot be processed yields sentinel records on both outputs, with
//! fixed ERROR_* placeholder fields, mirroring the conversion pipeline.

use crate::codec::{self, now_millis};
use crate::contracts::{CreateChatEvent, CreateMessageEvent, InboundMessageEvent};
use crate::error::{fail_open, PipelineError};

use super::Emission;

const PIPELINE: &str = "inbound-message-fanout";

/// Pure derivation of the chat-creation record.
pub fn derive_chat(event: &InboundMessageEvent) -> CreateChatEvent {
    CreateChatEvent {
        chat_id: event.payload.source.clone(),
        user_name: event.payload.sender.name.clone(),
        user_phone: event.payload.sender.phone.clone(),
        country_code: event.payload.sender.country_code.clone(),
        dial_code: event.payload.sender.dial_code.clone(),
        created_at: event.timestamp,
    }
}

/// Pure derivation of the message-creation record.
pub fn derive_message(event: &InboundMessageEvent) -> CreateMessageEvent {
    CreateMessageEvent {
        message_id: event.payload.id.clone(),
        sender_phone: event.payload.sender.phone.clone(),
        chat_id: event.payload.source.clone(),
        message_type: event.payload.message_type.clone(),
        content: event.payload.content.text.clone(),
        timestamp: event.timestamp,
    }
}

/// Sentinel pair emitted when an inbound record cannot be processed.
pub fn error_sentinels() -> (CreateChatEvent, CreateMessageEvent) {
    let now = now_millis();
    (
        CreateChatEvent {
            chat_id: "ERROR_CHAT_ID".to_string(),
            user_name: "ERROR_USER".to_string(),
            user_phone: "ERROR_PHONE".to_string(),
            country_code: "ERROR_COUNTRY".to_string(),
            dial_code: "ERROR_DIAL".to_string(),
            created_at: now,
        },
        CreateMessageEvent {
            message_id: "ERROR_MESSAGE_ID".to_string(),
            sender_phone: "ERROR_SENDER".to_string(),
            chat_id: "ERROR_CHAT_ID".to_string(),
            message_type: "error".to_string(),
            content: "ERROR_CONTENT".to_string(),
            timestamp: now,
        },
    )
}

/// Map one input payload to its two emissions.
pub fn emissions(chat_channel: &str, message_channel: &str, payload: &[u8]) -> Vec<Emission> {
    match fan_out(chat_channel, message_channel, payload) {
        Ok(out) => out,
        Err(e) => {
            let (chat, message) = error_sentinels();
            let chat_bytes = codec::encode(&chat).unwrap_or_else(|_| b"{}".to_vec());
            let message_bytes = codec::encode(&message).unwrap_or_else(|_| b"{}".to_vec());
            fail_open(
                PIPELINE,
                &e,
                vec![
                    Emission::new(chat_channel, chat_bytes),
                    Emission::new(message_channel, message_bytes),
                ],
            )
        }
    }
}

fn fan_out(
    chat_channel: &str,
    message_channel: &str,
    payload: &[u8],
) -> Result<Vec<Emission>, PipelineError> {
    let event: InboundMessageEvent = codec::decode(payload)?;

    Ok(vec![
        Emission::new(chat_channel, codec::encode(&derive_chat(&event))?),
        Emission::new(message_channel, codec::encode(&derive_message(&event))?),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{MessageContent, MessagePayload, Sender};

    fn inbound() -> InboundMessageEvent {
        InboundMessageEvent {
            app: "ChatApp".to_string(),
            timestamp: 1000,
            version: 2,
            event_type: "message".to_string(),
            payload: MessagePayload {
                id: "m1".to_string(),
                source: "chat1".to_string(),
                message_type: "text".to_string(),
                content: MessageContent {
                    text: "hi".to_string(),
                },
                sender: Sender {
                    phone: "555".to_string(),
                    name: "Ana".to_string(),
                    country_code: "BR".to_string(),
                    dial_code: "+55".to_string(),
                },
            },
        }
    }

    #[test]
    fn test_derived_records_agree_on_chat_and_phone() {
        let event = inbound();
        let chat = derive_chat(&event);
        let message = derive_message(&event);

        assert_eq!(chat.chat_id, message.chat_id);
        assert_eq!(chat.user_phone, message.sender_phone);
        assert_eq!(chat.chat_id, "chat1");
        assert_eq!(message.sender_phone, "555");
        assert_eq!(message.content, "hi");
        assert_eq!(chat.created_at, message.timestamp);
    }

    #[test]
    fn test_emissions_fan_out_to_both_channels() {
        let payload = codec::encode(&inbound()).unwrap();

        let out = emissions("create-chat", "create-message", &payload);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].channel, "create-chat");
        assert_eq!(out[1].channel, "create-message");

        let chat: CreateChatEvent = codec::decode(&out[0].payload).unwrap();
        let message: CreateMessageEvent = codec::decode(&out[1].payload).unwrap();
        assert_eq!(chat.chat_id, "chat1");
        assert_eq!(message.message_id, "m1");
    }

    #[test]
    fn test_emissions_sentinels_on_malformed_record() {
        let out = emissions("create-chat", "create-message", b"nope");
        assert_eq!(out.len(), 2);

        let chat: CreateChatEvent = codec::decode(&out[0].payload).unwrap();
        let message: CreateMessageEvent = codec::decode(&out[1].payload).unwrap();
        assert_eq!(chat.chat_id, "ERROR_CHAT_ID");
        assert_eq!(message.message_id, "ERROR_MESSAGE_ID");
        assert_eq!(message.message_type, "error");
    }
}
