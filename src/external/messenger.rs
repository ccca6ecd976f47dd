use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;

use crate::{
    api::MessageSender,
    config::MessengerConfig,
    entities::OutboundMessage,
    error::{send_error, Error},
};

#[derive(Debug, Serialize)]
struct Recipient<'a> {
    id: &'a str,
}

#[derive(Debug, Serialize)]
struct DefaultAction {
    #[serde(rename = "type")]
    kind: &'static str,
    url: String,
}

#[derive(Debug, Serialize)]
struct Element {
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    default_action: DefaultAction,
}

#[derive(Debug, Serialize)]
#[serde(tag = "template_type", rename_all = "snake_case")]
enum TemplatePayload {
    Generic { elements: Vec<Element> },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
enum Attachment {
    Template(TemplatePayload),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Message {
    Text(String),
    Attachment(Attachment),
}

/// Body of a Send API call.
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    recipient: Recipient<'a>,
    message: Message,
}

impl From<OutboundMessage> for Message {
    fn from(message: OutboundMessage) -> Self {
        match message {
            OutboundMessage::Text { body } => Message::Text(body),
            OutboundMessage::LocationCard {
                title,
                map_image_url,
                map_link_url,
            } => Message::Attachment(Attachment::Template(TemplatePayload::Generic {
                elements: vec![Element {
                    title,
                    image_url: map_image_url,
                    default_action: DefaultAction {
                        kind: "web_url",
                        url: map_link_url,
                    },
                }],
            })),
        }
    }
}

pub struct MessengerClient {
    client: reqwest::Client,
    api_base: String,
    page_token: String,
}

impl MessengerClient {
    pub fn new(config: &MessengerConfig, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(send_error)?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').into(),
            page_token: config.page_token.clone(),
        })
    }
}

#[async_trait]
impl MessageSender for MessengerClient {
    #[tracing::instrument(skip(self, message))]
    async fn send(&self, user_id: &str, message: OutboundMessage) -> Result<(), Error> {
        let url = format!("{}/me/messages", self.api_base);
        let payload = SendRequest {
            recipient: Recipient { id: user_id },
            message: message.into(),
        };

        let res = self
            .client
            .post(url)
            .query(&[("access_token", &self.page_token)])
            .json(&payload)
            .send()
            .await
            .map_err(send_error)?;

        let status_code = res.status();

        if status_code != StatusCode::OK {
            let body = res.text().await.map_err(send_error)?;
            return Err(send_error(format!("{}: {}", status_code, body)));
        }

        Ok(())
    }
}
