use serde::Deserialize;

use crate::entities::Location;
use crate::error::{parse_error, Error};

/// One message delivered to the page, reduced to what the bot acts on.
#[derive(Clone, Debug, PartialEq)]
pub struct InboundEvent {
    pub user_id: String,
    pub message_id: Option<String>,
    pub is_echo: bool,
    /// `None` when the user sent something other than a location.
    pub location: Option<Location>,
}

#[derive(Debug, Deserialize)]
struct WebhookBody {
    entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    messaging: Vec<Messaging>,
}

#[derive(Debug, Deserialize)]
struct Messaging {
    sender: Sender,
    #[serde(default)]
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Sender {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Message {
    mid: Option<String>,
    #[serde(default)]
    is_echo: bool,
    #[serde(default)]
    attachments: Vec<Attachment>,
}

#[derive(Debug, Deserialize)]
struct Attachment {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Option<Payload>,
}

#[derive(Debug, Deserialize)]
struct Payload {
    coordinates: Option<WireCoordinates>,
}

#[derive(Debug, Deserialize)]
struct WireCoordinates {
    lat: f64,
    long: f64,
}

impl InboundEvent {
    /// Parses a webhook delivery into its events, in delivery order.
    pub fn parse_all(body: &[u8]) -> Result<Vec<InboundEvent>, Error> {
        let body: WebhookBody = serde_json::from_slice(body)?;

        let events = body
            .entry
            .into_iter()
            .flat_map(|entry| entry.messaging)
            .map(InboundEvent::from_messaging)
            .collect::<Result<Vec<_>, _>>()?;

        if events.is_empty() {
            return Err(parse_error("delivery carries no messaging events"));
        }

        Ok(events)
    }

    fn from_messaging(messaging: Messaging) -> Result<Self, Error> {
        if messaging.sender.id.is_empty() {
            return Err(parse_error("sender id is empty"));
        }

        let (message_id, is_echo, location) = match messaging.message {
            Some(message) => {
                let location = message
                    .attachments
                    .iter()
                    .find(|attachment| attachment.kind == "location")
                    .map(|attachment| match &attachment.payload {
                        Some(Payload {
                            coordinates: Some(c),
                        }) => Location::new(c.lat, c.long).map_err(parse_error),
                        _ => Err(parse_error("location attachment without coordinates")),
                    })
                    .transpose()?;

                (message.mid, message.is_echo, location)
            }
            None => (None, false, None),
        };

        Ok(Self {
            user_id: messaging.sender.id,
            message_id,
            is_echo,
            location,
        })
    }
}
