use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use crate::registry::CapabilityRegistry;
use crate::CoreResult;

/// Delivery channel for customer notifications
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Channel {
    Email,
    Sms,
    Custom(String),
}

impl Channel {
    /// Anything containing an `@` goes out by email, everything else
    /// (including an empty contact) by SMS.
    pub fn for_recipient(recipient: &str) -> Self {
        if recipient.contains('@') {
            Channel::Email
        } else {
            Channel::Sms
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
            Channel::Custom(tag) => tag,
        }
    }
}

impl From<&str> for Channel {
    fn from(tag: &str) -> Self {
        match tag {
            "email" => Channel::Email,
            "sms" => Channel::Sms,
            other => Channel::Custom(other.to_string()),
        }
    }
}

impl From<String> for Channel {
    fn from(tag: String) -> Self {
        Channel::from(tag.as_str())
    }
}

impl From<Channel> for String {
    fn from(channel: Channel) -> Self {
        channel.as_str().to_string()
    }
}

impl FromStr for Channel {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Channel::from(s))
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivers a message to a recipient over one channel
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, recipient: &str, message: &str) -> CoreResult<()>;
}

/// Sends a message over whichever notifier a channel selects
#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn send_notification(
        &self,
        channel: &Channel,
        recipient: &str,
        message: &str,
    ) -> CoreResult<()>;
}

pub type NotifierRegistry = CapabilityRegistry<Channel, dyn Notifier>;
