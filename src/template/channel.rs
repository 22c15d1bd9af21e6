//! Notification channels and their content limits

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::types::TemplateError;

/// Target medium for a notification template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Whatsapp,
    Email,
    Push,
}

impl Channel {
    /// All channels, in display order
    pub const ALL: [Channel; 3] = [Channel::Whatsapp, Channel::Email, Channel::Push];

    /// Hard character limit for content on this channel
    pub fn max_length(&self) -> usize {
        match self {
            Channel::Whatsapp => 1000,
            Channel::Email => 10_000,
            Channel::Push => 200,
        }
    }

    /// Length above which push content draws a conciseness warning
    pub const PUSH_ADVISORY_LENGTH: usize = 100;

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Whatsapp => "whatsapp",
            Channel::Email => "email",
            Channel::Push => "push",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "whatsapp" => Ok(Channel::Whatsapp),
            "email" => Ok(Channel::Email),
            "push" => Ok(Channel::Push),
            other => Err(TemplateError::UnknownChannel(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_limits() {
        assert_eq!(Channel::Whatsapp.max_length(), 1000);
        assert_eq!(Channel::Email.max_length(), 10_000);
        assert_eq!(Channel::Push.max_length(), 200);
    }

    #[test]
    fn test_channel_parse() {
        assert_eq!("email".parse::<Channel>().unwrap(), Channel::Email);
        assert!(matches!(
            "sms".parse::<Channel>(),
            Err(TemplateError::UnknownChannel(_))
        ));
    }

    #[test]
    fn test_channel_serde_lowercase() {
        let json = serde_json::to_string(&Channel::Whatsapp).unwrap();
        assert_eq!(json, "\"whatsapp\"");

        let parsed: Channel = serde_json::from_str("\"push\"").unwrap();
        assert_eq!(parsed, Channel::Push);
    }
}
