use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::models::{char_len, FieldError};

pub const MAX_GUEST_NAME_LEN: usize = 60;
pub const MAX_RSVP_MESSAGE_LEN: usize = 500;
pub const MAX_WISH_LEN: usize = 300;
pub const MAX_PARTY_SIZE: u8 = 10;

/// Reactions a guest may leave on an event card.
pub const ALLOWED_REACTIONS: &[&str] = &["❤️", "🎉", "🙏", "😍", "👏"];

fn e164() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+[1-9]\d{7,14}$").expect("static regex"))
}

pub fn is_e164(phone: &str) -> bool {
    e164().is_match(phone)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsvpForm {
    pub guest_name: String,
    pub phone: String,
    pub attending: bool,
    #[serde(default = "one")]
    pub guest_count: u8,
    #[serde(default)]
    pub event_ids: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

fn one() -> u8 {
    1
}

impl RsvpForm {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        validate_guest_name(&self.guest_name, &mut errors);

        if !is_e164(self.phone.trim()) {
            errors.push(FieldError::new(
                "phone",
                "Enter the number with country code, e.g. +919876543210",
            ));
        }

        if self.attending && !(1..=MAX_PARTY_SIZE).contains(&self.guest_count) {
            errors.push(FieldError::new(
                "guest_count",
                format!("Guests must be between 1 and {}", MAX_PARTY_SIZE),
            ));
        }

        if let Some(msg) = &self.message {
            if char_len(msg) > MAX_RSVP_MESSAGE_LEN {
                errors.push(FieldError::new(
                    "message",
                    format!("Message must be at most {} characters", MAX_RSVP_MESSAGE_LEN),
                ));
            }
        }

        errors
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishForm {
    pub guest_name: String,
    pub message: String,
}

impl WishForm {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        validate_guest_name(&self.guest_name, &mut errors);

        if self.message.trim().is_empty() {
            errors.push(FieldError::new("message", "Write a few words for the couple"));
        } else if char_len(&self.message) > MAX_WISH_LEN {
            errors.push(FieldError::new(
                "message",
                format!("Wishes must be at most {} characters", MAX_WISH_LEN),
            ));
        }

        errors
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionForm {
    pub emoji: String,
}

impl ReactionForm {
    pub fn is_allowed(&self) -> bool {
        ALLOWED_REACTIONS.contains(&self.emoji.as_str())
    }
}

fn validate_guest_name(name: &str, errors: &mut Vec<FieldError>) {
    if name.trim().is_empty() {
        errors.push(FieldError::new("guest_name", "Name is required"));
    } else if char_len(name) > MAX_GUEST_NAME_LEN {
        errors.push(FieldError::new(
            "guest_name",
            format!("Name must be at most {} characters", MAX_GUEST_NAME_LEN),
        ));
    }
}
