// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! "Load this image" messages between entry points and the editor.
//!
//! Entry points post `openQuickMeme`; the relay turns it into
//! `openMemeEditor`, which the editor acts on.

use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    OpenQuickMeme,
    OpenMemeEditor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub action: Action,
    pub image_url: String,
}

impl Message {
    pub fn open(image_url: impl Into<String>) -> Self {
        Self {
            action: Action::OpenQuickMeme,
            image_url: image_url.into(),
        }
    }
}

/// Relay step: forward open requests to the editor, drop anything else.
pub fn relay(message: Message) -> Option<Message> {
    match message.action {
        Action::OpenQuickMeme => Some(Message {
            action: Action::OpenMemeEditor,
            image_url: message.image_url,
        }),
        Action::OpenMemeEditor => None,
    }
}

/// Channel carrying messages to the editor.
pub struct MessageBus {
    sender: Sender<Message>,
    receiver: Receiver<Message>,
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageBus {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    pub fn sender(&self) -> Sender<Message> {
        self.sender.clone()
    }

    /// Relay pending messages and return the image URLs to load, oldest first.
    pub fn drain_load_requests(&self) -> Vec<String> {
        self.receiver
            .try_iter()
            .filter_map(relay)
            .filter(|m| m.action == Action::OpenMemeEditor)
            .map(|m| m.image_url)
            .collect()
    }
}
