// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Best-effort session snapshots.
//!
//! A snapshot is queued after every render and written by a background
//! worker, which only writes the newest pending snapshot. Failures are
//! logged and otherwise ignored.

use super::storage::KeyValueStore;
use crate::error::StorageError;
use crate::models::annotation::{AnnotationId, TextAnnotation};
use crate::models::scene::Scene;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Sender};
use std::thread::JoinHandle;

/// Storage key of the session snapshot.
pub const SNAPSHOT_KEY: &str = "quickMemeState";

/// Serialized editor state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub image_url: Option<String>,
    #[serde(default)]
    pub text_objects: Vec<TextAnnotation>,
    #[serde(default)]
    pub selected_text_id: Option<AnnotationId>,
}

impl Snapshot {
    pub fn capture(scene: &Scene) -> Self {
        Self {
            image_url: scene.background().map(|b| b.source.clone()),
            text_objects: scene.annotations().to_vec(),
            selected_text_id: scene.selected_id(),
        }
    }
}

/// Read the saved snapshot, if any.
pub fn load_snapshot(store: &dyn KeyValueStore) -> Result<Option<Snapshot>, StorageError> {
    match store.get(SNAPSHOT_KEY)? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

pub fn save_snapshot(store: &dyn KeyValueStore, snapshot: &Snapshot) -> Result<(), StorageError> {
    store.set(SNAPSHOT_KEY, serde_json::to_value(snapshot)?)
}

/// Fire-and-forget snapshot writer running on its own thread.
pub struct Autosaver {
    sender: Option<Sender<Snapshot>>,
    worker: Option<JoinHandle<()>>,
}

impl Autosaver {
    pub fn spawn(store: Box<dyn KeyValueStore>) -> Self {
        let (sender, receiver) = channel::<Snapshot>();
        let worker = std::thread::spawn(move || {
            while let Ok(mut snapshot) = receiver.recv() {
                // Skip anything already superseded.
                while let Ok(newer) = receiver.try_recv() {
                    snapshot = newer;
                }
                if let Err(e) = save_snapshot(store.as_ref(), &snapshot) {
                    log::debug!("Autosave skipped: {}", e);
                }
            }
        });
        Self {
            sender: Some(sender),
            worker: Some(worker),
        }
    }

    pub fn queue(&self, snapshot: Snapshot) {
        if let Some(sender) = &self.sender {
            // A dead worker only means persistence is gone.
            let _ = sender.send(snapshot);
        }
    }
}

impl Drop for Autosaver {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain and exit.
        self.sender = None;
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
