// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pending "open this image" handoff.
//!
//! `quickmeme <image-url>` stores the URL before showing the editor; the
//! editor consumes it once at startup, in preference to any autosaved
//! session.

use super::storage::KeyValueStore;
use crate::error::StorageError;
use serde_json::Value;

/// Storage key of the pending image URL.
pub const PENDING_IMAGE_KEY: &str = "currentImageUrl";

pub fn store_pending(store: &dyn KeyValueStore, url: &str) -> Result<(), StorageError> {
    store.set(PENDING_IMAGE_KEY, Value::String(url.to_string()))
}

/// Read and clear the pending URL.
pub fn take_pending(store: &dyn KeyValueStore) -> Result<Option<String>, StorageError> {
    let Some(value) = store.get(PENDING_IMAGE_KEY)? else {
        return Ok(None);
    };
    store.remove(PENDING_IMAGE_KEY)?;
    Ok(value
        .as_str()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::MemoryStore;

    #[test]
    fn test_pending_url_is_consumed_once() {
        let store = MemoryStore::new();
        assert_eq!(take_pending(&store).unwrap(), None);

        store_pending(&store, "https://example.com/cat.png").unwrap();
        assert_eq!(
            take_pending(&store).unwrap().as_deref(),
            Some("https://example.com/cat.png")
        );
        assert_eq!(take_pending(&store).unwrap(), None);
    }

    #[test]
    fn test_non_string_pending_value_is_cleared() {
        let store = MemoryStore::new();
        store.set(PENDING_IMAGE_KEY, serde_json::json!(42)).unwrap();
        assert_eq!(take_pending(&store).unwrap(), None);
        assert_eq!(store.get(PENDING_IMAGE_KEY).unwrap(), None);
    }
}
