// SPDX-License-Identifier: MIT

//!
//! The feed item layer: raw items, placed events and per-dataset batch
//! loading
//!

use crate::{Instant, Strategy};
use log::warn;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;
use thiserror::Error;

/// Errors that can arise in relation to an [`Event`]
#[derive(Error, Debug, Clone)]
pub enum EventError {
    /// The event's end date is before its start date
    #[error("The event end is before its start")]
    EndBeforeStart,
}

/// A raw feed record, as extracted from an inline JSON feed
///
/// The date fields are raw strings; nothing is parsed until a [`Strategy`]
/// is applied via [`Item::event`].  Any of the fields may be absent in the
/// feed, and unknown feed keys are ignored.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Item {
    #[serde(default)]
    title: Option<String>,

    #[serde(default)]
    start: Option<String>,

    #[serde(default)]
    end: Option<String>,
}

impl Item {
    /// Create an [`Item`] from its raw fields
    pub fn from(title: Option<String>, start: Option<String>, end: Option<String>) -> Item {
        Item { title, start, end }
    }

    /// Get the item's title
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Get the item's raw start string
    pub fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    /// Get the item's raw end string
    pub fn end(&self) -> Option<&str> {
        self.end.as_deref()
    }

    /// Parse the item's dates with `strategy` and place it as an [`Event`]
    ///
    /// An absent or unparseable start means no event.  An unparseable end
    /// degrades to an instantaneous event rather than losing the record,
    /// but an end before the start rejects the record outright.
    pub fn event(&self, strategy: Strategy) -> Option<Event> {
        let start = strategy.parse(self.start.as_deref()?)?;
        let end = self.end.as_deref().and_then(|end| strategy.parse(end));
        Event::from(start, end).ok()
    }
}

/// A placed timeline event: a start instant and an optional end instant
///
/// An event with no end is instantaneous.
#[derive(serde::Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Event {
    start: Instant,
    end: Option<Instant>,
}

impl Event {
    /// Create a valid [`Event`] if it is possible to do so with the instants
    /// passed in
    pub fn from(start: Instant, end: Option<Instant>) -> Result<Event, EventError> {
        if let Some(end) = end {
            if end < start {
                return Err(EventError::EndBeforeStart);
            }
        }
        Ok(Event { start, end })
    }

    /// Get the event's start
    pub fn start(&self) -> Instant {
        self.start
    }

    /// Get the event's end, if it has one
    pub fn end(&self) -> Option<Instant> {
        self.end
    }

    /// Whether the event is instantaneous (has no end)
    pub fn is_instant(&self) -> bool {
        self.end.is_none()
    }
}

/// A titled batch of feed items sharing one parsing [`Strategy`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dataset {
    title: Option<String>,
    strategy: Strategy,
    items: Vec<Item>,
}

impl Dataset {
    /// Create a [`Dataset`] from its parts
    pub fn from(title: Option<String>, strategy: Strategy, items: Vec<Item>) -> Dataset {
        Dataset {
            title,
            strategy,
            items,
        }
    }

    /// Load a dataset from the inline JSON feed format
    ///
    /// The `strategy` key holds one of the config keys `"iso8601"`,
    /// `"gregorian"` or `"hybrid"`; when absent the hybrid strategy is
    /// used.  An unrecognized key is a deserialization error, not a silent
    /// fallback.
    pub fn from_json(json: &str) -> Result<Dataset, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Get the dataset's title
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Get the dataset's parsing strategy
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Borrow the dataset's items
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Place every item as an event, index-aligned with [`Dataset::items`]
    ///
    /// Items whose dates cannot be parsed produce `None` and are logged,
    /// so one malformed record never aborts the batch.
    pub fn events(&self) -> Vec<Option<Event>> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let event = item.event(self.strategy);
                if event.is_none() {
                    warn!(
                        "Skipping item {index} (`{}`): no valid date",
                        item.title().unwrap_or("untitled")
                    );
                }
                event
            })
            .collect()
    }
}

#[derive(Deserialize)]
struct RawDataset {
    #[serde(default)]
    title: Option<String>,

    #[serde(default)]
    strategy: Option<String>,

    #[serde(default)]
    items: Vec<Item>,
}

impl<'de> Deserialize<'de> for Dataset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawDataset::deserialize(deserializer)?;
        let strategy = match raw.strategy {
            Some(key) => Strategy::from_str(&key).map_err(serde::de::Error::custom)?,
            None => Strategy::default(),
        };
        Ok(Dataset {
            title: raw.title,
            strategy,
            items: raw.items,
        })
    }
}
