//! Card deck types and their card lists

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

const MAJOR_ARCANA: [&str; 22] = [
    "The Fool",
    "The Magician",
    "The High Priestess",
    "The Empress",
    "The Emperor",
    "The Hierophant",
    "The Lovers",
    "The Chariot",
    "Strength",
    "The Hermit",
    "Wheel of Fortune",
    "Justice",
    "The Hanged Man",
    "Death",
    "Temperance",
    "The Devil",
    "The Tower",
    "The Star",
    "The Moon",
    "The Sun",
    "Judgement",
    "The World",
];

const MINOR_RANKS: [&str; 14] = [
    "Ace", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Page",
    "Knight", "Queen", "King",
];

const MINOR_SUITS: [&str; 4] = ["Wands", "Cups", "Swords", "Pentacles"];

const LENORMAND: [&str; 36] = [
    "Rider", "Clover", "Ship", "House", "Tree", "Clouds", "Snake", "Coffin", "Bouquet",
    "Scythe", "Whip", "Birds", "Child", "Fox", "Bear", "Stars", "Stork", "Dog", "Tower",
    "Garden", "Mountain", "Crossroads", "Mice", "Heart", "Ring", "Book", "Letter", "Man",
    "Woman", "Lily", "Sun", "Moon", "Key", "Fish", "Anchor", "Cross",
];

/// Card deck a reading is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckType {
    /// 78-card tarot deck
    #[default]
    RiderWaite,
    /// 36-card Lenormand deck
    Lenormand,
}

impl DeckType {
    /// Identifier used in settings and cache keys
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RiderWaite => "rider_waite",
            Self::Lenormand => "lenormand",
        }
    }

    /// Every card in the deck, in canonical order
    #[must_use]
    pub fn cards(&self) -> Vec<String> {
        match self {
            Self::RiderWaite => MAJOR_ARCANA
                .iter()
                .map(|card| (*card).to_string())
                .chain(MINOR_SUITS.iter().flat_map(|suit| {
                    MINOR_RANKS
                        .iter()
                        .map(move |rank| format!("{rank} of {suit}"))
                }))
                .collect(),
            Self::Lenormand => LENORMAND.iter().map(|card| (*card).to_string()).collect(),
        }
    }
}

impl fmt::Display for DeckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeckType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rider_waite" => Ok(Self::RiderWaite),
            "lenormand" => Ok(Self::Lenormand),
            other => Err(DomainError::UnknownDeck(other.to_string())),
        }
    }
}
