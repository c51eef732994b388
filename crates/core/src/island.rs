//! Island records fetched from the Turnip.Exchange marketplace API.

use serde::{Deserialize, Serialize};

/// Reserved island name the API returns when no islands are open.
///
/// A batch consisting only of this placeholder must be treated as empty,
/// never as one real island.
pub const NO_ISLANDS_NAME: &str = "No Islands";

/// Which hemisphere an island's game is set to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    pub fn as_str(self) -> &'static str {
        match self {
            Hemisphere::North => "north",
            Hemisphere::South => "south",
        }
    }
}

/// One open island offer, immutable per fetch.
///
/// Island names are unique within a fetch batch and serve as the snapshot
/// key. Field names follow the marketplace API's camelCase JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Island {
    /// Island name, the snapshot key.
    pub name: String,
    /// Price per turnip in bells.
    pub turnip_price: u32,
    /// Opaque code used to build the deep link to the island page.
    pub turnip_code: String,
    pub hemisphere: Hemisphere,
    /// Entry fee flag (0 = free, 1 = fee required).
    #[serde(default)]
    pub fee: u8,
    /// Queue fullness as a "used/total" fraction string.
    pub queued: String,
    #[serde(default)]
    pub max_queue: u32,
    /// Host rating, meaningful only when `rating_count > 0`.
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub rating_count: u32,
    #[serde(default)]
    pub description: String,
    /// Creation timestamp as reported by the API, kept opaque.
    #[serde(default)]
    pub creation_time: String,
    #[serde(default)]
    pub islander: String,
    #[serde(default)]
    pub category: String,
}

impl Island {
    /// True when this record is the "no islands available" placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.name == NO_ISLANDS_NAME
    }

    /// True when the island charges an entry fee.
    #[inline]
    pub fn has_fee(&self) -> bool {
        self.fee != 0
    }

    /// Queue pressure derived from the `queued` fraction.
    pub fn queue_load(&self) -> QueueLoad {
        QueueLoad::from_fraction(&self.queued)
    }
}

/// True when a fetch batch means "no islands currently open".
pub fn no_islands(islands: &[Island]) -> bool {
    islands.is_empty() || islands.iter().all(Island::is_placeholder)
}

/// Three-level traffic-light indicator for queue fullness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueLoad {
    /// Ratio <= 0.2
    Low,
    /// Ratio <= 0.5
    Medium,
    /// Everything else, including unparsable fractions.
    High,
}

impl QueueLoad {
    /// Classify a "used/total" fraction string.
    ///
    /// A zero denominator or a fraction that does not parse maps to `High`
    /// rather than failing; the upstream API occasionally emits garbage here
    /// and a full queue is the safe reading.
    pub fn from_fraction(fraction: &str) -> Self {
        let Some((used, total)) = fraction.split_once('/') else {
            return QueueLoad::High;
        };
        let (Ok(used), Ok(total)) = (used.trim().parse::<f64>(), total.trim().parse::<f64>())
        else {
            return QueueLoad::High;
        };
        if total <= 0.0 {
            return QueueLoad::High;
        }
        let ratio = used / total;
        if ratio <= 0.2 {
            QueueLoad::Low
        } else if ratio <= 0.5 {
            QueueLoad::Medium
        } else {
            QueueLoad::High
        }
    }

    /// Traffic-light emoji used in Telegram messages.
    pub fn emoji(self) -> &'static str {
        match self {
            QueueLoad::Low => "🟩",
            QueueLoad::Medium => "🟨",
            QueueLoad::High => "🟥",
        }
    }
}
