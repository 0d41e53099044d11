use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    EcoChampion,
    EnergyStar,
    ConsistentTracker,
    LongTermSaver,
}

impl Badge {
    pub fn title(&self) -> &'static str {
        match self {
            Badge::EcoChampion => "Eco Champion",
            Badge::EnergyStar => "Energy Star",
            Badge::ConsistentTracker => "Consistent Tracker",
            Badge::LongTermSaver => "Long-term Saver",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Badge::EcoChampion => "EcoScore above 90",
            Badge::EnergyStar => "EcoScore above 80",
            Badge::ConsistentTracker => "3+ months of data",
            Badge::LongTermSaver => "6+ months of tracking",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub badge: Badge,
    pub title: &'static str,
    pub description: &'static str,
}

impl From<Badge> for Achievement {
    fn from(badge: Badge) -> Self {
        Self {
            badge,
            title: badge.title(),
            description: badge.description(),
        }
    }
}

/// Badges earned for the current state. Rules are independent, so a high
/// score earns both score badges.
pub fn achievements_for(eco_score: u8, months_tracked: usize) -> Vec<Achievement> {
    let rules = [
        (eco_score >= 90, Badge::EcoChampion),
        (eco_score >= 80, Badge::EnergyStar),
        (months_tracked >= 3, Badge::ConsistentTracker),
        (months_tracked >= 6, Badge::LongTermSaver),
    ];

    rules
        .into_iter()
        .filter(|(earned, _)| *earned)
        .map(|(_, badge)| Achievement::from(badge))
        .collect()
}
