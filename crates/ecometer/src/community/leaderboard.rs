use serde::Serialize;

use crate::usage::UserProfile;

/// Household on the static community leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommunityMember {
    pub name: &'static str,
    pub eco_score: u8,
    pub savings: &'static str,
    pub location: &'static str,
}

const fn member(
    name: &'static str,
    eco_score: u8,
    savings: &'static str,
    location: &'static str,
) -> CommunityMember {
    CommunityMember {
        name,
        eco_score,
        savings,
        location,
    }
}

static COMMUNITY: [CommunityMember; 8] = [
    member("Ali Khan", 94, "25%", "Lahore"),
    member("Sara Ahmed", 89, "18%", "Lahore"),
    member("Usman Tariq", 85, "15%", "Islamabad"),
    member("Fatima Malik", 82, "12%", "Lahore"),
    member("Ahmed Raza", 78, "10%", "Karachi"),
    member("Ayesha Siddiqui", 75, "8%", "Lahore"),
    member("Hassan Ali", 71, "5%", "Islamabad"),
    member("Zainab Hussain", 68, "3%", "Karachi"),
];

/// Fixture rankings, highest score first.
pub fn community_leaderboard() -> &'static [CommunityMember] {
    &COMMUNITY
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub name: String,
    pub eco_score: u8,
    pub savings: String,
    pub location: String,
    pub is_you: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankStatus {
    Leader,
    TopThree,
    TopTen,
    Growing,
}

impl RankStatus {
    fn from_rank(rank: usize) -> Self {
        match rank {
            1 => Self::Leader,
            2..=3 => Self::TopThree,
            4..=10 => Self::TopTen,
            _ => Self::Growing,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Leader => "Leader!",
            Self::TopThree => "Top 3!",
            Self::TopTen => "Top 10!",
            Self::Growing => "Growing",
        }
    }
}

/// Where the user landed on the overall board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub rank: usize,
    pub total: usize,
    pub top_percent: u8,
    pub status: RankStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSummary {
    pub location: String,
    pub rows: Vec<LeaderboardRow>,
    pub local_average: Option<f64>,
    pub national_average: f64,
    pub difference: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard {
    pub rows: Vec<LeaderboardRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
    pub local: LocationSummary,
}

impl Leaderboard {
    /// Places the user on the fixture board. A user without a score yet is
    /// left off the rankings.
    pub fn build(profile: &UserProfile, eco_score: u8) -> Self {
        let mut rows: Vec<LeaderboardRow> = community_leaderboard()
            .iter()
            .map(|member| LeaderboardRow {
                rank: 0,
                name: member.name.to_string(),
                eco_score: member.eco_score,
                savings: member.savings.to_string(),
                location: member.location.to_string(),
                is_you: false,
            })
            .collect();

        if eco_score > 0 {
            let you = LeaderboardRow {
                rank: 0,
                name: format!("{} (You)", profile.name),
                eco_score,
                savings: "N/A".to_string(),
                location: profile.location.clone(),
                is_you: true,
            };
            let position = rows
                .iter()
                .position(|row| eco_score > row.eco_score)
                .unwrap_or(rows.len());
            rows.insert(position, you);
        }

        for (index, row) in rows.iter_mut().enumerate() {
            row.rank = index + 1;
        }

        let total = rows.len();
        let placement = rows.iter().find(|row| row.is_you).map(|row| {
            let percentile = ((1.0 - row.rank as f64 / total as f64) * 100.0).floor() as u8;
            Placement {
                rank: row.rank,
                total,
                top_percent: 100 - percentile,
                status: RankStatus::from_rank(row.rank),
            }
        });

        let local = summarize_location(&rows, &profile.location);

        Self {
            rows,
            placement,
            local,
        }
    }
}

fn summarize_location(rows: &[LeaderboardRow], location: &str) -> LocationSummary {
    let local_rows: Vec<LeaderboardRow> = rows
        .iter()
        .filter(|row| row.location == location)
        .enumerate()
        .map(|(index, row)| LeaderboardRow {
            rank: index + 1,
            ..row.clone()
        })
        .collect();

    let national_average = mean_score(rows).unwrap_or(0.0);
    let local_average = mean_score(&local_rows);
    let difference = local_average
        .map(|local| local - national_average)
        .unwrap_or(0.0);

    LocationSummary {
        location: location.to_string(),
        rows: local_rows,
        local_average,
        national_average,
        difference,
    }
}

fn mean_score(rows: &[LeaderboardRow]) -> Option<f64> {
    if rows.is_empty() {
        return None;
    }
    let total: u32 = rows.iter().map(|row| u32::from(row.eco_score)).sum();
    Some(f64::from(total) / rows.len() as f64)
}
