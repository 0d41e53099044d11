//! Static community fixtures: the leaderboard and the monthly challenges.

pub mod challenges;
pub mod leaderboard;

pub use challenges::{monthly_challenge, Challenge, CHALLENGES};
pub use leaderboard::{
    community_leaderboard, CommunityMember, Leaderboard, LeaderboardRow, LocationSummary,
    Placement, RankStatus,
};
