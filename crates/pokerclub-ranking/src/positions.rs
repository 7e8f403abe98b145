//! Competition ranking for leaderboards.
//!
//! Equal points share a position and the next distinct score skips ahead by
//! the size of the tie: 100, 100, 50 ranks as 1, 1, 3. This is the rule
//! `PostgreSQL`'s `RANK()` window function implements, so the single-row
//! position query and the leaderboard agree.

use pokerclub_types::{Ranking, RankingPosition};

/// Assign competition positions to a semester's rankings, best first.
///
/// Rows with equal points are listed by membership id so the output order
/// is deterministic.
pub fn competition_positions(mut rankings: Vec<Ranking>) -> Vec<RankingPosition> {
    rankings.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| a.membership_id.cmp(&b.membership_id))
    });

    let mut positions: Vec<RankingPosition> = Vec::with_capacity(rankings.len());
    for (index, ranking) in rankings.iter().enumerate() {
        let position = match positions.last() {
            Some(previous) if previous.points == ranking.points => previous.position,
            _ => u32::try_from(index).unwrap_or(u32::MAX).saturating_add(1),
        };
        positions.push(RankingPosition {
            membership_id: ranking.membership_id,
            points: ranking.points,
            position,
        });
    }
    positions
}
