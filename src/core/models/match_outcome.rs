use crate::core::models::Point;
use crate::global_constants::MATCH_HIT_THRESHOLD;

/// Best correlation score of a template against a screen and where it occurred.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOutcome {
    pub score: f64,
    pub location: Point,
}

impl MatchOutcome {
    pub fn new(score: f64, location: Point) -> Self {
        Self { score, location }
    }

    pub fn is_hit(&self) -> bool {
        self.score > MATCH_HIT_THRESHOLD
    }
}
