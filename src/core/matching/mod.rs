mod normalized_cross_correlation;

pub use normalized_cross_correlation::NormalizedCrossCorrelationMatcher;
