use crate::core::errors::MatchError;
use crate::core::models::{MatchOutcome, Raster};

pub trait TemplateMatcher: Send + Sync {
    /// Best similarity of `template` over the same-size windows of `screen`.
    /// Fails with `MatchError::InvalidTemplate` when the template does not fit, and
    /// with `MatchError::Cancelled` once `keep_searching` returns false mid-search.
    fn find_best_match(
        &self,
        screen: &Raster,
        template: &Raster,
        keep_searching: &dyn Fn() -> bool,
    ) -> Result<MatchOutcome, MatchError>;
}
