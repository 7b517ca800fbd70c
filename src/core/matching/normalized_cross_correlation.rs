use crate::core::errors::MatchError;
use crate::core::interfaces::adapters::TemplateMatcher;
use crate::core::models::{MatchOutcome, Point, Raster};
use crate::global_constants::{
    FLAT_REGION_CHANNEL_TOLERANCE, LOG_TAG_MATCHER, MATCH_EXHAUSTIVE_SEARCH_BUDGET,
    MATCH_PYRAMID_CANDIDATE_COUNT, MATCH_PYRAMID_MIN_TEMPLATE_SIDE, MATCH_PYRAMID_REFINE_RADIUS,
};

const CHANNEL_COUNT: usize = 3;

/// Zero-mean normalized cross-correlation taken jointly over the R, G and B channels.
///
/// Small searches score every window position. Larger ones build an image pyramid,
/// search the coarsest level exhaustively and re-score the best candidates in a small
/// neighbourhood on each finer level. Window statistics come from integral images and
/// the correlation term is accumulated in integers, so an exact crop scores exactly 1.
pub struct NormalizedCrossCorrelationMatcher;

impl NormalizedCrossCorrelationMatcher {
    pub fn initialize() -> Self {
        log::debug!("{} initializing normalized cross-correlation matcher", LOG_TAG_MATCHER);
        Self
    }

    fn ensure_template_fits(screen: &Raster, template: &Raster) -> Result<(), MatchError> {
        let is_empty = template.width() == 0 || template.height() == 0;
        let is_oversized =
            template.width() > screen.width() || template.height() > screen.height();

        if is_empty || is_oversized {
            return Err(MatchError::InvalidTemplate {
                template_width: template.width(),
                template_height: template.height(),
                screen_width: screen.width(),
                screen_height: screen.height(),
            });
        }

        Ok(())
    }
}

impl TemplateMatcher for NormalizedCrossCorrelationMatcher {
    fn find_best_match(
        &self,
        screen: &Raster,
        template: &Raster,
        keep_searching: &dyn Fn() -> bool,
    ) -> Result<MatchOutcome, MatchError> {
        Self::ensure_template_fits(screen, template)?;

        let search = CorrelationSearch::build(screen, template);
        let outcome = search.run(keep_searching).ok_or(MatchError::Cancelled)?;

        log::trace!(
            "{} best score {:.4} at {} ({}x{} template on {}x{} screen, {} level(s))",
            LOG_TAG_MATCHER,
            outcome.score,
            outcome.location,
            template.width(),
            template.height(),
            screen.width(),
            screen.height(),
            search.level_count()
        );

        Ok(outcome)
    }
}

/// Planar R, G and B bytes of a raster. Alpha is ignored.
struct ColourPlanes {
    width: usize,
    height: usize,
    channels: [Vec<u8>; CHANNEL_COUNT],
}

impl ColourPlanes {
    fn from_raster(raster: &Raster) -> Self {
        let pixel_count = raster.width() as usize * raster.height() as usize;
        let mut channels: [Vec<u8>; CHANNEL_COUNT] =
            std::array::from_fn(|_| Vec::with_capacity(pixel_count));

        for pixel in raster.as_rgba_image().pixels() {
            for (channel, plane) in channels.iter_mut().enumerate() {
                plane.push(pixel[channel]);
            }
        }

        Self {
            width: raster.width() as usize,
            height: raster.height() as usize,
            channels,
        }
    }

    /// 2x2 box average. An odd last row or column is dropped.
    fn half_size(&self) -> Self {
        let width = self.width / 2;
        let height = self.height / 2;

        let channels = std::array::from_fn(|channel| {
            let source = &self.channels[channel];
            let mut plane = Vec::with_capacity(width * height);
            for y in 0..height {
                let upper = 2 * y * self.width;
                let lower = upper + self.width;
                for x in 0..width {
                    let total = u16::from(source[upper + 2 * x])
                        + u16::from(source[upper + 2 * x + 1])
                        + u16::from(source[lower + 2 * x])
                        + u16::from(source[lower + 2 * x + 1]);
                    plane.push(((total + 2) / 4) as u8);
                }
            }
            plane
        });

        Self {
            width,
            height,
            channels,
        }
    }

    fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Summed-area tables of values and squared values, one row/column larger than the plane.
struct IntegralImage {
    stride: usize,
    sums: Vec<u64>,
    squared_sums: Vec<u64>,
}

impl IntegralImage {
    fn build(plane: &[u8], width: usize, height: usize) -> Self {
        let stride = width + 1;
        let mut sums = vec![0u64; stride * (height + 1)];
        let mut squared_sums = vec![0u64; stride * (height + 1)];

        for y in 0..height {
            let mut row_sum = 0u64;
            let mut row_squared_sum = 0u64;
            for x in 0..width {
                let value = u64::from(plane[y * width + x]);
                row_sum += value;
                row_squared_sum += value * value;

                let index = (y + 1) * stride + (x + 1);
                sums[index] = sums[index - stride] + row_sum;
                squared_sums[index] = squared_sums[index - stride] + row_squared_sum;
            }
        }

        Self {
            stride,
            sums,
            squared_sums,
        }
    }

    fn window_totals(&self, x: usize, y: usize, width: usize, height: usize) -> (u64, u64) {
        let top_left = y * self.stride + x;
        let top_right = top_left + width;
        let bottom_left = (y + height) * self.stride + x;
        let bottom_right = bottom_left + width;

        let area = |table: &[u64]| {
            table[bottom_right] + table[top_left] - table[top_right] - table[bottom_left]
        };

        (area(&self.sums), area(&self.squared_sums))
    }
}

/// `n * sum(v^2) - sum(v)^2`, i.e. n² times the variance. Zero means the channel is flat.
fn scaled_variance(pixel_count: u64, sum: u64, squared_sum: u64) -> i128 {
    i128::from(pixel_count) * i128::from(squared_sum) - i128::from(sum) * i128::from(sum)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    x: usize,
    y: usize,
    score: f64,
}

/// Best-scoring window positions, kept at least `separation + 1` apart on some axis.
struct CandidateList {
    capacity: usize,
    separation: usize,
    entries: Vec<Candidate>,
}

impl CandidateList {
    fn with_capacity(capacity: usize, separation: usize) -> Self {
        Self {
            capacity,
            separation,
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Equal scores never displace an earlier entry.
    fn offer(&mut self, candidate: Candidate) {
        let separation = self.separation;
        if let Some(neighbour) = self.entries.iter_mut().find(|entry| {
            entry.x.abs_diff(candidate.x) <= separation
                && entry.y.abs_diff(candidate.y) <= separation
        }) {
            if candidate.score > neighbour.score {
                *neighbour = candidate;
            }
            return;
        }

        if self.entries.len() < self.capacity {
            self.entries.push(candidate);
            return;
        }

        if let Some(weakest) = self
            .entries
            .iter_mut()
            .min_by(|left, right| left.score.total_cmp(&right.score))
        {
            if candidate.score > weakest.score {
                *weakest = candidate;
            }
        }
    }

    /// Highest score; ties go to the earliest position in row-major order.
    fn best(&self) -> Option<Candidate> {
        self.entries.iter().copied().fold(None, |best, candidate| match best {
            Some(current)
                if candidate.score < current.score
                    || (candidate.score == current.score
                        && (candidate.y, candidate.x) >= (current.y, current.x)) =>
            {
                Some(current)
            }
            _ => Some(candidate),
        })
    }
}

/// Screen and template at one pyramid resolution, with the template statistics
/// and screen integral images needed to score any window in O(template) time.
struct SearchLevel {
    screen: ColourPlanes,
    template: ColourPlanes,
    integrals: Vec<IntegralImage>,
    pixel_count: u64,
    template_sums: [u64; CHANNEL_COUNT],
    template_scaled_variance: i128,
}

impl SearchLevel {
    fn build(screen: ColourPlanes, template: ColourPlanes) -> Self {
        let pixel_count = template.pixel_count();
        let integrals = screen
            .channels
            .iter()
            .map(|plane| IntegralImage::build(plane, screen.width, screen.height))
            .collect();

        let mut template_sums = [0u64; CHANNEL_COUNT];
        let mut template_scaled_variance = 0i128;
        for (channel, plane) in template.channels.iter().enumerate() {
            let (sum, squared_sum) = plane
                .iter()
                .map(|&value| u64::from(value))
                .fold((0u64, 0u64), |(sum, squared), value| {
                    (sum + value, squared + value * value)
                });
            template_sums[channel] = sum;
            template_scaled_variance += scaled_variance(pixel_count, sum, squared_sum);
        }

        Self {
            screen,
            template,
            integrals,
            pixel_count,
            template_sums,
            template_scaled_variance,
        }
    }

    fn last_x(&self) -> usize {
        self.screen.width - self.template.width
    }

    fn last_y(&self) -> usize {
        self.screen.height - self.template.height
    }

    /// Multiply-adds an exhaustive search of this level costs per channel.
    fn exhaustive_cost(&self) -> u64 {
        (self.last_x() as u64 + 1) * (self.last_y() as u64 + 1) * self.pixel_count
    }

    fn can_halve(&self) -> bool {
        self.template.width / 2 >= MATCH_PYRAMID_MIN_TEMPLATE_SIDE
            && self.template.height / 2 >= MATCH_PYRAMID_MIN_TEMPLATE_SIDE
    }

    fn half_size(&self) -> Self {
        Self::build(self.screen.half_size(), self.template.half_size())
    }

    /// Scores every window row by row, checking `keep_searching` before each row.
    fn search_all(
        &self,
        candidates: &mut CandidateList,
        keep_searching: &dyn Fn() -> bool,
    ) -> Option<()> {
        for y in 0..=self.last_y() {
            if !keep_searching() {
                return None;
            }
            for x in 0..=self.last_x() {
                candidates.offer(Candidate {
                    x,
                    y,
                    score: self.score_window(x, y),
                });
            }
        }
        Some(())
    }

    /// Re-scores the neighbourhood of each coarser-level candidate at this resolution.
    fn refine(
        &self,
        coarse_candidates: &CandidateList,
        candidates: &mut CandidateList,
        keep_searching: &dyn Fn() -> bool,
    ) -> Option<()> {
        for coarse in &coarse_candidates.entries {
            if !keep_searching() {
                return None;
            }

            let first_x = (2 * coarse.x).saturating_sub(MATCH_PYRAMID_REFINE_RADIUS);
            let first_y = (2 * coarse.y).saturating_sub(MATCH_PYRAMID_REFINE_RADIUS);
            let end_x = (2 * coarse.x + 1 + MATCH_PYRAMID_REFINE_RADIUS).min(self.last_x());
            let end_y = (2 * coarse.y + 1 + MATCH_PYRAMID_REFINE_RADIUS).min(self.last_y());

            for y in first_y..=end_y {
                for x in first_x..=end_x {
                    candidates.offer(Candidate {
                        x,
                        y,
                        score: self.score_window(x, y),
                    });
                }
            }
        }
        Some(())
    }

    fn score_window(&self, x: usize, y: usize) -> f64 {
        let mut window_sums = [0u64; CHANNEL_COUNT];
        let mut window_scaled_variance = 0i128;
        for (channel, integral) in self.integrals.iter().enumerate() {
            let (sum, squared_sum) =
                integral.window_totals(x, y, self.template.width, self.template.height);
            window_sums[channel] = sum;
            window_scaled_variance += scaled_variance(self.pixel_count, sum, squared_sum);
        }

        if self.template_scaled_variance == 0 {
            return self.score_flat_template(&window_sums, window_scaled_variance);
        }
        if window_scaled_variance == 0 {
            return 0.0;
        }

        let numerator: i128 = (0..CHANNEL_COUNT)
            .map(|channel| {
                i128::from(self.pixel_count) * i128::from(self.cross_correlation_sum(channel, x, y))
                    - i128::from(self.template_sums[channel]) * i128::from(window_sums[channel])
            })
            .sum();
        let denominator = (self.template_scaled_variance as f64).sqrt()
            * (window_scaled_variance as f64).sqrt();

        (numerator as f64 / denominator).clamp(-1.0, 1.0)
    }

    fn score_flat_template(
        &self,
        window_sums: &[u64; CHANNEL_COUNT],
        window_scaled_variance: i128,
    ) -> f64 {
        if window_scaled_variance != 0 {
            return 0.0;
        }

        let pixel_count = self.pixel_count as f64;
        let same_colour = self
            .template_sums
            .iter()
            .zip(window_sums)
            .all(|(&template_sum, &window_sum)| {
                let template_mean = template_sum as f64 / pixel_count;
                let window_mean = window_sum as f64 / pixel_count;
                (template_mean - window_mean).abs() <= FLAT_REGION_CHANNEL_TOLERANCE
            });

        if same_colour {
            1.0
        } else {
            0.0
        }
    }

    fn cross_correlation_sum(&self, channel: usize, x: usize, y: usize) -> u64 {
        let screen_width = self.screen.width;
        let template_width = self.template.width;
        let screen_pixels = &self.screen.channels[channel];
        let template_pixels = &self.template.channels[channel];

        template_pixels
            .chunks_exact(template_width)
            .enumerate()
            .map(|(row, template_row)| {
                let start = (y + row) * screen_width + x;
                let screen_row = &screen_pixels[start..start + template_width];
                template_row
                    .iter()
                    .zip(screen_row)
                    .map(|(&t, &s)| u64::from(t) * u64::from(s))
                    .sum::<u64>()
            })
            .sum()
    }
}

/// Pyramid of search levels; index 0 is full resolution.
struct CorrelationSearch {
    levels: Vec<SearchLevel>,
}

impl CorrelationSearch {
    fn build(screen: &Raster, template: &Raster) -> Self {
        let mut levels = vec![SearchLevel::build(
            ColourPlanes::from_raster(screen),
            ColourPlanes::from_raster(template),
        )];

        while let Some(coarsest) = levels.last() {
            if coarsest.exhaustive_cost() <= MATCH_EXHAUSTIVE_SEARCH_BUDGET || !coarsest.can_halve()
            {
                break;
            }
            let coarser = coarsest.half_size();
            levels.push(coarser);
        }

        Self { levels }
    }

    fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// `None` when `keep_searching` turned false before the search finished.
    fn run(&self, keep_searching: &dyn Fn() -> bool) -> Option<MatchOutcome> {
        let (coarsest, finer_levels) = self.levels.split_last()?;

        let mut candidates = if finer_levels.is_empty() {
            CandidateList::with_capacity(1, 0)
        } else {
            CandidateList::with_capacity(MATCH_PYRAMID_CANDIDATE_COUNT, MATCH_PYRAMID_REFINE_RADIUS)
        };
        coarsest.search_all(&mut candidates, keep_searching)?;

        for level in finer_levels.iter().rev() {
            let mut refined = CandidateList::with_capacity(
                MATCH_PYRAMID_CANDIDATE_COUNT,
                MATCH_PYRAMID_REFINE_RADIUS,
            );
            level.refine(&candidates, &mut refined, keep_searching)?;
            candidates = refined;
        }

        candidates.best().map(|best| {
            MatchOutcome::new(best.score, Point::at_coordinates(best.x as i32, best.y as i32))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::global_constants::MATCH_HIT_THRESHOLD;
    use image::{Rgba, RgbaImage};
    use std::cell::Cell;

    const SCORE_TOLERANCE: f64 = 1e-9;

    fn keep_going() -> bool {
        true
    }

    fn create_textured_screen(width: u32, height: u32) -> Raster {
        Raster::from_rgba_image(RgbaImage::from_fn(width, height, |x, y| {
            let value = (x * 37 + y * 91 + (x * y) % 23) % 251;
            Rgba([value as u8, (value * 3 % 256) as u8, (255 - value) as u8, 255])
        }))
    }

    /// Smooth, non-repeating colour field, closer to real screen content than noise.
    fn create_smooth_screen(width: u32, height: u32) -> Raster {
        Raster::from_rgba_image(RgbaImage::from_fn(width, height, |x, y| {
            let (fx, fy) = (f64::from(x), f64::from(y));
            let channel = |phase: f64| {
                let value = 128.0
                    + 50.0 * (fx / 11.0 + phase).sin()
                    + 40.0 * (fy / 7.0 + fx / 23.0 + phase).cos()
                    + 30.0 * (fx * fy / 900.0 + phase).sin();
                value.clamp(0.0, 255.0) as u8
            };
            Rgba([channel(0.0), channel(1.3), channel(2.9), 255])
        }))
    }

    fn create_solid_raster(width: u32, height: u32, colour: [u8; 4]) -> Raster {
        Raster::from_rgba_image(RgbaImage::from_pixel(width, height, Rgba(colour)))
    }

    fn create_checker(width: u32, height: u32, cell: u32, colour: [u8; 4]) -> Raster {
        Raster::from_rgba_image(RgbaImage::from_fn(width, height, |x, y| {
            if (x / cell + y / cell) % 2 == 0 {
                Rgba(colour)
            } else {
                Rgba([0, 0, 0, 255])
            }
        }))
    }

    #[test]
    fn test_exact_crop_scores_one_at_crop_location() {
        let matcher = NormalizedCrossCorrelationMatcher::initialize();
        let screen = create_textured_screen(80, 60);

        for (x, y, width, height) in [(0, 0, 8, 8), (31, 17, 12, 9), (68, 51, 12, 9)] {
            let template = screen.crop_region(x, y, width, height).unwrap();

            let outcome = matcher.find_best_match(&screen, &template, &keep_going).unwrap();

            assert!((outcome.score - 1.0).abs() < SCORE_TOLERANCE, "score {}", outcome.score);
            assert_eq!(outcome.location, Point::at_coordinates(x as i32, y as i32));
        }
    }

    #[test]
    fn test_template_equal_to_screen_matches_at_origin() {
        let matcher = NormalizedCrossCorrelationMatcher::initialize();
        let screen = create_textured_screen(20, 15);

        let outcome = matcher.find_best_match(&screen, &screen, &keep_going).unwrap();

        assert!((outcome.score - 1.0).abs() < SCORE_TOLERANCE);
        assert_eq!(outcome.location, Point::origin());
    }

    #[test]
    fn test_large_search_uses_pyramid_and_finds_exact_crop() {
        let matcher = NormalizedCrossCorrelationMatcher::initialize();
        let screen = create_smooth_screen(480, 320);
        let template = screen.crop_region(201, 143, 64, 48).unwrap();

        let search = CorrelationSearch::build(&screen, &template);
        let outcome = matcher.find_best_match(&screen, &template, &keep_going).unwrap();

        assert!(search.level_count() > 1);
        assert!((outcome.score - 1.0).abs() < SCORE_TOLERANCE, "score {}", outcome.score);
        assert_eq!(outcome.location, Point::at_coordinates(201, 143));
    }

    #[test]
    fn test_small_search_stays_exhaustive() {
        let screen = create_textured_screen(100, 100);
        let template = screen.crop_region(20, 20, 10, 10).unwrap();

        let search = CorrelationSearch::build(&screen, &template);

        assert_eq!(search.level_count(), 1);
    }

    #[test]
    fn test_same_pattern_in_other_colour_is_not_a_hit() {
        let matcher = NormalizedCrossCorrelationMatcher::initialize();
        let screen = create_checker(36, 36, 3, [76, 76, 76, 255]);
        let template = create_checker(12, 12, 3, [255, 0, 0, 255]);

        let outcome = matcher.find_best_match(&screen, &template, &keep_going).unwrap();

        assert!(
            (outcome.score - 1.0 / 3f64.sqrt()).abs() < SCORE_TOLERANCE,
            "score {}",
            outcome.score
        );
        assert!(outcome.score <= MATCH_HIT_THRESHOLD);
        assert!(!outcome.is_hit());
    }

    #[test]
    fn test_same_pattern_in_same_colour_is_a_hit() {
        let matcher = NormalizedCrossCorrelationMatcher::initialize();
        let screen = create_checker(36, 36, 3, [255, 0, 0, 255]);
        let template = create_checker(12, 12, 3, [255, 0, 0, 255]);

        let outcome = matcher.find_best_match(&screen, &template, &keep_going).unwrap();

        assert!((outcome.score - 1.0).abs() < SCORE_TOLERANCE);
        assert_eq!(outcome.location, Point::origin());
    }

    #[test]
    fn test_search_stops_when_asked() {
        let matcher = NormalizedCrossCorrelationMatcher::initialize();
        let screen = create_smooth_screen(640, 360);
        let template = screen.crop_region(300, 200, 64, 64).unwrap();
        let checks = Cell::new(0usize);
        let stop_immediately = || {
            checks.set(checks.get() + 1);
            false
        };

        let result = matcher.find_best_match(&screen, &template, &stop_immediately);

        assert!(matches!(result, Err(MatchError::Cancelled)));
        assert_eq!(checks.get(), 1);
    }

    #[test]
    fn test_template_wider_than_screen_is_invalid() {
        let matcher = NormalizedCrossCorrelationMatcher::initialize();
        let screen = create_textured_screen(20, 20);
        let template = create_textured_screen(21, 5);

        let result = matcher.find_best_match(&screen, &template, &keep_going);

        assert!(matches!(
            result,
            Err(MatchError::InvalidTemplate {
                template_width: 21,
                screen_width: 20,
                ..
            })
        ));
    }

    #[test]
    fn test_template_taller_than_screen_is_invalid() {
        let matcher = NormalizedCrossCorrelationMatcher::initialize();
        let screen = create_textured_screen(20, 20);
        let template = create_textured_screen(5, 21);

        let result = matcher.find_best_match(&screen, &template, &keep_going);

        assert!(matches!(result, Err(MatchError::InvalidTemplate { .. })));
    }

    #[test]
    fn test_empty_template_is_invalid() {
        let matcher = NormalizedCrossCorrelationMatcher::initialize();
        let screen = create_textured_screen(20, 20);
        let template = Raster::from_rgba_image(RgbaImage::new(0, 4));

        let result = matcher.find_best_match(&screen, &template, &keep_going);

        assert!(matches!(
            result,
            Err(MatchError::InvalidTemplate {
                template_width: 0,
                ..
            })
        ));
    }

    #[test]
    fn test_inverted_template_scores_minus_one() {
        let matcher = NormalizedCrossCorrelationMatcher::initialize();
        let screen = Raster::from_rgba_image(RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        }));
        let template = Raster::from_rgba_image(RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        }));

        let outcome = matcher.find_best_match(&screen, &template, &keep_going).unwrap();

        assert!((outcome.score + 1.0).abs() < SCORE_TOLERANCE);
    }

    #[test]
    fn test_flat_template_matches_flat_window_of_same_colour() {
        let matcher = NormalizedCrossCorrelationMatcher::initialize();
        let mut pixels = create_textured_screen(50, 50).as_rgba_image().clone();
        for y in 10..16 {
            for x in 30..36 {
                pixels.put_pixel(x, y, Rgba([200, 40, 40, 255]));
            }
        }
        let screen = Raster::from_rgba_image(pixels);
        let template = create_solid_raster(6, 6, [200, 40, 40, 255]);

        let outcome = matcher.find_best_match(&screen, &template, &keep_going).unwrap();

        assert_eq!(outcome.score, 1.0);
        assert_eq!(outcome.location, Point::at_coordinates(30, 10));
    }

    #[test]
    fn test_flat_template_on_differently_coloured_flat_screen_scores_zero() {
        let matcher = NormalizedCrossCorrelationMatcher::initialize();
        let screen = create_solid_raster(30, 30, [0, 0, 255, 255]);
        let template = create_solid_raster(5, 5, [255, 255, 0, 255]);

        let outcome = matcher.find_best_match(&screen, &template, &keep_going).unwrap();

        assert_eq!(outcome.score, 0.0);
        assert!(!outcome.is_hit());
    }

    #[test]
    fn test_flat_template_with_same_brightness_but_other_hue_scores_zero() {
        let matcher = NormalizedCrossCorrelationMatcher::initialize();
        let screen = create_solid_raster(20, 20, [0, 100, 0, 255]);
        let template = create_solid_raster(4, 4, [100, 0, 0, 255]);

        let outcome = matcher.find_best_match(&screen, &template, &keep_going).unwrap();

        assert_eq!(outcome.score, 0.0);
    }

    #[test]
    fn test_textured_template_on_flat_screen_scores_zero() {
        let matcher = NormalizedCrossCorrelationMatcher::initialize();
        let screen = create_solid_raster(30, 30, [90, 90, 90, 255]);
        let template = create_textured_screen(30, 30).crop_region(2, 2, 6, 6).unwrap();

        let outcome = matcher.find_best_match(&screen, &template, &keep_going).unwrap();

        assert_eq!(outcome.score, 0.0);
    }

    #[test]
    fn test_scores_stay_within_unit_interval() {
        let matcher = NormalizedCrossCorrelationMatcher::initialize();
        let screen = create_textured_screen(40, 40);
        let template = Raster::from_rgba_image(RgbaImage::from_fn(7, 5, |x, y| {
            Rgba([((x * 50 + y * 13) % 256) as u8, 0, 0, 255])
        }));

        let outcome = matcher.find_best_match(&screen, &template, &keep_going).unwrap();

        assert!((-1.0..=1.0).contains(&outcome.score));
    }

    #[test]
    fn test_integral_image_window_totals_match_direct_sum() {
        let plane: Vec<u8> = (0..4u8)
            .flat_map(|y| (0..6u8).map(move |x| x + 10 * y))
            .collect();
        let integral = IntegralImage::build(&plane, 6, 4);

        let (sum, squared_sum) = integral.window_totals(2, 1, 3, 2);

        let expected: Vec<u64> = [12u64, 13, 14, 22, 23, 24].to_vec();
        assert_eq!(sum, expected.iter().sum::<u64>());
        assert_eq!(squared_sum, expected.iter().map(|v| v * v).sum::<u64>());
    }

    #[test]
    fn test_half_size_averages_two_by_two_blocks() {
        let raster = Raster::from_rgba_image(RgbaImage::from_fn(5, 2, |x, _| {
            Rgba([(x * 10) as u8, 200, 0, 255])
        }));

        let half = ColourPlanes::from_raster(&raster).half_size();

        assert_eq!((half.width, half.height), (2, 1));
        assert_eq!(half.channels[0], vec![5, 25]);
        assert_eq!(half.channels[1], vec![200, 200]);
    }

    #[test]
    fn test_candidate_list_keeps_first_of_equal_scores() {
        let mut candidates = CandidateList::with_capacity(1, 0);

        candidates.offer(Candidate { x: 4, y: 0, score: 0.9 });
        candidates.offer(Candidate { x: 1, y: 3, score: 0.9 });

        assert_eq!(candidates.best(), Some(Candidate { x: 4, y: 0, score: 0.9 }));
    }

    #[test]
    fn test_candidate_list_merges_close_neighbours() {
        let mut candidates = CandidateList::with_capacity(4, 2);

        candidates.offer(Candidate { x: 10, y: 10, score: 0.5 });
        candidates.offer(Candidate { x: 11, y: 12, score: 0.8 });
        candidates.offer(Candidate { x: 30, y: 10, score: 0.6 });

        assert_eq!(candidates.entries.len(), 2);
        assert_eq!(candidates.best(), Some(Candidate { x: 11, y: 12, score: 0.8 }));
    }

    #[test]
    fn test_candidate_list_replaces_weakest_when_full() {
        let mut candidates = CandidateList::with_capacity(2, 0);

        candidates.offer(Candidate { x: 0, y: 0, score: 0.2 });
        candidates.offer(Candidate { x: 5, y: 0, score: 0.7 });
        candidates.offer(Candidate { x: 9, y: 0, score: 0.4 });

        let mut scores: Vec<f64> = candidates.entries.iter().map(|entry| entry.score).collect();
        scores.sort_by(f64::total_cmp);
        assert_eq!(scores, vec![0.4, 0.7]);
    }
}
