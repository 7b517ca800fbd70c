use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use image::{Rgba, RgbaImage};

use crate::core::errors::{CaptureError, MatchError};
use crate::core::interfaces::adapters::TemplateMatcher;
use crate::core::interfaces::ports::{InputInjector, ScreenCapturer};
use crate::core::models::{MatchOutcome, MonitorTimings, Point, Raster, RunSignal};

pub fn fast_timings() -> MonitorTimings {
    MonitorTimings {
        inter_click_delay: Duration::from_millis(1),
        cooldown: Duration::from_millis(2),
        idle_delay: Duration::from_millis(1),
        capture_backoff: Duration::from_millis(2),
    }
}

pub fn textured_raster(width: u32, height: u32) -> Raster {
    Raster::from_rgba_image(RgbaImage::from_fn(width, height, |x, y| {
        let value = (x * 29 + y * 71 + (x * y) % 19) % 241;
        Rgba([value as u8, (value * 5 % 256) as u8, (240 - value) as u8, 255])
    }))
}

pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    condition()
}

pub struct StaticCapturer {
    screen: Raster,
}

impl StaticCapturer {
    pub fn new(screen: Raster) -> Self {
        Self { screen }
    }
}

impl ScreenCapturer for StaticCapturer {
    fn capture_full(&self) -> Result<Raster, CaptureError> {
        Ok(self.screen.clone())
    }

    fn capture_region(
        &self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> Result<Raster, CaptureError> {
        self.screen
            .crop_region(x.max(0) as u32, y.max(0) as u32, width, height)
    }
}

#[derive(Default)]
pub struct FailingCapturer {
    calls: AtomicUsize,
}

impl FailingCapturer {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ScreenCapturer for FailingCapturer {
    fn capture_full(&self) -> Result<Raster, CaptureError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CaptureError::Backend("screen locked".to_string()))
    }

    fn capture_region(
        &self,
        _x: i32,
        _y: i32,
        _width: u32,
        _height: u32,
    ) -> Result<Raster, CaptureError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CaptureError::Backend("screen locked".to_string()))
    }
}

pub struct FixedScoreMatcher {
    score: f64,
    calls: AtomicUsize,
}

impl FixedScoreMatcher {
    pub fn new(score: f64) -> Self {
        Self {
            score,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TemplateMatcher for FixedScoreMatcher {
    fn find_best_match(
        &self,
        _screen: &Raster,
        _template: &Raster,
        _keep_searching: &dyn Fn() -> bool,
    ) -> Result<MatchOutcome, MatchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(MatchOutcome::new(self.score, Point::origin()))
    }
}

pub struct AlwaysFailingMatcher;

impl TemplateMatcher for AlwaysFailingMatcher {
    fn find_best_match(
        &self,
        screen: &Raster,
        template: &Raster,
        _keep_searching: &dyn Fn() -> bool,
    ) -> Result<MatchOutcome, MatchError> {
        Err(MatchError::InvalidTemplate {
            template_width: template.width(),
            template_height: template.height(),
            screen_width: screen.width(),
            screen_height: screen.height(),
        })
    }
}

/// Takes `search_time` per match unless cancelled, checking `keep_searching`
/// every few milliseconds the way a row-by-row search does.
pub struct SlowMatcher {
    search_time: Duration,
    cancellations: AtomicUsize,
}

impl SlowMatcher {
    pub fn new(search_time: Duration) -> Self {
        Self {
            search_time,
            cancellations: AtomicUsize::new(0),
        }
    }

    pub fn cancellation_count(&self) -> usize {
        self.cancellations.load(Ordering::SeqCst)
    }
}

impl TemplateMatcher for SlowMatcher {
    fn find_best_match(
        &self,
        _screen: &Raster,
        _template: &Raster,
        keep_searching: &dyn Fn() -> bool,
    ) -> Result<MatchOutcome, MatchError> {
        let deadline = Instant::now() + self.search_time;
        while Instant::now() < deadline {
            if !keep_searching() {
                self.cancellations.fetch_add(1, Ordering::SeqCst);
                return Err(MatchError::Cancelled);
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        Ok(MatchOutcome::new(0.0, Point::origin()))
    }
}

/// Records clicks; optionally requests a stop once a given number of clicks was issued.
#[derive(Default)]
pub struct RecordingInjector {
    clicks: Mutex<Vec<Point>>,
    stop_after: Option<(usize, Arc<RunSignal>)>,
}

impl RecordingInjector {
    pub fn stopping_after(click_count: usize, run_signal: Arc<RunSignal>) -> Self {
        Self {
            clicks: Mutex::new(Vec::new()),
            stop_after: Some((click_count, run_signal)),
        }
    }

    pub fn clicks(&self) -> Vec<Point> {
        self.clicks.lock().unwrap().clone()
    }
}

impl InputInjector for RecordingInjector {
    fn click(&self, point: Point) {
        let mut clicks = self.clicks.lock().unwrap();
        clicks.push(point);

        if let Some((click_count, run_signal)) = &self.stop_after {
            if clicks.len() >= *click_count {
                run_signal.request_stop();
            }
        }
    }
}
