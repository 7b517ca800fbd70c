use crate::core::models::Point;

/// Pointer injection. Fire-and-forget: implementations log failures instead of
/// reporting them, and callers never retry a click.
pub trait InputInjector: Send + Sync {
    fn click(&self, point: Point);
}
