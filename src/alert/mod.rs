/// Flood alert evaluation.
///
/// - `thresholds` — flood condition check for a single reading
/// - `epochs`     — alert state transitions on each flood trigger
pub mod epochs;
pub mod thresholds;
