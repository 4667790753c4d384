//! Anti-pattern detection
//!
//! Each of the 22 registry entries has one rule. Rules never fail; the
//! detector returns findings in registry order so reports are stable.

mod checks;
mod detector;
mod types;

pub use detector::AntiPatternDetector;
pub use types::{AntiPatternCheck, AntiPatternFinding, DetectionContext, FnCheck};
