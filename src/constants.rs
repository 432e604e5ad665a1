pub const NO_LINK_TRANSFORM: f64 = -1.0;
pub const DEFAULT_FAIR_C: f64 = 2.0;
pub const FAIR_UNWEIGHTED_SCALE: f64 = 100.0;
