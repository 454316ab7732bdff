//! Well-known names used across the model layer.

/// Name (and self label) of the controller node that always exists.
pub const CONTROLLER_NAME: &str = "built-in";

/// URL segment the controller's computer page lives under.
pub const CONTROLLER_URL_SEGMENT: &str = "(built-in)";
