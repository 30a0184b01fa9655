//! User interface - status display layout.
//!
//! ## Pages
//!
//! - **Readout**: azimuth, elevation, pot levels, battery, switch states
//! - **Title**: product name; pressing both encoder switches flips between the two

pub mod view;

pub use view::{contrast_for, Page, PageToggle, StatusView};

/// Text shown on the title page.
pub const TITLE: &str = "steer-remote";
