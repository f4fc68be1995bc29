// src/ui/widgets/mod.rs

pub mod disclaimer_popup; // Authorization notice shown at startup.
pub mod footer;           // Key hints for the active tab.
pub mod input;            // Target input of a scanner tab.
pub mod log_view;         // Activity log.
pub mod progress;         // Cosmetic progress gauge.
pub mod results;          // Result table per payload kind.
pub mod settings;         // API key and provider settings.
pub mod tabs;             // Tab bar.
