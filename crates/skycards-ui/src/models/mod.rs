pub mod display_model;
pub mod search_model;
pub mod status_model;
pub mod theme_model;
