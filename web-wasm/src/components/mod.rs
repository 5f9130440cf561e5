pub mod grid_background;
pub mod header;
pub mod project_carousel;
pub mod project_modal;
pub mod projects_section;
pub mod tech_stack;
