pub mod components;
pub mod layout;
pub mod surface;
pub mod theme;
