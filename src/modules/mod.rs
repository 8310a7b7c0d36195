pub mod content;
pub mod hero;
pub mod media;
pub mod popularity;
pub mod recommendation;
