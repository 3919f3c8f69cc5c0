pub mod car;
pub mod controls;
pub mod game;
pub mod hud;
pub mod render;
pub mod tire_mark;
pub mod track;
pub mod tuning;

pub use car::Car;
pub use game::{DriftGamePlugin, DriftScore, LoopState};
pub use tire_mark::TireMark;
pub use track::Track;
pub use tuning::Tuning;
