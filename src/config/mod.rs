pub mod database;
pub mod settings;

pub use settings::Settings;
