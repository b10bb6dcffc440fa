pub mod analysis;
pub mod chat;
pub mod fallback;
pub mod intent;
pub mod library;
pub mod providers;
pub mod resolver;
