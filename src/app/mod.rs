//! The application controller: shared state, commands and the events they emit.
//!
//! Front ends own an `Arc<Mutex<AppState>>` and an [`proxy::EventProxy`], call
//! the functions in [`commands`], and react to the [`events::UserEvent`]s that
//! come back.

pub mod commands;
pub mod events;
pub mod helpers;
pub mod proxy;
pub mod state;
pub mod view_model;

pub use commands::{export_metadata, load_metadata, select_folder, start_analysis};
pub use events::UserEvent;
pub use proxy::EventProxy;
pub use state::AppState;
