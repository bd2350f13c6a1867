pub mod settings;

pub use settings::{DiscoverySettings, EntrySettings, DEFAULT_SETTINGS_FILE};
