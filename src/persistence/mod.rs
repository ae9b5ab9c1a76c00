pub mod files;
pub mod settings;
pub mod storage;
pub mod transfer;

pub use files::{backup_file, ensure_data_dir, init_local_data_dir, log_dir};
pub use settings::{coerce_positive, load_settings, save_settings, Settings};
#[cfg(test)]
pub use storage::MemoryStore;
pub use storage::{FileStore, SharedStore, TODOS_KEY};
pub use transfer::{export_to_path, import_from_path};
