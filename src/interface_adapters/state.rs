use crate::use_cases::ArenaHandle;
use std::path::PathBuf;

#[derive(Clone)]
pub struct AppState {
    // Channels into and out of the world task.
    pub arena: ArenaHandle,
    // Directory holding the static client files.
    pub static_dir: PathBuf,
}
