use std::fmt;

use super::Store::LogStore;

// Debug proxy implementations that call the standalone debug functions
impl fmt::Debug for LogStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_log_store(self, f)
    }
}
