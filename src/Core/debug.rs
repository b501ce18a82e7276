use std::fmt;

use super::handles::HandleCounter;

// Debug proxy implementations that call the standalone debug functions
impl fmt::Debug for HandleCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_handle_counter(self, f)
    }
}
