use std::fmt;

use super::{DeviceHandle, LogDevice};

impl fmt::Debug for LogDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_log_device(self, f)
    }
}

impl fmt::Debug for DeviceHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("pos", &self.pos)
            .finish_non_exhaustive()
    }
}
