// Module naming follows project convention (Ring = the slot ring log store)
#[allow(non_snake_case)]
pub mod Ring;

#[allow(non_snake_case)]
pub mod Core;

#[allow(non_snake_case)]
pub mod Device;

#[allow(non_snake_case)]
mod Debug {
    pub mod StructDebug;
}

pub mod ffi;

pub use crate::Core::error::{HandleError, StoreError, TransferFault};
pub use crate::Device::{DeviceHandle, LogDevice};
pub use crate::Ring::{LogBuilder, LogStore, StoreCursors};
