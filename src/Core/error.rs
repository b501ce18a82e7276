// Error taxonomy for the ring log store and the advisory handle layer.
//
// Store errors and handle errors are kept apart on purpose: nothing in the
// handle layer can fail a store operation, and the store never reports a
// handle problem.

use std::io;
use thiserror::Error;

/// A byte transfer between a caller buffer and store memory faulted.
///
/// `copied` is how far the collaborator got before it gave up. The store
/// discards any partial copy, so the value is informational only.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("boundary fault after {copied} of {requested} bytes")]
pub struct TransferFault {
    pub copied: usize,
    pub requested: usize,
}

impl TransferFault {
    pub fn new(copied: usize, requested: usize) -> Self {
        Self { copied, requested }
    }
}

/// Errors returned by `LogStore` operations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Zero-length read, or a capacity/slot-size pair the store cannot use.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Backing storage could not be reserved at construction.
    #[error("failed to reserve {requested} bytes of slot storage")]
    OutOfMemory { requested: usize },

    /// The byte-transfer collaborator failed; nothing was committed.
    #[error("transfer fault: {0}")]
    TransferFault(#[from] TransferFault),
}

impl StoreError {
    /// Positive `errno` value matching this error, for the C ABI.
    pub fn errno(&self) -> i32 {
        match self {
            StoreError::InvalidArgument(_) => libc::EINVAL,
            StoreError::OutOfMemory { .. } => libc::ENOMEM,
            StoreError::TransferFault(_) => libc::EFAULT,
        }
    }
}

impl From<StoreError> for io::Error {
    fn from(err: StoreError) -> Self {
        let kind = match err {
            StoreError::InvalidArgument(_) => io::ErrorKind::InvalidInput,
            StoreError::OutOfMemory { .. } => io::ErrorKind::OutOfMemory,
            StoreError::TransferFault(_) => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, err)
    }
}

/// Errors from the handle-count layer. Advisory only.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum HandleError {
    #[error("too many open handles (max {max})")]
    TooManyHandles { max: usize },

    #[error("release without a matching open")]
    UnbalancedClose,
}

impl HandleError {
    /// Positive `errno` value matching this error, for the C ABI.
    pub fn errno(&self) -> i32 {
        match self {
            HandleError::TooManyHandles { .. } => libc::EBUSY,
            HandleError::UnbalancedClose => libc::EBADF,
        }
    }
}

impl From<HandleError> for io::Error {
    fn from(err: HandleError) -> Self {
        let kind = match err {
            HandleError::TooManyHandles { .. } => io::ErrorKind::WouldBlock,
            HandleError::UnbalancedClose => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, err)
    }
}
