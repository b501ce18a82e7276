mod builder;
mod debug;

pub use builder::LogBuilder;

pub mod Store {
    pub mod Store;
    pub mod Store_impl;
    pub mod layout;
    pub use layout::{
        SlotGeometry, DEFAULT_SLOT_CAPACITY, DEFAULT_TOTAL_CAPACITY, MIN_SLOT_CAPACITY, TERMINATOR,
    };
    pub use Store::LogStore; // re-export for stable path
}

pub mod Structs {
    pub mod Store_Structs;
    pub use Store_Structs::StoreCursors; // re-export for stable path
}

pub use Store::LogStore;
pub use Structs::StoreCursors;
