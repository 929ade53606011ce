//! Storage implementations for collection contents

pub mod sortable;

pub use sortable::{SortPolicy, SortableCollection};
