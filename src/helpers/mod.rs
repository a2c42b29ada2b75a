//! Small, pure selection and conversion routines shared by more than one back end
//! (SPEC_FULL.md §4.7).

pub mod date_time;
pub mod partition_selector;
pub mod shadow_store_selector;
