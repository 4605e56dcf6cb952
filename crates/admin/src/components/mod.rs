//! Reusable UI component types.

pub mod data_table;

pub use data_table::{DataTableConfig, FilterOption, TableColumn, TableFilter, members_table_config};
