pub mod distribution_panel;
pub mod file_detail;
pub mod file_table;
