mod cell_type_tests;
mod catalog_tests;
mod config_tests;
