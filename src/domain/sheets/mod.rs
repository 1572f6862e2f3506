pub mod a1_notation;
pub mod cell_value;
pub mod read_options;
pub mod sheet_reference;
pub mod table;
pub mod tabular;
