pub mod sample_file;
pub mod table;

pub use sample_file::{discover, SampleFile};
pub use table::{SampleTable, TIMESTAMP_COLUMN, VALUE_COLUMN};
