pub mod layout;
pub mod output;
pub mod tsv;

pub use layout::discover_files;
pub use output::{persist_group, write_accumulator};
pub use tsv::{read_dataset, read_tsv, TsvReaderConfig};
