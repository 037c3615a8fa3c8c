pub mod text_loader;

pub use text_loader::{load_input_file, load_raw_batch};
