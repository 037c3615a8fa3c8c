pub mod assembler;
pub mod classifier;
pub mod heuristic_extractor;
pub mod segmenter;
pub mod structured_extractor;
pub mod warn_writer;

pub use assembler::{Assembler, ExtractOutcome};
pub use classifier::TypeClassifier;
pub use heuristic_extractor::HeuristicExtractor;
pub use segmenter::{Segmenter, SplitStrategy};
pub use structured_extractor::StructuredExtractor;
pub use warn_writer::WarnWriter;
