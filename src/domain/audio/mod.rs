//! Audio value objects: sample formats, chunks and the chunk buffer

mod buffer;
mod chunk;
mod sample_format;

pub use buffer::ChunkBuffer;
pub use chunk::Chunk;
pub use sample_format::{PcmSample, SampleFormat};
