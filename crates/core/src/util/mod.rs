pub mod ring_buffer;
pub mod stats;

pub use ring_buffer::RingBuffer;
pub use stats::{mean, median_lower, population_std_dev};
