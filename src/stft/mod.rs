//! A circular audio buffer producing power spectrum columns, i.e. a
//! streaming [short time Fourier transform](https://en.wikipedia.org/wiki/Short-time_Fourier_transform)
//! with bounded memory and bounded latency.
//!
//! The writer side only moves the write cursor and the reader side only
//! moves the read cursor, so a single producer and a single consumer can
//! share the buffer across a priority boundary without locking, provided
//! cursor updates are made visible to the other side.

mod ring_buffer;

pub use ring_buffer::SpectralRingBuffer;
