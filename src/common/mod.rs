//! Common algorithms and utilities.

mod fft;
mod window_function;

pub use fft::real_fft_in_place;
pub use window_function::WindowFunction;
