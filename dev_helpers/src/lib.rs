mod audio;
mod wav;

pub use audio::InputEngine;
pub use wav::read_wav;
