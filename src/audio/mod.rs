pub mod sample;
pub mod source;

pub use sample::{AudioFormat, AudioSample, SynthesizedAudio};
pub use source::{decode_wav, BufferedWavSource, WavFileSource};
