use hound;

/// Reads a wav file, keeping the first channel only. Integer samples are
/// scaled to [-1, 1]. Returns the file's sample rate and the samples.
pub fn read_wav(path: &str) -> Result<(u32, Vec<f32>), hound::Error> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .step_by(channels)
            .collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / ((1_i64 << (spec.bits_per_sample - 1)) as f32);
            reader
                .samples::<i32>()
                .step_by(channels)
                .map(|sample| sample.map(|value| (value as f32) * scale))
                .collect::<Result<_, _>>()?
        }
    };
    Ok((spec.sample_rate, samples))
}
