use core::convert::TryInto;

/// Performs an in-place real FFT on a given buffer. The buffer length must be
/// a power of two between 8 and 4096. Following the microfft convention for
/// real FFTs, the returned half spectrum packs the real valued coefficient at
/// the Nyquist frequency into the imaginary part of the DC bin.
pub fn real_fft_in_place(buffer: &mut [f32]) -> &mut [microfft::Complex32] {
    let fft_size = buffer.len();
    match fft_size {
        8 => microfft::real::rfft_8(buffer.try_into().unwrap()),
        16 => microfft::real::rfft_16(buffer.try_into().unwrap()),
        32 => microfft::real::rfft_32(buffer.try_into().unwrap()),
        64 => microfft::real::rfft_64(buffer.try_into().unwrap()),
        128 => microfft::real::rfft_128(buffer.try_into().unwrap()),
        256 => microfft::real::rfft_256(buffer.try_into().unwrap()),
        512 => microfft::real::rfft_512(buffer.try_into().unwrap()),
        1024 => microfft::real::rfft_1024(buffer.try_into().unwrap()),
        2048 => microfft::real::rfft_2048(buffer.try_into().unwrap()),
        4096 => microfft::real::rfft_4096(buffer.try_into().unwrap()),
        _ => panic!("Unsupported fft size {}", fft_size),
    }
}

#[cfg(test)]
mod tests {
    use super::real_fft_in_place;

    #[test]
    fn test_dc_signal() {
        let mut buffer = [1.0_f32; 64];
        let spectrum = real_fft_in_place(&mut buffer);
        assert!((spectrum[0].re - 64.0).abs() < 1e-4);
        for bin in spectrum.iter().skip(1) {
            assert!(bin.re.abs() < 1e-3);
            assert!(bin.im.abs() < 1e-3);
        }
    }

    #[test]
    fn test_nyquist_packing() {
        // A signal alternating between 1 and -1 has all its energy at the
        // Nyquist frequency, which microfft packs into the DC bin's
        // imaginary part.
        let mut buffer = [0.0_f32; 32];
        for (index, value) in buffer.iter_mut().enumerate() {
            *value = if index % 2 == 0 { 1.0 } else { -1.0 };
        }
        let spectrum = real_fft_in_place(&mut buffer);
        assert!((spectrum[0].im.abs() - 32.0).abs() < 1e-3);
        assert!(spectrum[0].re.abs() < 1e-3);
    }
}
