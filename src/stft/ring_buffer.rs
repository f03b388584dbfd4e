use alloc::{boxed::Box, vec};

use crate::common::{real_fft_in_place, WindowFunction};
use crate::error::Error;

/// A fixed capacity circular sample buffer that windows and transforms
/// fixed length slices on demand, producing one power spectrum column per
/// read. Writing advances the write cursor only, reading a column advances
/// the read cursor by the window stride only.
///
/// Cursor equality means empty, so the usable capacity is one sample less
/// than the allocated buffer length.
pub struct SpectralRingBuffer {
    buffer: Box<[f32]>,
    window: Box<[f32]>,
    /// Windowed, zero padded transform input. Length `fft_length`.
    windowed: Box<[f32]>,
    window_stride: usize,
    fft_length: usize,
    write_index: usize,
    read_index: usize,
}

impl SpectralRingBuffer {
    /// Creates a buffer holding up to `buffer_length - 1` samples, reading
    /// windows of `window_length` samples every `window_stride` samples.
    /// The transform size is the next power of two at or above
    /// `window_length` and must fall in microfft's supported 8..=4096
    /// range. The window defaults to rectangular.
    pub fn new(window_length: usize, window_stride: usize, buffer_length: usize) -> Self {
        if window_length == 0 {
            panic!("Window length must be greater than 0")
        }
        if window_stride == 0 || window_stride > window_length {
            panic!("Window stride must be > 0 and <= window_length")
        }
        if buffer_length <= window_length {
            panic!("Buffer length must be greater than window_length")
        }
        let fft_length = window_length.next_power_of_two();
        if fft_length < 8 || fft_length > 4096 {
            panic!("Unsupported transform size {}", fft_length)
        }

        let mut window = vec![0.0; window_length].into_boxed_slice();
        WindowFunction::Rectangular.fill(&mut window);

        SpectralRingBuffer {
            buffer: vec![0.0; buffer_length].into_boxed_slice(),
            window,
            windowed: vec![0.0; fft_length].into_boxed_slice(),
            window_stride,
            fft_length,
            write_index: 0,
            read_index: 0,
        }
    }

    pub fn window_length(&self) -> usize {
        self.window.len()
    }

    pub fn window_stride(&self) -> usize {
        self.window_stride
    }

    /// The number of bins in one power spectrum column,
    /// `fft_length / 2 + 1`.
    pub fn spectrum_length(&self) -> usize {
        self.fft_length / 2 + 1
    }

    /// The current window coefficients.
    pub fn window(&self) -> &[f32] {
        &self.window
    }

    /// Replaces the window coefficients with the given preset.
    pub fn set_window(&mut self, window_function: WindowFunction) {
        window_function.fill(&mut self.window);
    }

    /// Replaces the window coefficients with an arbitrary vector.
    pub fn set_window_coefficients(&mut self, coefficients: &[f32]) -> Result<(), Error> {
        if coefficients.len() != self.window.len() {
            return Err(Error::LengthMismatch);
        }
        self.window.copy_from_slice(coefficients);
        Ok(())
    }

    /// The number of buffered, unread samples.
    pub fn len(&self) -> usize {
        let buffer_length = self.buffer.len();
        (self.write_index + buffer_length - self.read_index) % buffer_length
    }

    pub fn is_empty(&self) -> bool {
        self.write_index == self.read_index
    }

    /// The number of samples that can currently be written without
    /// overflowing.
    pub fn capacity(&self) -> usize {
        self.buffer.len() - 1 - self.len()
    }

    /// The number of complete columns that can currently be read.
    pub fn column_count(&self) -> usize {
        self.columns_for_samples(self.len())
    }

    /// The number of complete columns contained in `samples` buffered
    /// samples.
    pub fn columns_for_samples(&self, samples: usize) -> usize {
        if samples < self.window.len() {
            return 0;
        }
        1 + (samples - self.window.len()) / self.window_stride
    }

    /// The number of buffered samples needed to read `columns` columns.
    pub fn samples_for_columns(&self, columns: usize) -> usize {
        if columns == 0 {
            return 0;
        }
        self.window.len() + self.window_stride * (columns - 1)
    }

    /// The index of the first spectral bin at or above `frequency`.
    pub fn bin_for_frequency(&self, frequency: f32, sample_rate: f32) -> usize {
        libm::ceilf((self.fft_length as f32) * frequency / sample_rate) as usize
    }

    /// The center frequency of spectral bin `bin`.
    pub fn frequency_for_bin(&self, bin: usize, sample_rate: f32) -> f32 {
        (bin as f32) * sample_rate / (self.fft_length as f32)
    }

    /// Resets both cursors. Buffer contents are left as is; stale samples
    /// are never read because the buffered length becomes zero.
    pub fn clear(&mut self) {
        self.write_index = 0;
        self.read_index = 0;
    }

    /// Appends samples, failing with `CapacityExceeded` if they do not all
    /// fit. On failure nothing is written.
    pub fn write(&mut self, samples: &[f32]) -> Result<(), Error> {
        if samples.len() > self.capacity() {
            return Err(Error::CapacityExceeded);
        }
        for sample in samples.iter() {
            self.push_sample(*sample);
        }
        Ok(())
    }

    /// Appends every `stride`:th sample, for de-interleaving multichannel
    /// input.
    pub fn write_strided(&mut self, samples: &[f32], stride: usize) -> Result<(), Error> {
        if stride == 0 {
            panic!("Stride must be greater than 0")
        }
        let count = (samples.len() + stride - 1) / stride;
        if count > self.capacity() {
            return Err(Error::CapacityExceeded);
        }
        for sample in samples.iter().step_by(stride) {
            self.push_sample(*sample);
        }
        Ok(())
    }

    /// Appends just enough zero samples to complete one more column
    /// boundary, flushing a trailing partial window at end of stream.
    /// A no-op when the buffered length already sits on a column boundary,
    /// so calling it twice in a row pads at most once.
    pub fn zero_pad_to_edge(&mut self) -> Result<(), Error> {
        let samples = self.len();
        let columns = self.columns_for_samples(samples);
        let used = self.samples_for_columns(columns);
        if used < samples {
            let padding = self.samples_for_columns(columns + 1) - samples;
            if padding > self.capacity() {
                return Err(Error::CapacityExceeded);
            }
            for _ in 0..padding {
                self.push_sample(0.0);
            }
        }
        Ok(())
    }

    /// Reads one power spectrum column into `power`, which must hold
    /// `spectrum_length()` values, and advances the read cursor by the
    /// window stride. Returns `false` if fewer than one full window of
    /// samples is buffered; write more samples and try again.
    ///
    /// Bins 0 and `fft_length / 2` are real in a real FFT and are unpacked
    /// from the packed coefficient pair so neither is double counted.
    pub fn read_power(&mut self, power: &mut [f32]) -> bool {
        assert_eq!(power.len(), self.spectrum_length());
        let window_length = self.window.len();
        if self.len() < window_length {
            return false;
        }

        let buffer_length = self.buffer.len();
        for i in 0..window_length {
            self.windowed[i] =
                self.buffer[(self.read_index + i) % buffer_length] * self.window[i];
        }
        for value in self.windowed[window_length..].iter_mut() {
            *value = 0.0;
        }
        self.read_index = (self.read_index + self.window_stride) % buffer_length;

        let half_length = self.fft_length / 2;
        let spectrum = real_fft_in_place(&mut self.windowed);
        power[half_length] = spectrum[0].im.abs();
        spectrum[0].im = 0.0;
        for (value, bin) in power[..half_length].iter_mut().zip(spectrum.iter()) {
            *value = libm::sqrtf(bin.re * bin.re + bin.im * bin.im);
        }
        true
    }

    fn push_sample(&mut self, sample: f32) {
        self.buffer[self.write_index] = sample;
        self.write_index = (self.write_index + 1) % self.buffer.len();
    }
}
