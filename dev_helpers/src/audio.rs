use portaudio as pa;

/// Captures mono audio from the default input device and ferries the
/// samples to the main thread through a lock free queue. The audio
/// callback does nothing but push samples; all analysis work belongs on
/// the consuming thread.
pub struct InputEngine {
    pa_stream: pa::Stream<pa::NonBlocking, pa::Input<f32>>,
    pub samples: rtrb::Consumer<f32>,
}

impl InputEngine {
    /// Opens and starts a non-blocking input stream. `queue_capacity` is
    /// the number of samples the consumer may lag behind before samples
    /// are dropped.
    pub fn new(sample_rate: f32, queue_capacity: usize) -> Self {
        let (mut producer, consumer) = rtrb::RingBuffer::<f32>::new(queue_capacity).split();

        let pa = pa::PortAudio::new().unwrap();
        let default_input = pa.default_input_device().unwrap();
        let input_info = pa.device_info(default_input).unwrap();
        println!("Using audio input device \"{}\"", input_info.name);

        let latency = input_info.default_low_input_latency;
        let input_params = pa::StreamParameters::<f32>::new(default_input, 1, true, latency);
        let settings = pa::InputStreamSettings::new(input_params, sample_rate as f64, 256);

        let pa_callback = move |pa::InputStreamCallbackArgs { buffer, .. }| {
            for sample in buffer.iter() {
                if producer.push(*sample).is_err() {
                    // Queue full, drop the rest of this buffer.
                    break;
                }
            }
            pa::Continue
        };
        let mut stream = pa.open_non_blocking_stream(settings, pa_callback).unwrap();
        stream.start().unwrap();
        InputEngine {
            pa_stream: stream,
            samples: consumer,
        }
    }

    pub fn stop(&mut self) {
        self.pa_stream.stop().unwrap()
    }
}
