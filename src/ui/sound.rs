/// Sound engine: procedural 8-bit style audio via rodio.
///
/// Effects are generated as in-memory WAV buffers at init time and
/// played fire-and-forget on detached sinks. Background music is a
/// short generated loop on a dedicated sink that the options page can
/// pause and resume.
///
/// Compile without the "sound" feature to disable audio entirely
/// (the stub SoundEngine does nothing).

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::source::Source;
    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        music: Sink,
        sfx_enabled: bool,
        sfx_coin: Arc<Vec<u8>>,
        sfx_diamond: Arc<Vec<u8>>,
        sfx_life: Arc<Vec<u8>>,
        sfx_jump: Arc<Vec<u8>>,
        sfx_trap: Arc<Vec<u8>>,
        sfx_clear: Arc<Vec<u8>>,
        sfx_game_over: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;

            let music = Sink::try_new(&handle).ok()?;
            let loop_buf = make_wav(&gen_music_loop());
            if let Ok(src) = rodio::Decoder::new(Cursor::new(loop_buf)) {
                music.append(src.buffered().repeat_infinite());
            }
            music.set_volume(0.5);

            Some(SoundEngine {
                _stream: stream,
                handle,
                music,
                sfx_enabled: true,
                sfx_coin: Arc::new(make_wav(&gen_coin())),
                sfx_diamond: Arc::new(make_wav(&gen_diamond())),
                sfx_life: Arc::new(make_wav(&gen_life())),
                sfx_jump: Arc::new(make_wav(&gen_jump())),
                sfx_trap: Arc::new(make_wav(&gen_trap())),
                sfx_clear: Arc::new(make_wav(&gen_clear())),
                sfx_game_over: Arc::new(make_wav(&gen_game_over())),
            })
        }

        pub fn set_music_enabled(&self, on: bool) {
            if on {
                self.music.play();
            } else {
                self.music.pause();
            }
        }

        pub fn set_sfx_enabled(&mut self, on: bool) {
            self.sfx_enabled = on;
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if !self.sfx_enabled {
                return;
            }
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        pub fn play_coin(&self) { self.play(&self.sfx_coin); }
        pub fn play_diamond(&self) { self.play(&self.sfx_diamond); }
        pub fn play_life(&self) { self.play(&self.sfx_life); }
        pub fn play_jump(&self) { self.play(&self.sfx_jump); }
        pub fn play_trap(&self) { self.play(&self.sfx_trap); }
        pub fn play_clear(&self) { self.play(&self.sfx_clear); }
        pub fn play_game_over(&self) { self.play(&self.sfx_game_over); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators — all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    fn tone(samples: &mut Vec<f32>, freq: f32, duration: f32, volume: f32) {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32).powf(0.5);
            // Sine + 3rd harmonic for a retro square-ish timbre.
            let wave = (t * freq * 2.0 * std::f32::consts::PI).sin() * 0.7
                + (t * freq * 3.0 * 2.0 * std::f32::consts::PI).sin() * 0.3;
            samples.push(wave * env * volume);
        }
    }

    /// Coin: quick ascending two-note blip, E6→B6.
    fn gen_coin() -> Vec<f32> {
        let mut s = Vec::new();
        tone(&mut s, 1319.0, 0.04, 0.25);
        tone(&mut s, 1976.0, 0.08, 0.25);
        s
    }

    /// Diamond: longer sparkling arpeggio C6→E6→G6→C7.
    fn gen_diamond() -> Vec<f32> {
        let mut s = Vec::new();
        for &freq in &[1047.0_f32, 1319.0, 1568.0, 2093.0] {
            tone(&mut s, freq, 0.05, 0.25);
        }
        s
    }

    /// Extra life: warm two-note chime G5→C6.
    fn gen_life() -> Vec<f32> {
        let mut s = Vec::new();
        tone(&mut s, 784.0, 0.08, 0.3);
        tone(&mut s, 1047.0, 0.16, 0.3);
        s
    }

    /// Jump: short rising sweep.
    fn gen_jump() -> Vec<f32> {
        let duration = 0.1;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 300.0 + t * 400.0;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let env = (1.0 - t).powf(0.6);
                (ti * freq * 2.0 * std::f32::consts::PI).sin() * env * 0.2
            })
            .collect()
    }

    /// Trap hit: harsh descending buzz.
    fn gen_trap() -> Vec<f32> {
        let duration = 0.18;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 12345;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 400.0 - t * 250.0;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let tone = (ti * freq * 2.0 * std::f32::consts::PI).sin();
                // Simple LCG noise
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let env = (1.0 - t).powf(0.8);
                (tone * 0.5 + noise * 0.5) * env * 0.3
            })
            .collect()
    }

    /// Level clear: ascending fanfare C5→E5→G5→C6, sustained.
    fn gen_clear() -> Vec<f32> {
        let mut s = Vec::new();
        for &freq in &[523.0_f32, 659.0, 784.0] {
            tone(&mut s, freq, 0.1, 0.3);
        }
        tone(&mut s, 1047.0, 0.35, 0.3);
        s
    }

    /// Game over: sad descending line A4→F#4→Eb4→C4.
    fn gen_game_over() -> Vec<f32> {
        let mut s = Vec::new();
        for &freq in &[440.0_f32, 370.0, 311.0] {
            tone(&mut s, freq, 0.14, 0.3);
        }
        tone(&mut s, 261.0, 0.4, 0.3);
        s
    }

    /// Background loop: a simple eight-bar I-V-vi-IV arpeggio pattern.
    fn gen_music_loop() -> Vec<f32> {
        // (root, third, fifth) in Hz, one bar each: C, G, Am, F.
        let chords: [[f32; 3]; 4] = [
            [261.6, 329.6, 392.0],
            [196.0, 246.9, 293.7],
            [220.0, 261.6, 329.6],
            [174.6, 220.0, 261.6],
        ];
        let mut s = Vec::new();
        for _ in 0..2 {
            for chord in &chords {
                for step in 0..8 {
                    let freq = chord[[0usize, 1, 2, 1][step % 4]];
                    tone(&mut s, freq, 0.11, 0.12);
                }
            }
        }
        s
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder — wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let clamped = s.max(-1.0).min(1.0);
            let val = (clamped * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public API — compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn set_music_enabled(&self, _on: bool) {}
    pub fn set_sfx_enabled(&mut self, _on: bool) {}
    pub fn play_coin(&self) {}
    pub fn play_diamond(&self) {}
    pub fn play_life(&self) {}
    pub fn play_jump(&self) {}
    pub fn play_trap(&self) {}
    pub fn play_clear(&self) {}
    pub fn play_game_over(&self) {}
}
