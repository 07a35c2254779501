//! # Shared Source Handle
//!
//! A [`SoundSource`] is single-threaded. [`SharedSource`] lets several
//! consumers (say a playback thread and a waveform analyzer) use one source by
//! serializing every call through a mutex.

use crate::traits::SoundSource;
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable, lock-guarded handle to a boxed [`SoundSource`].
///
/// Each `read`, `seek` or `length` call holds the lock for its whole duration,
/// so calls from different clones never interleave. Use
/// [`with_lock`](Self::with_lock) to make a seek and the following read atomic.
#[derive(Clone)]
pub struct SharedSource {
    inner: Arc<Mutex<Box<dyn SoundSource + Send>>>,
}

impl SharedSource {
    pub fn new(source: Box<dyn SoundSource + Send>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(source)),
        }
    }

    /// Box `source` and wrap it in a new handle.
    pub fn from_source<S: SoundSource + Send + 'static>(source: S) -> Self {
        Self::new(Box::new(source))
    }

    /// Run `f` with exclusive access to the source.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut dyn SoundSource) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut **guard)
    }

    /// Number of handles sharing this source.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl From<Box<dyn SoundSource + Send>> for SharedSource {
    fn from(source: Box<dyn SoundSource + Send>) -> Self {
        Self::new(source)
    }
}

impl SoundSource for SharedSource {
    fn length(&self) -> u64 {
        self.inner.lock().length()
    }

    fn read(&mut self, dest: &mut [i16]) -> usize {
        self.inner.lock().read(dest)
    }

    fn seek(&mut self, position: u64) -> u64 {
        self.inner.lock().seek(position)
    }
}

impl std::fmt::Debug for SharedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSource")
            .field("handles", &self.handle_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    /// Counts upward from its position; `length` interleaved samples in total.
    struct Counter {
        position: u64,
        length: u64,
    }

    impl SoundSource for Counter {
        fn length(&self) -> u64 {
            self.length
        }

        fn read(&mut self, dest: &mut [i16]) -> usize {
            let available = (self.length - self.position) as usize;
            let n = available.min(dest.len());
            for slot in &mut dest[..n] {
                *slot = self.position as i16;
                self.position += 1;
            }
            n
        }

        fn seek(&mut self, position: u64) -> u64 {
            self.position = position.min(self.length);
            position
        }
    }

    #[test]
    fn test_clones_share_position() {
        let mut a = SharedSource::from_source(Counter {
            position: 0,
            length: 100,
        });
        let mut b = a.clone();
        assert_eq!(a.handle_count(), 2);

        let mut buf = [0i16; 10];
        assert_eq!(a.read(&mut buf), 10);
        assert_eq!(b.read(&mut buf), 10);
        assert_eq!(buf[0], 10);

        b.seek(90);
        assert_eq!(a.read(&mut buf), 10);
        assert_eq!(buf[9], 99);
        assert_eq!(a.length(), 100);
    }

    #[test]
    fn test_with_lock_makes_seek_and_read_atomic() {
        let shared = SharedSource::from_source(Counter {
            position: 0,
            length: 1000,
        });

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let start = i * 100;
                    shared.with_lock(|source| {
                        source.seek(start);
                        let mut buf = [0i16; 50];
                        source.read(&mut buf);
                        buf
                    })
                    .iter()
                    .enumerate()
                    .all(|(j, v)| *v as u64 == start + j as u64)
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }

    #[test]
    fn test_wraps_boxed_source() {
        let boxed: Box<dyn SoundSource + Send> = Box::new(Counter {
            position: 0,
            length: 40,
        });
        let mut shared = SharedSource::from(boxed);
        let mut buf = [0i16; 64];
        assert_eq!(shared.read(&mut buf), 40);
        assert_eq!(shared.handle_count(), 1);
    }
}
