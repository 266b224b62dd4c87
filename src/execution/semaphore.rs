use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// A small, blocking counting semaphore bounding how many profiling tasks run at once.
pub(crate) struct Semaphore {
    permits: Mutex<usize>,
    cv: Condvar,
}

/// Returns its permit when dropped, so a panicking task cannot leak one.
pub(crate) struct Permit<'a> {
    sem: &'a Semaphore,
    /// Time spent blocked in [`Semaphore::acquire`].
    pub waited: Duration,
}

impl Semaphore {
    pub(crate) fn new(permits: usize) -> Self {
        assert!(permits > 0, "permits must be > 0");
        Self {
            permits: Mutex::new(permits),
            cv: Condvar::new(),
        }
    }

    /// Block until a permit is free.
    pub(crate) fn acquire(&self) -> Permit<'_> {
        let start = Instant::now();
        let mut waited = false;
        let mut g = self.lock();
        while *g == 0 {
            waited = true;
            g = self.cv.wait(g).unwrap_or_else(PoisonError::into_inner);
        }
        *g -= 1;
        Permit {
            sem: self,
            waited: if waited { start.elapsed() } else { Duration::ZERO },
        }
    }

    fn release(&self) {
        let mut g = self.lock();
        *g += 1;
        self.cv.notify_one();
    }

    // The counter stays consistent even if a holder panicked, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.permits.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.sem.release();
    }
}

#[cfg(test)]
mod tests {
    use super::Semaphore;
    use std::time::Duration;

    #[test]
    fn uncontended_acquire_does_not_wait() {
        let sem = Semaphore::new(2);
        let a = sem.acquire();
        let b = sem.acquire();
        assert_eq!(a.waited, Duration::ZERO);
        assert_eq!(b.waited, Duration::ZERO);
    }

    #[test]
    fn dropped_permit_is_returned() {
        let sem = Semaphore::new(1);
        drop(sem.acquire());
        let again = sem.acquire();
        assert_eq!(again.waited, Duration::ZERO);
    }
}
