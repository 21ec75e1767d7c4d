use std::sync::{Mutex, MutexGuard};

/// Lock a mutex shared with the audio callback. Poisoning is logged and the
/// inner state is used as is.
pub(crate) fn lock_or_recover<'a, T>(lock: &'a Mutex<T>, owner: &str) -> MutexGuard<'a, T> {
    lock.lock().unwrap_or_else(|poisoned| {
        crate::log_debug(&format!("{owner}: lock poisoned, continuing with inner state"));
        poisoned.into_inner()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn recovers_value_after_poisoning() {
        let shared = Arc::new(Mutex::new(7));
        let poisoner = Arc::clone(&shared);
        let _ = thread::spawn(move || {
            let _guard = poisoner.lock().expect("first lock");
            panic!("poison the mutex");
        })
        .join();
        assert!(shared.is_poisoned());
        assert_eq!(*lock_or_recover(&shared, "test"), 7);
    }
}
