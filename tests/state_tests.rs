use songposrs::{create_shared_tracker, TransportEvent};
use std::thread;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shared_tracker() {
        let shared = create_shared_tracker();
        let tracker = shared.lock().unwrap();
        assert!(!tracker.is_playing());
        assert_eq!(tracker.sixteenths_elapsed(), 0);
        assert_eq!(tracker.tick_phase(), 0);
    }

    #[test]
    fn test_concurrent_access() {
        let shared = create_shared_tracker();
        {
            let mut tracker = shared.lock().unwrap();
            tracker.handle(TransportEvent::Start);
            tracker.handle(TransportEvent::Clock);
        }

        let mut handles = vec![];

        // Every pulse goes through the one lock, so none are lost
        for _ in 0..10 {
            let shared_clone = shared.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..60 {
                    shared_clone.lock().unwrap().handle(TransportEvent::Clock);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        // 600 counted pulses
        let tracker = shared.lock().unwrap();
        assert_eq!(tracker.sixteenths_elapsed(), 100);
        assert_eq!(tracker.tick_phase(), 0);
    }

    #[test]
    fn test_snapshot_from_another_thread() {
        let shared = create_shared_tracker();
        let writer = shared.clone();

        thread::spawn(move || {
            let mut tracker = writer.lock().unwrap();
            tracker.handle(TransportEvent::Start);
            tracker.handle(TransportEvent::SongPosition(24));
        })
        .join()
        .unwrap();

        let position = shared.lock().unwrap().position();
        assert!(position.playing);
        assert_eq!(position.sixteenths, 24);
        assert_eq!(position.bar(), 1);
    }
}
