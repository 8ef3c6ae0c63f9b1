//! `ringbuf` ends wired into the engine's queue traits.

use pv_engine::{Receiver, Sender};
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};

/// Producer half of a heap ring.
pub struct RingSender<T>(HeapProd<T>);

/// Consumer half of a heap ring.
pub struct RingReceiver<T>(HeapCons<T>);

/// Allocate a ring of `capacity` items and split it.
pub fn channel<T>(capacity: usize) -> (RingSender<T>, RingReceiver<T>) {
    let (producer, consumer) = HeapRb::<T>::new(capacity.max(1)).split();
    (RingSender(producer), RingReceiver(consumer))
}

impl<T> Sender<T> for RingSender<T> {
    fn try_send(&mut self, item: T) -> Result<(), T> {
        self.0.try_push(item)
    }
}

impl<T> Receiver<T> for RingReceiver<T> {
    fn try_recv(&mut self) -> Option<T> {
        self.0.try_pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_ring_hands_item_back() {
        let (mut tx, mut rx) = channel::<u32>(2);
        assert!(tx.try_send(1).is_ok());
        assert!(tx.try_send(2).is_ok());
        assert_eq!(tx.try_send(3), Err(3));
        assert_eq!(rx.try_recv(), Some(1));
        assert!(tx.try_send(3).is_ok());
        assert_eq!(rx.try_recv(), Some(2));
        assert_eq!(rx.try_recv(), Some(3));
        assert_eq!(rx.try_recv(), None);
    }
}
