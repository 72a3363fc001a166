use crate::config::SEAT_COUNT;

/// Cyclic seatings of the four agents: rotation `r` puts agent `(seat + r) % 4` in `seat`,
/// so every agent plays from every seat once over a full set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatRotations {
    rotations: Vec<[usize; SEAT_COUNT]>,
}

impl SeatRotations {
    pub fn new(count: usize) -> Self {
        let rotations = (0..count.min(SEAT_COUNT))
            .map(|shift| std::array::from_fn(|seat| (seat + shift) % SEAT_COUNT))
            .collect();
        Self { rotations }
    }

    pub fn as_slice(&self) -> &[[usize; SEAT_COUNT]] {
        &self.rotations
    }

    pub fn len(&self) -> usize {
        self.rotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rotations.is_empty()
    }
}
