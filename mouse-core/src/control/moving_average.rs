/*
    Moving Average Filter
*/

#[derive(Debug, Clone)]
pub struct MovingAverage<const N: usize> {
    buffer: [f32; N],
    index: usize,
    is_filled: bool,
    sum: f32,
}

impl<const N: usize> MovingAverage<N> {
    pub const fn new() -> Self {
        Self {
            buffer: [0.0; N],
            index: 0,
            is_filled: false,
            sum: 0.0,
        }
    }

    pub fn update(&mut self, value: f32) -> f32 {
        if self.is_filled {
            self.sum -= self.buffer[self.index];
        }

        self.buffer[self.index] = value;
        self.sum += value;

        self.index = (self.index + 1) % N;

        if !self.is_filled && self.index == 0 {
            self.is_filled = true;
        }

        self.value()
    }

    /// Current average, 0 before the first sample.
    pub fn value(&self) -> f32 {
        if self.is_filled {
            self.sum / N as f32
        } else if self.index == 0 {
            0.0
        } else {
            self.sum / self.index as f32
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl<const N: usize> Default for MovingAverage<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn averages_partial_then_full_window() {
        let mut filter = MovingAverage::<4>::new();
        assert_relative_eq!(filter.value(), 0.0);
        assert_relative_eq!(filter.update(4.0), 4.0);
        assert_relative_eq!(filter.update(8.0), 6.0);
        filter.update(0.0);
        assert_relative_eq!(filter.update(0.0), 3.0);
        // Oldest sample (4.0) drops out.
        assert_relative_eq!(filter.update(4.0), 3.0);
    }
}
