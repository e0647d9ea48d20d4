/// Rolling frame-time history for fps reporting.
#[derive(Debug)]
pub struct FrameTimer {
    history: Vec<f32>,
    capacity: usize,
    index: usize,
    filled: bool,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: vec![0.0; capacity],
            capacity,
            index: 0,
            filled: false,
        }
    }

    /// Record one frame's delta in seconds.
    pub fn record(&mut self, dt: f32) {
        self.history[self.index] = dt;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
    }

    /// Mean frame time in seconds over the recorded window.
    pub fn average(&self) -> f32 {
        let count = self.count();
        if count == 0 {
            return 0.0;
        }
        self.history[..count].iter().sum::<f32>() / count as f32
    }

    /// Frames per second implied by the average frame time.
    pub fn fps(&self) -> f32 {
        let avg = self.average();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }

    pub fn max(&self) -> f32 {
        self.history[..self.count()]
            .iter()
            .copied()
            .fold(0.0, f32::max)
    }

    pub fn count(&self) -> usize {
        if self.filled {
            self.capacity
        } else {
            self.index
        }
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(120)
    }
}
