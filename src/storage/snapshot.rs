/// LIFO stack of saved store states
///
/// SAVEPOINT pushes, ROLLBACK pops the newest frame back into place, COMMIT
/// forgets every frame.
#[derive(Debug)]
pub struct SnapshotStack<T> {
    frames: Vec<T>,
}

impl<T> Default for SnapshotStack<T> {
    fn default() -> Self {
        Self { frames: Vec::new() }
    }
}

impl<T: Clone> SnapshotStack<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, state: &T) {
        self.frames.push(state.clone());
    }

    pub fn pop(&mut self) -> Option<T> {
        self.frames.pop()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}
