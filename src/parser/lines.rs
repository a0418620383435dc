//! Byte offset to line number translation.

/// Line-start table for one buffer.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(buffer: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            buffer
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { starts }
    }

    /// 1-based line containing `offset`. Offsets past the end map to the
    /// last line.
    pub fn line_for(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }
}
