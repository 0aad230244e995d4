//! Batched pose cache.

use scenario_types::Pose;

use crate::error::{OptimError, Result};

/// Queue of optimizer poses consumed one per step.
///
/// The cache is refilled only when every cached pose has been handed out;
/// a refill replaces the whole batch.
#[derive(Debug, Clone, Default)]
pub struct PoseCache {
    poses: Vec<Pose>,
    cursor: usize,
}

impl PoseCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached batch size.
    #[must_use]
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// Whether no batch has been cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Index of the next pose to hand out.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Poses left before the next refill.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.poses.len() - self.cursor
    }

    /// Whether the next pose requires a refill.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.poses.len()
    }

    /// Replace the cached batch and rewind the cursor.
    pub fn refill(&mut self, poses: Vec<Pose>) {
        self.poses = poses;
        self.cursor = 0;
    }

    /// Hand out the next pose, calling `fetch` first when exhausted.
    ///
    /// # Errors
    ///
    /// Propagates `fetch` errors; an empty batch is [`OptimError::EmptyResponse`].
    pub fn next_pose<F>(&mut self, fetch: F) -> Result<Pose>
    where
        F: FnOnce() -> Result<Vec<Pose>>,
    {
        if self.is_exhausted() {
            let poses = fetch()?;
            if poses.is_empty() {
                return Err(OptimError::EmptyResponse);
            }
            self.refill(poses);
        }
        let pose = self
            .poses
            .get(self.cursor)
            .copied()
            .ok_or(OptimError::EmptyResponse)?;
        self.cursor += 1;
        Ok(pose)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn batch(start: f64, n: usize) -> Vec<Pose> {
        (0..n)
            .map(|i| Pose::from_components(start + i as f64, 0.0, 0.0, 0.0, 0.0, 0.0))
            .collect()
    }

    #[test]
    fn refills_exactly_when_exhausted() {
        let mut cache = PoseCache::new();
        let mut fetches = 0_u32;
        let mut seen = Vec::new();
        for _ in 0..7 {
            let pose = cache
                .next_pose(|| {
                    fetches += 1;
                    Ok(batch(f64::from(fetches) * 100.0, 3))
                })
                .unwrap();
            seen.push(pose.position.x);
        }
        assert_eq!(fetches, 3);
        assert_eq!(seen, vec![100.0, 101.0, 102.0, 200.0, 201.0, 202.0, 300.0]);
        assert_eq!(cache.cursor(), 1);
        assert_eq!(cache.remaining(), 2);
    }

    #[test]
    fn fetch_not_called_while_poses_remain() {
        let mut cache = PoseCache::new();
        cache.refill(batch(0.0, 2));
        let pose = cache
            .next_pose(|| panic!("fetch called with poses cached"))
            .unwrap();
        assert_eq!(pose.position.x, 0.0);
        assert!(!cache.is_exhausted());
    }

    #[test]
    fn empty_batch_is_an_error() {
        let mut cache = PoseCache::new();
        assert_eq!(cache.next_pose(|| Ok(Vec::new())), Err(OptimError::EmptyResponse));
        assert!(cache.is_exhausted());
    }

    #[test]
    fn fetch_error_propagates() {
        let mut cache = PoseCache::new();
        let err = cache
            .next_pose(|| Err(OptimError::parse(4, "bad")))
            .unwrap_err();
        assert!(err.is_parse());
        assert_eq!(cache.cursor(), 0);
    }
}
