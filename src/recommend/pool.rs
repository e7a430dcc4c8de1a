use std::collections::HashSet;

use crate::video::CandidateVideo;

/// Insertion-ordered set of candidates keyed by video id.
///
/// The first copy of an id wins; later duplicates are ignored. Iteration
/// order is arrival order, which is what engagement ties fall back to.
#[derive(Debug, Default, Clone)]
pub struct CandidatePool {
    videos: Vec<CandidateVideo>,
    ids: HashSet<String>,
}

impl CandidatePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate. Returns false for id-less candidates and duplicates.
    pub fn insert(&mut self, video: CandidateVideo) -> bool {
        if !video.has_id() || self.ids.contains(&video.video_id) {
            return false;
        }
        self.ids.insert(video.video_id.clone());
        self.videos.push(video);
        true
    }

    pub fn contains(&self, video_id: &str) -> bool {
        self.ids.contains(video_id)
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CandidateVideo> {
        self.videos.iter()
    }

    pub fn into_vec(self) -> Vec<CandidateVideo> {
        self.videos
    }
}

impl FromIterator<CandidateVideo> for CandidatePool {
    fn from_iter<I: IntoIterator<Item = CandidateVideo>>(iter: I) -> Self {
        let mut pool = Self::new();
        for video in iter {
            pool.insert(video);
        }
        pool
    }
}
