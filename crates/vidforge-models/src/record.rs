//! Results document types.
//!
//! The results document is the single shared progress record for all
//! workers:
//!
//! ```json
//! { "groups": [ { "group_id": 1, "image_path": "...", "text_prompt": "...",
//!                 "videos": [ { "video_name": "1.mp4",
//!                               "video_path": "1/1.mp4",
//!                               "seed": 42 } ] } ] }
//! ```
//!
//! `groups` is kept sorted ascending by `group_id`, with at most one record
//! per id; `videos` is kept sorted by name with at most one record per name.
//! All mutation here is pure; I/O and locking live in `vidforge-store`.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One realized or recorded sub-job artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VideoRecord {
    /// Deterministic name, `"{k}.{ext}"` for sub-job k
    pub video_name: String,
    /// Location relative to the output root
    pub video_path: PathBuf,
    /// Seed the artifact was generated with. Absent for artifacts that were
    /// discovered on disk rather than generated by this run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

/// Progress state for one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GroupRecord {
    /// 1-based position of the group's key in the full sorted key order
    pub group_id: u64,
    /// Reference still image
    pub image_path: PathBuf,
    /// Generation instruction
    pub text_prompt: String,
    /// Realized sub-jobs, unique by `video_name`, sorted by name
    #[serde(default)]
    pub videos: Vec<VideoRecord>,
}

impl GroupRecord {
    /// Create an empty record for a group.
    pub fn new(group_id: u64, image_path: impl Into<PathBuf>, text_prompt: impl Into<String>) -> Self {
        Self {
            group_id,
            image_path: image_path.into(),
            text_prompt: text_prompt.into(),
            videos: Vec::new(),
        }
    }

    /// True when a video with this name is already recorded.
    pub fn has_video(&self, video_name: &str) -> bool {
        self.videos.iter().any(|v| v.video_name == video_name)
    }

    /// Record a video, replacing any stale record with the same name.
    ///
    /// Keeps `videos` sorted by name so repeated runs produce identical
    /// documents.
    pub fn record_video(&mut self, video: VideoRecord) {
        self.videos.retain(|v| v.video_name != video.video_name);
        self.videos.push(video);
        self.videos.sort_by(|a, b| a.video_name.cmp(&b.video_name));
    }
}

/// The root persisted structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResultsDocument {
    #[serde(default)]
    pub groups: Vec<GroupRecord>,
}

impl ResultsDocument {
    /// An empty document.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up a group record by id.
    pub fn group(&self, group_id: u64) -> Option<&GroupRecord> {
        self.groups.iter().find(|g| g.group_id == group_id)
    }

    /// Replace-or-insert a group record, keeping `groups` sorted ascending
    /// by `group_id` with at most one record per id.
    pub fn upsert_group(&mut self, record: GroupRecord) {
        self.groups.retain(|g| g.group_id != record.group_id);
        self.groups.push(record);
        self.groups.sort_by_key(|g| g.group_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(name: &str, seed: Option<u32>) -> VideoRecord {
        VideoRecord {
            video_name: name.to_string(),
            video_path: PathBuf::from(format!("1/{}", name)),
            seed,
        }
    }

    #[test]
    fn test_upsert_replaces_and_keeps_sorted() {
        let mut doc = ResultsDocument::empty();
        doc.upsert_group(GroupRecord::new(3, "c.jpg", "p3"));
        doc.upsert_group(GroupRecord::new(1, "a.jpg", "p1"));

        let mut updated = GroupRecord::new(3, "c.jpg", "p3-updated");
        updated.record_video(video("1.mp4", Some(7)));
        doc.upsert_group(updated);

        assert_eq!(doc.groups.len(), 2);
        assert_eq!(doc.groups[0].group_id, 1);
        assert_eq!(doc.groups[1].group_id, 3);
        assert_eq!(doc.groups[1].text_prompt, "p3-updated");
        assert_eq!(doc.groups[1].videos.len(), 1);
    }

    #[test]
    fn test_record_video_is_unique_by_name() {
        let mut group = GroupRecord::new(1, "a.jpg", "p");
        group.record_video(video("2.mp4", None));
        group.record_video(video("1.mp4", Some(5)));
        group.record_video(video("2.mp4", Some(9)));

        assert_eq!(group.videos.len(), 2);
        assert_eq!(group.videos[0].video_name, "1.mp4");
        assert_eq!(group.videos[1].video_name, "2.mp4");
        assert_eq!(group.videos[1].seed, Some(9));
    }

    #[test]
    fn test_seed_omitted_from_json_when_absent() {
        let rec = video("1.mp4", None);
        let json = serde_json::to_string(&rec).unwrap();
        assert!(!json.contains("seed"));

        let rec = video("1.mp4", Some(42));
        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains("\"seed\":42"));
    }

    #[test]
    fn test_document_round_trips() {
        let mut doc = ResultsDocument::empty();
        let mut group = GroupRecord::new(1, "a.jpg", "p0");
        group.record_video(video("1.mp4", Some(1)));
        doc.upsert_group(group);

        let json = serde_json::to_string_pretty(&doc).unwrap();
        let back: ResultsDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
