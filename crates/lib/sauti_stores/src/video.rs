//! Video store — the public video feed plus playback selection.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, warn};

use sauti_api_client::RemoteApi;
use sauti_core::models::{Comment, FileRef, Video};

use crate::error::StoreError;
use crate::listeners::{ListenerId, Listeners};
use crate::session::SessionStore;
use crate::sync::FetchSeq;

/// The video currently selected for playback: source URI plus a snapshot
/// of the entity, held independently from the list.
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    pub source: String,
    pub video: Video,
}

struct VideoState {
    videos: Vec<Video>,
    loading: bool,
    current: Option<Playback>,
}

/// Store of published videos.
///
/// Engagement counters are never bumped optimistically — likes and
/// bookmark flags always reflect what the server returned.
pub struct VideoStore {
    api: Arc<dyn RemoteApi>,
    session: Arc<SessionStore>,
    state: Mutex<VideoState>,
    fetch_seq: FetchSeq,
    listeners: Listeners,
}

impl VideoStore {
    pub fn new(api: Arc<dyn RemoteApi>, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            state: Mutex::new(VideoState {
                videos: Vec::new(),
                loading: false,
                current: None,
            }),
            fetch_seq: FetchSeq::new(),
            listeners: Listeners::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VideoState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_loading(&self, loading: bool) {
        self.lock().loading = loading;
        self.listeners.notify();
    }

    pub fn videos(&self) -> Vec<Video> {
        self.lock().videos.clone()
    }

    pub fn loading(&self) -> bool {
        self.lock().loading
    }

    pub fn current_video(&self) -> Option<Playback> {
        self.lock().current.clone()
    }

    /// Select (or clear) the video for playback.
    pub fn set_current_video(&self, playback: Option<Playback>) {
        self.lock().current = playback;
        self.listeners.notify();
    }

    pub fn subscribe<F: Fn() + Send + Sync + 'static>(&self, listener: F) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Replace the collection with the public feed. No sign-in required.
    pub async fn fetch_videos(&self) -> Result<(), StoreError> {
        let seq = self.fetch_seq.begin();
        self.set_loading(true);

        match self.api.get_all_videos().await {
            Ok(videos) => {
                if self.fetch_seq.is_current(seq) {
                    let mut state = self.lock();
                    state.videos = videos;
                    state.loading = false;
                    drop(state);
                    self.listeners.notify();
                } else {
                    debug!(seq, "stale video fetch discarded");
                    self.set_loading(false);
                }
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to fetch videos");
                self.set_loading(false);
                Err(e.into())
            }
        }
    }

    /// Like a video; the displayed count is the server's returned value.
    pub async fn like_video(&self, video_id: &str) -> Result<(), StoreError> {
        let updated = self.api.like_video(video_id).await.map_err(|e| {
            error!(error = %e, "failed to like video");
            e
        })?;

        let mut state = self.lock();
        match state.videos.iter_mut().find(|v| v.id == video_id) {
            Some(video) => {
                video.likes = updated.likes;
                drop(state);
                self.listeners.notify();
            }
            None => {
                drop(state);
                debug!(video_id, "video not found; like not reconciled");
            }
        }
        Ok(())
    }

    /// Toggle a bookmark; the flag is the server's returned value.
    pub async fn bookmark_video(&self, video_id: &str) -> Result<(), StoreError> {
        let updated = self.api.bookmark_video(video_id).await.map_err(|e| {
            error!(error = %e, "failed to bookmark video");
            e
        })?;

        let mut state = self.lock();
        match state.videos.iter_mut().find(|v| v.id == video_id) {
            Some(video) => {
                video.is_bookmarked = updated.is_bookmarked;
                drop(state);
                self.listeners.notify();
            }
            None => {
                drop(state);
                debug!(video_id, "video not found; bookmark not reconciled");
            }
        }
        Ok(())
    }

    /// Add a comment to a video's comment list. An unknown video id is a
    /// logged no-op.
    pub async fn add_comment(&self, video_id: &str, text: &str) -> Result<Comment, StoreError> {
        let comment = self.api.add_comment(video_id, text).await.map_err(|e| {
            error!(error = %e, "failed to add comment");
            e
        })?;

        let mut state = self.lock();
        match state.videos.iter_mut().find(|v| v.id == video_id) {
            Some(video) => {
                video.comments.push(comment.clone());
                drop(state);
                self.listeners.notify();
            }
            None => {
                drop(state);
                warn!(video_id, "video not found; comment not spliced");
            }
        }
        Ok(comment)
    }

    /// Upload a new video; the server's record is prepended.
    pub async fn upload_video(&self, file: &FileRef, title: &str) -> Result<Video, StoreError> {
        let user_id = self.session.user_id().ok_or(StoreError::NotSignedIn)?;

        self.set_loading(true);
        match self.api.upload_video(file, title, &user_id).await {
            Ok(video) => {
                let mut state = self.lock();
                state.videos.insert(0, video.clone());
                state.loading = false;
                drop(state);
                self.listeners.notify();
                Ok(video)
            }
            Err(e) => {
                error!(error = %e, "failed to upload video");
                self.set_loading(false);
                Err(e.into())
            }
        }
    }
}
