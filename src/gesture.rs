//! Hand samples and the gesture source seam
//!
//! Hand tracking itself lives outside the crate. The simulation only sees
//! `HandSample`s: an optional world-space position plus a coarse gesture.
//! A tracker may run slower than the frame loop, so consumers always read
//! the most recent sample (last value wins, nothing is queued).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse hand pose reported by the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gesture {
    #[default]
    None,
    OpenPalm,
    ClosedFist,
    Pointing,
}

impl Gesture {
    /// Whether this pose can slice fruit
    pub fn slices(self) -> bool {
        matches!(self, Gesture::Pointing | Gesture::OpenPalm)
    }

    /// Numeric code used across the wasm boundary
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Gesture::OpenPalm,
            2 => Gesture::ClosedFist,
            3 => Gesture::Pointing,
            _ => Gesture::None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Gesture::None => 0,
            Gesture::OpenPalm => 1,
            Gesture::ClosedFist => 2,
            Gesture::Pointing => 3,
        }
    }
}

/// One tracker reading. `position == None` means no hand is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HandSample {
    pub position: Option<Vec3>,
    pub gesture: Gesture,
}

impl HandSample {
    pub fn new(position: Vec3, gesture: Gesture) -> Self {
        Self {
            position: Some(position),
            gesture,
        }
    }

    /// No hand in view
    pub fn absent() -> Self {
        Self::default()
    }
}

/// Capture/session failures. None of these are fatal to gameplay.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("camera unavailable: {0}")]
    Unavailable(String),

    #[error("failed to release capture resources: {0}")]
    Release(String),
}

/// Health of a gesture source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    Active,
    /// No signal (permission denied, camera missing, ...)
    Unavailable(String),
}

/// A producer of hand samples (camera + pose inference in a real host)
pub trait GestureSource {
    /// New sample since the last poll, if the tracker produced one
    fn poll(&mut self) -> Option<HandSample>;

    fn status(&self) -> SourceStatus {
        SourceStatus::Active
    }

    /// Release camera/inference resources
    fn release(&mut self) -> Result<(), CaptureError>;
}

/// Scoped owner of a gesture source
///
/// Holds the most recent sample and releases the source exactly once,
/// either through `close` or when dropped.
pub struct CaptureSession<S: GestureSource> {
    source: Option<S>,
    latest: HandSample,
}

impl<S: GestureSource> CaptureSession<S> {
    pub fn open(source: S) -> Self {
        if let SourceStatus::Unavailable(reason) = source.status() {
            log::warn!("Gesture source unavailable: {reason}");
        }
        Self {
            source: Some(source),
            latest: HandSample::absent(),
        }
    }

    /// Poll the source and return the latest known sample
    pub fn sample(&mut self) -> HandSample {
        if let Some(sample) = self.source.as_mut().and_then(|s| s.poll()) {
            self.latest = sample;
        }
        self.latest
    }

    pub fn status(&self) -> SourceStatus {
        match &self.source {
            Some(source) => source.status(),
            None => SourceStatus::Unavailable("closed".to_string()),
        }
    }

    /// Release the source now and report any failure
    pub fn close(mut self) -> Result<(), CaptureError> {
        self.release_source()
    }

    fn release_source(&mut self) -> Result<(), CaptureError> {
        self.latest = HandSample::absent();
        match self.source.take() {
            Some(mut source) => source.release(),
            None => Ok(()),
        }
    }
}

impl<S: GestureSource> Drop for CaptureSession<S> {
    fn drop(&mut self) {
        if let Err(e) = self.release_source() {
            log::warn!("Gesture source teardown failed: {e}");
        }
    }
}

/// Thread-safe last-value-wins mailbox between a tracker and the frame loop
#[derive(Debug, Clone, Default)]
pub struct SampleSlot {
    inner: Arc<Mutex<HandSample>>,
}

impl SampleSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the stored sample
    pub fn publish(&self, sample: HandSample) {
        let mut slot = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *slot = sample;
    }

    pub fn latest(&self) -> HandSample {
        *self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Mark the hand as lost
    pub fn clear(&self) {
        self.publish(HandSample::absent());
    }
}

impl GestureSource for SampleSlot {
    fn poll(&mut self) -> Option<HandSample> {
        Some(self.latest())
    }

    fn release(&mut self) -> Result<(), CaptureError> {
        self.clear();
        Ok(())
    }
}

/// Replays a fixed list of samples, then reports no hand
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    samples: VecDeque<HandSample>,
    released: bool,
}

impl ScriptedSource {
    pub fn new(samples: impl IntoIterator<Item = HandSample>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
            released: false,
        }
    }

    pub fn remaining(&self) -> usize {
        self.samples.len()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl GestureSource for ScriptedSource {
    fn poll(&mut self) -> Option<HandSample> {
        if self.released {
            return None;
        }
        Some(self.samples.pop_front().unwrap_or_default())
    }

    fn release(&mut self) -> Result<(), CaptureError> {
        if self.released {
            return Err(CaptureError::Release("already released".to_string()));
        }
        self.released = true;
        self.samples.clear();
        Ok(())
    }
}

/// Normalized landmark from a 21-point hand model (x, y in [0, 1], y down)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Landmarks in the hand model
pub const HAND_LANDMARKS: usize = 21;

const INDEX_TIP: usize = 8;
const INDEX_PIP: usize = 6;
const MIDDLE_TIP: usize = 12;
const MIDDLE_PIP: usize = 10;
const RING_TIP: usize = 16;
const RING_PIP: usize = 14;
const PINKY_TIP: usize = 20;
const PINKY_PIP: usize = 18;

/// World-space area the camera frame maps onto
const TRACKING_WIDTH: f32 = 20.0;
const TRACKING_HEIGHT: f32 = 15.0;

/// Turn raw landmarks into a hand sample
///
/// Returns `None` when the landmark set is incomplete.
pub fn classify_landmarks(landmarks: &[Landmark]) -> Option<HandSample> {
    if landmarks.len() < HAND_LANDMARKS {
        return None;
    }

    // Image y grows downward, so an extended finger has its tip above the joint
    let extended = |tip: usize, pip: usize| landmarks[tip].y < landmarks[pip].y;
    let index = extended(INDEX_TIP, INDEX_PIP);
    let middle = extended(MIDDLE_TIP, MIDDLE_PIP);
    let ring = extended(RING_TIP, RING_PIP);
    let pinky = extended(PINKY_TIP, PINKY_PIP);

    let gesture = if index && middle && ring && pinky {
        Gesture::OpenPalm
    } else if !index && !middle && !ring && !pinky {
        Gesture::ClosedFist
    } else if index {
        Gesture::Pointing
    } else {
        Gesture::None
    };

    Some(HandSample::new(landmark_to_world(landmarks[INDEX_TIP]), gesture))
}

/// Map a landmark to the gameplay plane, mirroring x for a selfie camera
pub fn landmark_to_world(landmark: Landmark) -> Vec3 {
    Vec3::new(
        (1.0 - landmark.x) * TRACKING_WIDTH - TRACKING_WIDTH / 2.0,
        (1.0 - landmark.y) * TRACKING_HEIGHT - TRACKING_HEIGHT / 2.0,
        0.0,
    )
}
