//! Landmark catalogue.
//!
//! The detector plugin reports a dictionary keyed by joint name. This module
//! fixes that key set as a closed enum so every pose carries every joint and
//! iteration is a fixed-size loop.

use serde::{Deserialize, Serialize};

/// Number of landmarks in the catalogue.
pub const LANDMARK_COUNT: usize = 33;

/// Which half of the body a landmark belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Center,
}

/// One tracked body or face point.
///
/// The serialized form is the plugin wire name (`leftShoulderPosition`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LandmarkKey {
    #[serde(rename = "leftShoulderPosition")]
    LeftShoulder,
    #[serde(rename = "rightShoulderPosition")]
    RightShoulder,
    #[serde(rename = "leftElbowPosition")]
    LeftElbow,
    #[serde(rename = "rightElbowPosition")]
    RightElbow,
    #[serde(rename = "leftWristPosition")]
    LeftWrist,
    #[serde(rename = "rightWristPosition")]
    RightWrist,
    #[serde(rename = "leftHipPosition")]
    LeftHip,
    #[serde(rename = "rightHipPosition")]
    RightHip,
    #[serde(rename = "leftKneePosition")]
    LeftKnee,
    #[serde(rename = "rightKneePosition")]
    RightKnee,
    #[serde(rename = "leftAnklePosition")]
    LeftAnkle,
    #[serde(rename = "rightAnklePosition")]
    RightAnkle,
    #[serde(rename = "leftPinkyPosition")]
    LeftPinky,
    #[serde(rename = "rightPinkyPosition")]
    RightPinky,
    #[serde(rename = "leftIndexPosition")]
    LeftIndex,
    #[serde(rename = "rightIndexPosition")]
    RightIndex,
    #[serde(rename = "leftThumbPosition")]
    LeftThumb,
    #[serde(rename = "rightThumbPosition")]
    RightThumb,
    #[serde(rename = "leftHeelPosition")]
    LeftHeel,
    #[serde(rename = "rightHeelPosition")]
    RightHeel,
    #[serde(rename = "nosePosition")]
    Nose,
    #[serde(rename = "leftFootIndexPosition")]
    LeftFootIndex,
    #[serde(rename = "rightFootIndexPosition")]
    RightFootIndex,
    #[serde(rename = "leftEyeInnerPosition")]
    LeftEyeInner,
    #[serde(rename = "rightEyeInnerPosition")]
    RightEyeInner,
    #[serde(rename = "leftEyePosition")]
    LeftEye,
    #[serde(rename = "rightEyePosition")]
    RightEye,
    #[serde(rename = "leftEyeOuterPosition")]
    LeftEyeOuter,
    #[serde(rename = "rightEyeOuterPosition")]
    RightEyeOuter,
    #[serde(rename = "leftEarPosition")]
    LeftEar,
    #[serde(rename = "rightEarPosition")]
    RightEar,
    #[serde(rename = "leftMouthPosition")]
    LeftMouth,
    #[serde(rename = "rightMouthPosition")]
    RightMouth,
}

impl LandmarkKey {
    /// Fixed iteration order. `ALL[k.index()] == k` for every key.
    pub const ALL: [LandmarkKey; LANDMARK_COUNT] = [
        LandmarkKey::LeftShoulder,
        LandmarkKey::RightShoulder,
        LandmarkKey::LeftElbow,
        LandmarkKey::RightElbow,
        LandmarkKey::LeftWrist,
        LandmarkKey::RightWrist,
        LandmarkKey::LeftHip,
        LandmarkKey::RightHip,
        LandmarkKey::LeftKnee,
        LandmarkKey::RightKnee,
        LandmarkKey::LeftAnkle,
        LandmarkKey::RightAnkle,
        LandmarkKey::LeftPinky,
        LandmarkKey::RightPinky,
        LandmarkKey::LeftIndex,
        LandmarkKey::RightIndex,
        LandmarkKey::LeftThumb,
        LandmarkKey::RightThumb,
        LandmarkKey::LeftHeel,
        LandmarkKey::RightHeel,
        LandmarkKey::Nose,
        LandmarkKey::LeftFootIndex,
        LandmarkKey::RightFootIndex,
        LandmarkKey::LeftEyeInner,
        LandmarkKey::RightEyeInner,
        LandmarkKey::LeftEye,
        LandmarkKey::RightEye,
        LandmarkKey::LeftEyeOuter,
        LandmarkKey::RightEyeOuter,
        LandmarkKey::LeftEar,
        LandmarkKey::RightEar,
        LandmarkKey::LeftMouth,
        LandmarkKey::RightMouth,
    ];

    /// Position of this key in [`LandmarkKey::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Name used by the detector plugin's dictionary.
    pub const fn wire_name(self) -> &'static str {
        match self {
            LandmarkKey::LeftShoulder => "leftShoulderPosition",
            LandmarkKey::RightShoulder => "rightShoulderPosition",
            LandmarkKey::LeftElbow => "leftElbowPosition",
            LandmarkKey::RightElbow => "rightElbowPosition",
            LandmarkKey::LeftWrist => "leftWristPosition",
            LandmarkKey::RightWrist => "rightWristPosition",
            LandmarkKey::LeftHip => "leftHipPosition",
            LandmarkKey::RightHip => "rightHipPosition",
            LandmarkKey::LeftKnee => "leftKneePosition",
            LandmarkKey::RightKnee => "rightKneePosition",
            LandmarkKey::LeftAnkle => "leftAnklePosition",
            LandmarkKey::RightAnkle => "rightAnklePosition",
            LandmarkKey::LeftPinky => "leftPinkyPosition",
            LandmarkKey::RightPinky => "rightPinkyPosition",
            LandmarkKey::LeftIndex => "leftIndexPosition",
            LandmarkKey::RightIndex => "rightIndexPosition",
            LandmarkKey::LeftThumb => "leftThumbPosition",
            LandmarkKey::RightThumb => "rightThumbPosition",
            LandmarkKey::LeftHeel => "leftHeelPosition",
            LandmarkKey::RightHeel => "rightHeelPosition",
            LandmarkKey::Nose => "nosePosition",
            LandmarkKey::LeftFootIndex => "leftFootIndexPosition",
            LandmarkKey::RightFootIndex => "rightFootIndexPosition",
            LandmarkKey::LeftEyeInner => "leftEyeInnerPosition",
            LandmarkKey::RightEyeInner => "rightEyeInnerPosition",
            LandmarkKey::LeftEye => "leftEyePosition",
            LandmarkKey::RightEye => "rightEyePosition",
            LandmarkKey::LeftEyeOuter => "leftEyeOuterPosition",
            LandmarkKey::RightEyeOuter => "rightEyeOuterPosition",
            LandmarkKey::LeftEar => "leftEarPosition",
            LandmarkKey::RightEar => "rightEarPosition",
            LandmarkKey::LeftMouth => "leftMouthPosition",
            LandmarkKey::RightMouth => "rightMouthPosition",
        }
    }

    /// Reverse of [`LandmarkKey::wire_name`].
    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.wire_name() == name)
    }

    pub const fn side(self) -> Side {
        match self {
            LandmarkKey::Nose => Side::Center,
            LandmarkKey::LeftShoulder
            | LandmarkKey::LeftElbow
            | LandmarkKey::LeftWrist
            | LandmarkKey::LeftHip
            | LandmarkKey::LeftKnee
            | LandmarkKey::LeftAnkle
            | LandmarkKey::LeftPinky
            | LandmarkKey::LeftIndex
            | LandmarkKey::LeftThumb
            | LandmarkKey::LeftHeel
            | LandmarkKey::LeftFootIndex
            | LandmarkKey::LeftEyeInner
            | LandmarkKey::LeftEye
            | LandmarkKey::LeftEyeOuter
            | LandmarkKey::LeftEar
            | LandmarkKey::LeftMouth => Side::Left,
            _ => Side::Right,
        }
    }
}
