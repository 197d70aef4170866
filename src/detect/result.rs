use anyhow::{anyhow, Result};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::geometry::SensorPoint;
use crate::landmark::LandmarkKey;
use crate::pose::SensorPose;

/// Landmarks reported by a detector for one frame, in sensor pixel space.
///
/// May be partial; [`Landmarks::into_pose`] fills every missing key with the origin.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Landmarks {
    points: BTreeMap<LandmarkKey, SensorPoint>,
}

impl Landmarks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: LandmarkKey, point: SensorPoint) {
        self.points.insert(key, point);
    }

    pub fn get(&self, key: LandmarkKey) -> Option<SensorPoint> {
        self.points.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Totalize into a pose.
    pub fn into_pose(self) -> SensorPose {
        SensorPose::from_fn(|key| self.points.get(&key).copied().unwrap_or_default())
    }

    /// Decode the plugin's dictionary output.
    ///
    /// `null` means no detection. Otherwise the payload must be an object whose
    /// keys are landmark wire names (`leftShoulderPosition`, ...) and whose
    /// values are `{"x": number, "y": number}`. Unknown names are skipped.
    pub fn from_json(raw: &str) -> Result<Option<Self>> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| anyhow!("invalid detector payload: {}", e))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Option<Self>> {
        let entries = match value {
            Value::Null => return Ok(None),
            Value::Object(entries) => entries,
            other => {
                return Err(anyhow!(
                    "detector payload must be an object or null, got {}",
                    json_kind(&other)
                ))
            }
        };

        let mut landmarks = Self::new();
        for (name, point) in entries {
            let Some(key) = LandmarkKey::from_wire_name(&name) else {
                log::debug!("ignoring unknown landmark '{}'", name);
                continue;
            };
            let point: SensorPoint = serde_json::from_value(point)
                .map_err(|e| anyhow!("invalid point for {}: {}", name, e))?;
            landmarks.insert(key, point);
        }
        Ok(Some(landmarks))
    }
}

impl FromIterator<(LandmarkKey, SensorPoint)> for Landmarks {
    fn from_iter<I: IntoIterator<Item = (LandmarkKey, SensorPoint)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_landmarks_totalize_with_origin() {
        let landmarks: Landmarks = [
            (LandmarkKey::LeftShoulder, SensorPoint::new(100.0, 200.0)),
            (LandmarkKey::RightAnkle, SensorPoint::new(5.0, 6.0)),
        ]
        .into_iter()
        .collect();

        let pose = landmarks.into_pose();
        assert_eq!(pose.iter().count(), LandmarkKey::ALL.len());
        assert_eq!(pose[LandmarkKey::LeftShoulder], SensorPoint::new(100.0, 200.0));
        assert_eq!(pose[LandmarkKey::RightAnkle], SensorPoint::new(5.0, 6.0));
        assert_eq!(pose[LandmarkKey::Nose], SensorPoint::ORIGIN);
    }

    #[test]
    fn decodes_plugin_dictionary() {
        let raw = r#"{
            "nosePosition": {"x": 540.5, "y": 300},
            "leftEarPosition": {"x": 10, "y": 20},
            "tailPosition": {"x": 1, "y": 1}
        }"#;
        let landmarks = Landmarks::from_json(raw).unwrap().expect("detection");
        assert_eq!(landmarks.len(), 2);
        assert_eq!(
            landmarks.get(LandmarkKey::Nose),
            Some(SensorPoint::new(540.5, 300.0))
        );
        assert_eq!(landmarks.get(LandmarkKey::RightEar), None);
    }

    #[test]
    fn null_payload_is_no_detection() {
        assert!(Landmarks::from_json("null").unwrap().is_none());
    }

    #[test]
    fn malformed_payloads_are_errors() {
        assert!(Landmarks::from_json("[1, 2]").is_err());
        assert!(Landmarks::from_json(r#"{"nosePosition": {"x": "a"}}"#).is_err());
        assert!(Landmarks::from_json("{").is_err());
    }
}
