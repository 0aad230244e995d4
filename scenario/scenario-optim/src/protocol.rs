//! Line-oriented text format shared with the external optimizer.
//!
//! # Request
//!
//! One number per line. The manipulated object comes first, followed by every
//! static object, each as 12 values:
//!
//! ```text
//! x y z roll pitch yaw min_x min_y min_z max_x max_y max_z
//! ```
//!
//! # Response
//!
//! One candidate pose per line, six whitespace-separated numbers
//! (`x y z roll pitch yaw`). Blank lines are ignored.

use std::fmt::Write as _;

use nalgebra::Point3;
use scenario_types::{Aabb, Pose};

use crate::error::{OptimError, Result};

/// Values per object in a request.
pub const OBJECT_FIELDS: usize = 12;

/// Values per pose in a response.
pub const POSE_FIELDS: usize = 6;

/// Pose and bounding box of one object at request time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ObjectState {
    /// Current pose.
    pub pose: Pose,
    /// Current world-space bounding box.
    pub bbox: Aabb,
}

impl ObjectState {
    /// Create an object state.
    #[must_use]
    pub const fn new(pose: Pose, bbox: Aabb) -> Self {
        Self { pose, bbox }
    }

    fn components(&self) -> [f64; OBJECT_FIELDS] {
        let mut out = [0.0; OBJECT_FIELDS];
        out[..POSE_FIELDS].copy_from_slice(&self.pose.to_components());
        out[POSE_FIELDS..].copy_from_slice(&self.bbox.to_components());
        out
    }

    fn from_components(v: &[f64]) -> Self {
        Self {
            pose: Pose::from_components(v[0], v[1], v[2], v[3], v[4], v[5]),
            bbox: Aabb::new(
                Point3::new(v[6], v[7], v[8]),
                Point3::new(v[9], v[10], v[11]),
            ),
        }
    }
}

/// Scene snapshot handed to the optimizer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OptimizationRequest {
    /// The object being re-posed.
    pub manipulated: ObjectState,
    /// Objects expected to stay where they are.
    pub statics: Vec<ObjectState>,
}

impl OptimizationRequest {
    /// Create a request.
    #[must_use]
    pub fn new(manipulated: ObjectState, statics: Vec<ObjectState>) -> Self {
        Self {
            manipulated,
            statics,
        }
    }

    /// Number of objects described, the manipulated one included.
    #[must_use]
    pub fn object_count(&self) -> usize {
        1 + self.statics.len()
    }
}

/// Encode a request, one value per line.
#[must_use]
pub fn encode_request(request: &OptimizationRequest) -> String {
    let mut out = String::with_capacity(request.object_count() * OBJECT_FIELDS * 8);
    for object in std::iter::once(&request.manipulated).chain(&request.statics) {
        for value in object.components() {
            // Writing to a String cannot fail.
            let _ = writeln!(out, "{value}");
        }
    }
    out
}

/// Decode a request written by [`encode_request`].
///
/// Used by in-process optimizers and test stubs that read the request file.
pub fn decode_request(text: &str) -> Result<OptimizationRequest> {
    let mut values = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        values.push(parse_value(line, index + 1)?);
    }

    if values.is_empty() || values.len() % OBJECT_FIELDS != 0 {
        return Err(OptimError::parse(
            text.lines().count().max(1),
            format!(
                "request holds {} values, expected a positive multiple of {OBJECT_FIELDS}",
                values.len()
            ),
        ));
    }

    let mut objects = values
        .chunks_exact(OBJECT_FIELDS)
        .map(ObjectState::from_components);
    let manipulated = objects.next().unwrap_or_default();
    Ok(OptimizationRequest::new(manipulated, objects.collect()))
}

/// Encode poses in the response format.
#[must_use]
pub fn encode_response(poses: &[Pose]) -> String {
    let mut out = String::new();
    for pose in poses {
        let [x, y, z, roll, pitch, yaw] = pose.to_components();
        let _ = writeln!(out, "{x} {y} {z} {roll} {pitch} {yaw}");
    }
    out
}

/// Decode a response into candidate poses.
///
/// # Errors
///
/// Returns [`OptimError::Parse`] with the 1-based line number for a
/// non-numeric token or a line without exactly six values.
pub fn decode_response(text: &str) -> Result<Vec<Pose>> {
    let mut poses = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != POSE_FIELDS {
            return Err(OptimError::parse(
                line_no,
                format!("expected {POSE_FIELDS} values, got {}", fields.len()),
            ));
        }
        let mut v = [0.0; POSE_FIELDS];
        for (slot, token) in v.iter_mut().zip(&fields) {
            *slot = parse_value(token, line_no)?;
        }
        poses.push(Pose::from_components(v[0], v[1], v[2], v[3], v[4], v[5]));
    }
    Ok(poses)
}

/// Replace literal `\n` escape sequences with newlines.
#[must_use]
pub fn expand_escapes(text: &str) -> String {
    text.replace("\\n", "\n")
}

fn parse_value(token: &str, line: usize) -> Result<f64> {
    token
        .parse::<f64>()
        .map_err(|_| OptimError::parse(line, format!("'{token}' is not a number")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cube(x: f64) -> ObjectState {
        ObjectState::new(
            Pose::from_components(x, 0.0, 1.0, 0.0, 0.0, 30.0),
            Aabb::new(
                Point3::new(x - 1.0, -1.0, 0.0),
                Point3::new(x + 1.0, 1.0, 2.0),
            ),
        )
    }

    #[test]
    fn request_is_one_value_per_line() {
        let request = OptimizationRequest::new(cube(0.0), vec![cube(5.0), cube(-5.0)]);
        let text = encode_request(&request);
        assert_eq!(text.lines().count(), 3 * OBJECT_FIELDS);
        assert_eq!(text.lines().next(), Some("0"));
        // First static object's x follows the manipulated object's 12 values.
        assert_eq!(text.lines().nth(OBJECT_FIELDS), Some("5"));
    }

    #[test]
    fn request_decodes_back() {
        let request = OptimizationRequest::new(cube(0.25), vec![cube(5.5)]);
        let decoded = decode_request(&encode_request(&request)).unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn request_with_partial_object_rejected() {
        let text = "1\n2\n3\n";
        assert!(decode_request(text).unwrap_err().is_parse());
        assert!(decode_request("").is_err());
    }

    #[test]
    fn response_skips_blank_lines() {
        let text = "1 2 3 10 20 30\n\n   \n-1.5 0 0.25 0 0 90\n";
        let poses = decode_response(text).unwrap();
        assert_eq!(poses.len(), 2);
        assert_eq!(poses[0].to_components(), [1.0, 2.0, 3.0, 10.0, 20.0, 30.0]);
        assert_relative_eq!(poses[1].position.x, -1.5);
        assert_relative_eq!(poses[1].rotation.yaw, 90.0);
    }

    #[test]
    fn response_wrong_field_count_reports_line() {
        let text = "1 2 3 4 5 6\n1 2 3 4 5\n";
        assert_eq!(
            decode_response(text),
            Err(OptimError::parse(2, "expected 6 values, got 5"))
        );
    }

    #[test]
    fn response_non_numeric_token_reports_line() {
        let text = "\n1 2 3 4 five 6\n";
        match decode_response(text) {
            Err(OptimError::Parse { line, reason }) => {
                assert_eq!(line, 2);
                assert!(reason.contains("five"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn response_encodes_back() {
        let poses = vec![
            Pose::from_components(0.1, 0.2, 0.3, 1.0, 2.0, 3.0),
            Pose::from_components(-7.0, 8.5, 0.0, 0.0, -45.0, 180.0),
        ];
        assert_eq!(decode_response(&encode_response(&poses)).unwrap(), poses);
    }

    #[test]
    fn escapes_expand_to_newlines() {
        assert_eq!(expand_escapes("lr=0.1\\niters=50"), "lr=0.1\niters=50");
        assert_eq!(expand_escapes("plain"), "plain");
    }
}
