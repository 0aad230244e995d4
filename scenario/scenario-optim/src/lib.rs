//! Pose sources for the manipulated object.
//!
//! Two ways of choosing where the manipulated object goes next:
//!
//! - [`PoseSampler`] - uniform sampling inside per-axis bounds
//! - [`PoseOptimizer`] - a port returning batches of candidate poses, with
//!   [`ScriptOptimizer`] as the external-process implementation and
//!   [`PoseCache`] handing the batch out one pose per step
//!
//! # Optimizer protocol
//!
//! [`ScriptOptimizer`] talks to the optimizer through three files: a request
//! file (see [`encode_request`]), a hyperparameter file with `\n` escapes
//! expanded, and a response file with one pose per line (see
//! [`decode_response`]). The script runs to completion before the response
//! is read.
//!
//! # Layer 0
//!
//! No engine dependencies. The only side effects are the protocol files and
//! the optimizer subprocess.
//!
//! # Example
//!
//! ```
//! use scenario_optim::{OptimizationRequest, PoseCache, PoseOptimizer};
//! use scenario_types::Pose;
//!
//! // Any closure over a request is an optimizer.
//! let mut optimizer = |req: &OptimizationRequest| -> scenario_optim::Result<Vec<Pose>> {
//!     Ok(vec![req.manipulated.pose; 4])
//! };
//! let mut cache = PoseCache::new();
//!
//! let request = OptimizationRequest::default();
//! let pose = cache.next_pose(|| optimizer.optimise(&request)).unwrap();
//! assert_eq!(pose, Pose::default());
//! assert_eq!(cache.remaining(), 3);
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(clippy::missing_errors_doc)]

mod cache;
mod error;
mod optimizer;
mod protocol;
mod sampler;

pub use cache::PoseCache;
pub use error::{OptimError, Result};
pub use optimizer::{PoseOptimizer, ScriptOptimizer};
pub use protocol::{
    decode_request, decode_response, encode_request, encode_response, expand_escapes,
    ObjectState, OptimizationRequest, OBJECT_FIELDS, POSE_FIELDS,
};
pub use sampler::PoseSampler;
