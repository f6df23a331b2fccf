#![deny(unsafe_code)]

pub mod automatch;
pub mod engine;
pub mod partition;
pub mod score;
pub mod text;

pub use automatch::automatch;
pub use engine::{CancelToken, Ranker, RankingPlan, RunState, RunStatus, StepEvent};
pub use partition::{BucketInput, SideInput, partition};
pub use score::part_distance;
pub use text::{extract_parts, normalize, normalized_parts, parts_match};
