mod approval;
mod status;

pub use approval::{Approval, ApprovalWithSubmitter, StatusCounts};
pub use status::{RecordStatus, ReviewDecision, SubmissionKind, TransitionError};
