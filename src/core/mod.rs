pub mod contact;
pub mod dispatch;
pub mod notice;
pub mod verification;

pub use crate::domain::model::{
    DispatchResponse, Notice, NoticeKind, Submission, VerificationResult, VerifyResponse,
};
pub use crate::domain::ports::{Assessor, Mailer};
pub use crate::utils::error::Result;
pub use contact::{ContactFlow, ContactOutcome};
pub use dispatch::NotificationDispatcher;
pub use notice::NoticeComposer;
pub use verification::VerificationGate;
