pub mod analytics;
pub mod calendar;
pub mod clock;
pub mod domain;
pub mod freshness;
pub mod ports;
pub mod tracker;

pub use calendar::StudyCalendar;
pub use clock::{ManualClock, SystemClock};
pub use domain::{
    ChapterProgress, NewSession, NewTarget, NewTask, PracticeSession, StudyTask, Subject,
    SubjectScope, Target, User, UserCredentials,
};
pub use freshness::{Collection, FreshnessCache};
pub use ports::{AccountStore, Clock, PortError, PortResult, PracticeStore, TaskStore};
pub use tracker::{FetchOutcome, PracticeTracker, RefreshReport, TrackerError, TrackerResult};
