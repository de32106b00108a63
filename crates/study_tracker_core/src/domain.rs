//! crates/study_tracker_core/src/domain.rs
//!
//! Defines the core data structures for practice tracking: sessions, chapter
//! rollups, targets, study tasks and users, plus the typed write requests that
//! the tracker validates before anything reaches a store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

//=========================================================================================
// Text-backed Enumerations
//=========================================================================================

/// Returned when a stored or submitted string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a fieldless enum whose variants round-trip through a fixed string,
/// used both on the wire (serde) and in the database (text columns).
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident {
        $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
    }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $text)] $variant,)+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

text_enum!(
    /// The exam subjects a session can belong to. Every session has exactly one.
    Subject {
        Physics => "Physics",
        Chemistry => "Chemistry",
        Mathematics => "Mathematics",
        Biology => "Biology",
    }
);

text_enum!(
    /// Where the practised questions came from.
    PracticeSource {
        Module => "module",
        PreviousYears => "previous_years",
        CustomPractice => "custom_practice",
        Reference => "reference",
        Other => "other",
    }
);

text_enum!(
    Difficulty {
        Easy => "easy",
        Medium => "medium",
        Hard => "hard",
    }
);

text_enum!(
    /// Manually assigned revision priority of a chapter.
    #[derive(Default)]
    RevisionPriority {
        Low => "low",
        #[default]
        Medium => "medium",
        High => "high",
    }
);

text_enum!(
    #[derive(Default)]
    MasteryLevel {
        #[default]
        NotStarted => "not_started",
        Learning => "learning",
        Practicing => "practicing",
        Confident => "confident",
        Mastered => "mastered",
    }
);

text_enum!(
    /// The period a target is meant to cover.
    TargetType {
        Daily => "daily",
        Weekly => "weekly",
        Monthly => "monthly",
    }
);

/// The subject scope of a target: one subject, or every subject (`"all"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SubjectScope {
    All,
    Only(Subject),
}

impl SubjectScope {
    pub fn includes(&self, subject: Subject) -> bool {
        match self {
            SubjectScope::All => true,
            SubjectScope::Only(s) => *s == subject,
        }
    }
}

impl TryFrom<String> for SubjectScope {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::str::FromStr for SubjectScope {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(SubjectScope::All);
        }
        s.parse::<Subject>().map(SubjectScope::Only).map_err(|_| UnknownVariant {
            kind: "SubjectScope",
            value: s.to_string(),
        })
    }
}

impl From<SubjectScope> for String {
    fn from(scope: SubjectScope) -> Self {
        match scope {
            SubjectScope::All => "all".to_string(),
            SubjectScope::Only(subject) => subject.as_str().to_string(),
        }
    }
}

//=========================================================================================
// Entities
//=========================================================================================

/// One logged unit of practice against a subject and chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PracticeSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub subject: Subject,
    pub chapter_name: String,
    pub source: PracticeSource,
    pub source_details: Option<String>,
    pub questions_target: u32,
    pub questions_solved: u32,
    /// Minutes.
    pub time_spent: u32,
    pub difficulty: Option<Difficulty>,
    pub accuracy_percentage: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Denormalized cumulative statistics for one (user, subject, chapter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ChapterProgress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject: Subject,
    pub chapter_name: String,
    pub total_questions: u32,
    pub total_time: u32,
    pub last_practiced: Option<NaiveDate>,
    pub revision_priority: RevisionPriority,
    pub mastery_level: MasteryLevel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChapterProgress {
    pub fn key(&self) -> (Subject, &str) {
        (self.subject, self.chapter_name.as_str())
    }
}

/// A question/time goal over an explicit date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Target {
    pub id: Uuid,
    pub user_id: Uuid,
    pub target_type: TargetType,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "all"))]
    pub subject: SubjectScope,
    pub questions_goal: u32,
    /// Minutes.
    pub time_goal: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Target {
    /// A target is active while `start_date <= today <= end_date`.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.start_date <= today && today <= self.end_date
    }
}

/// A scheduled study task on the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StudyTask {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub subject: Option<Subject>,
    pub scheduled_date: NaiveDate,
    pub duration_minutes: u32,
    pub completed: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Represents a user - used throughout app
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub exam_goal: Option<String>,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
}

/// The row as it was before a write and as it is after.
#[derive(Debug, Clone, PartialEq)]
pub struct Revision<T> {
    pub before: T,
    pub after: T,
}

//=========================================================================================
// Write Requests
//=========================================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} must not be blank")]
    BlankField(&'static str),
    #[error("accuracy percentage {0} is outside 0..=100")]
    AccuracyOutOfRange(f64),
    #[error("start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("update request does not change any field")]
    EmptyPatch,
    #[error("{field} value {value} exceeds 2147483647")]
    TooLarge { field: &'static str, value: u32 },
}

/// Largest count or minute total a stored row can hold (a signed 32-bit column).
pub const MAX_STORED_COUNT: u32 = i32::MAX as u32;

fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}

fn require_accuracy(value: Option<f64>) -> Result<(), ValidationError> {
    match value {
        Some(v) if !(0.0..=100.0).contains(&v) => Err(ValidationError::AccuracyOutOfRange(v)),
        _ => Ok(()),
    }
}

fn require_storable(field: &'static str, value: Option<u32>) -> Result<(), ValidationError> {
    match value {
        Some(v) if v > MAX_STORED_COUNT => Err(ValidationError::TooLarge { field, value: v }),
        _ => Ok(()),
    }
}

fn require_range(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if start > end {
        return Err(ValidationError::InvalidDateRange { start, end });
    }
    Ok(())
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`)
/// so that patches can clear nullable columns.
fn nullable<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewSession {
    pub date: NaiveDate,
    pub subject: Subject,
    pub chapter_name: String,
    pub source: PracticeSource,
    #[serde(default)]
    pub source_details: Option<String>,
    #[serde(default)]
    pub questions_target: u32,
    pub questions_solved: u32,
    pub time_spent: u32,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub accuracy_percentage: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewSession {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("chapter_name", &self.chapter_name)?;
        require_storable("questions_target", Some(self.questions_target))?;
        require_storable("questions_solved", Some(self.questions_solved))?;
        require_storable("time_spent", Some(self.time_spent))?;
        require_accuracy(self.accuracy_percentage)
    }

    /// Builds the stored row. Used by stores that do not assign ids themselves.
    pub fn into_session(self, user_id: Uuid, now: DateTime<Utc>) -> PracticeSession {
        PracticeSession {
            id: Uuid::new_v4(),
            user_id,
            date: self.date,
            subject: self.subject,
            chapter_name: self.chapter_name.trim().to_string(),
            source: self.source,
            source_details: self.source_details,
            questions_target: self.questions_target,
            questions_solved: self.questions_solved,
            time_spent: self.time_spent,
            difficulty: self.difficulty,
            accuracy_percentage: self.accuracy_percentage,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Field changes for a session. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SessionPatch {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub subject: Option<Subject>,
    #[serde(default)]
    pub chapter_name: Option<String>,
    #[serde(default)]
    pub source: Option<PracticeSource>,
    #[serde(default, deserialize_with = "nullable")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub source_details: Option<Option<String>>,
    #[serde(default)]
    pub questions_target: Option<u32>,
    #[serde(default)]
    pub questions_solved: Option<u32>,
    #[serde(default)]
    pub time_spent: Option<u32>,
    #[serde(default, deserialize_with = "nullable")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Difficulty>))]
    pub difficulty: Option<Option<Difficulty>>,
    #[serde(default, deserialize_with = "nullable")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<f64>))]
    pub accuracy_percentage: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub notes: Option<Option<String>>,
}

impl SessionPatch {
    pub fn is_empty(&self) -> bool {
        *self == SessionPatch::default()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyPatch);
        }
        if let Some(name) = &self.chapter_name {
            require_text("chapter_name", name)?;
        }
        require_storable("questions_target", self.questions_target)?;
        require_storable("questions_solved", self.questions_solved)?;
        require_storable("time_spent", self.time_spent)?;
        require_accuracy(self.accuracy_percentage.flatten())
    }

    pub fn apply(&self, session: &mut PracticeSession) {
        if let Some(date) = self.date {
            session.date = date;
        }
        if let Some(subject) = self.subject {
            session.subject = subject;
        }
        if let Some(name) = &self.chapter_name {
            session.chapter_name = name.trim().to_string();
        }
        if let Some(source) = self.source {
            session.source = source;
        }
        if let Some(details) = &self.source_details {
            session.source_details = details.clone();
        }
        if let Some(target) = self.questions_target {
            session.questions_target = target;
        }
        if let Some(solved) = self.questions_solved {
            session.questions_solved = solved;
        }
        if let Some(minutes) = self.time_spent {
            session.time_spent = minutes;
        }
        if let Some(difficulty) = self.difficulty {
            session.difficulty = difficulty;
        }
        if let Some(accuracy) = self.accuracy_percentage {
            session.accuracy_percentage = accuracy;
        }
        if let Some(notes) = &self.notes {
            session.notes = notes.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionUpdate {
    pub id: Uuid,
    pub fields: SessionPatch,
}

/// A signed change to one chapter rollup, applied atomically by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterDelta {
    pub subject: Subject,
    pub chapter_name: String,
    pub questions: i64,
    pub minutes: i64,
    /// Only set when practice was added; never moves `last_practiced` backwards.
    pub practiced_on: Option<NaiveDate>,
}

impl ChapterDelta {
    pub fn added(session: &PracticeSession) -> Self {
        Self {
            subject: session.subject,
            chapter_name: session.chapter_name.clone(),
            questions: i64::from(session.questions_solved),
            minutes: i64::from(session.time_spent),
            practiced_on: Some(session.date),
        }
    }

    pub fn removed(session: &PracticeSession) -> Self {
        Self {
            subject: session.subject,
            chapter_name: session.chapter_name.clone(),
            questions: -i64::from(session.questions_solved),
            minutes: -i64::from(session.time_spent),
            practiced_on: None,
        }
    }

    /// The deltas that move a rollup from `before` to `after`. Edits within the same
    /// chapter produce a single net delta; moving chapters produces two.
    pub fn between(before: &PracticeSession, after: &PracticeSession) -> Vec<Self> {
        if before.subject != after.subject || before.chapter_name != after.chapter_name {
            return vec![Self::removed(before), Self::added(after)];
        }
        let delta = Self {
            subject: after.subject,
            chapter_name: after.chapter_name.clone(),
            questions: i64::from(after.questions_solved) - i64::from(before.questions_solved),
            minutes: i64::from(after.time_spent) - i64::from(before.time_spent),
            practiced_on: Some(after.date),
        };
        if delta.questions == 0 && delta.minutes == 0 && before.date == after.date {
            return Vec::new();
        }
        vec![delta]
    }

    pub fn apply(&self, chapter: &mut ChapterProgress) {
        chapter.total_questions = offset(chapter.total_questions, self.questions);
        chapter.total_time = offset(chapter.total_time, self.minutes);
        if let Some(date) = self.practiced_on {
            chapter.last_practiced = chapter.last_practiced.max(Some(date));
        }
    }
}

fn offset(value: u32, delta: i64) -> u32 {
    let next = (i64::from(value) + delta).max(0);
    u32::try_from(next).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ChapterPatch {
    #[serde(default)]
    pub revision_priority: Option<RevisionPriority>,
    #[serde(default)]
    pub mastery_level: Option<MasteryLevel>,
}

impl ChapterPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if *self == ChapterPatch::default() {
            return Err(ValidationError::EmptyPatch);
        }
        Ok(())
    }

    pub fn apply(&self, chapter: &mut ChapterProgress) {
        if let Some(priority) = self.revision_priority {
            chapter.revision_priority = priority;
        }
        if let Some(mastery) = self.mastery_level {
            chapter.mastery_level = mastery;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChapterUpdate {
    pub id: Uuid,
    pub fields: ChapterPatch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewTarget {
    pub target_type: TargetType,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "Physics"))]
    pub subject: SubjectScope,
    pub questions_goal: u32,
    pub time_goal: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl NewTarget {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_storable("questions_goal", Some(self.questions_goal))?;
        require_storable("time_goal", Some(self.time_goal))?;
        require_range(self.start_date, self.end_date)
    }

    pub fn into_target(self, user_id: Uuid, now: DateTime<Utc>) -> Target {
        Target {
            id: Uuid::new_v4(),
            user_id,
            target_type: self.target_type,
            subject: self.subject,
            questions_goal: self.questions_goal,
            time_goal: self.time_goal,
            start_date: self.start_date,
            end_date: self.end_date,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TargetPatch {
    #[serde(default)]
    pub target_type: Option<TargetType>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub subject: Option<SubjectScope>,
    #[serde(default)]
    pub questions_goal: Option<u32>,
    #[serde(default)]
    pub time_goal: Option<u32>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl TargetPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if *self == TargetPatch::default() {
            return Err(ValidationError::EmptyPatch);
        }
        require_storable("questions_goal", self.questions_goal)?;
        require_storable("time_goal", self.time_goal)?;
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            require_range(start, end)?;
        }
        Ok(())
    }

    /// Checks the date range the patch would produce on `current`.
    pub fn validate_against(&self, current: &Target) -> Result<(), ValidationError> {
        let start = self.start_date.unwrap_or(current.start_date);
        let end = self.end_date.unwrap_or(current.end_date);
        require_range(start, end)
    }

    pub fn apply(&self, target: &mut Target) {
        if let Some(kind) = self.target_type {
            target.target_type = kind;
        }
        if let Some(scope) = self.subject {
            target.subject = scope;
        }
        if let Some(goal) = self.questions_goal {
            target.questions_goal = goal;
        }
        if let Some(goal) = self.time_goal {
            target.time_goal = goal;
        }
        if let Some(start) = self.start_date {
            target.start_date = start;
        }
        if let Some(end) = self.end_date {
            target.end_date = end;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetUpdate {
    pub id: Uuid,
    pub fields: TargetPatch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub subject: Option<Subject>,
    pub scheduled_date: NaiveDate,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewTask {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_storable("duration_minutes", Some(self.duration_minutes))
    }

    pub fn into_task(self, user_id: Uuid, now: DateTime<Utc>) -> StudyTask {
        StudyTask {
            id: Uuid::new_v4(),
            user_id,
            title: self.title.trim().to_string(),
            subject: self.subject,
            scheduled_date: self.scheduled_date,
            duration_minutes: self.duration_minutes,
            completed: false,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Subject>))]
    pub subject: Option<Option<Subject>>,
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub notes: Option<Option<String>>,
}

impl TaskPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if *self == TaskPatch::default() {
            return Err(ValidationError::EmptyPatch);
        }
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        require_storable("duration_minutes", self.duration_minutes)
    }

    pub fn apply(&self, task: &mut StudyTask) {
        if let Some(title) = &self.title {
            task.title = title.trim().to_string();
        }
        if let Some(subject) = self.subject {
            task.subject = subject;
        }
        if let Some(date) = self.scheduled_date {
            task.scheduled_date = date;
        }
        if let Some(minutes) = self.duration_minutes {
            task.duration_minutes = minutes;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(notes) = &self.notes {
            task.notes = notes.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskUpdate {
    pub id: Uuid,
    pub fields: TaskPatch,
}

/// Profile fields a signed-in user can change about themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserMetadata {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub exam_goal: Option<String>,
}
