//! Records mirroring the portal's payloads.

pub mod agenda;
pub mod course;
pub mod document;
pub mod message;
pub mod period;
pub mod planner;
pub mod report;
pub mod result;
pub mod support;
pub mod task;
pub mod user;

pub use agenda::{AgendaHour, AgendaLesson, AgendaMomentAssignment, AgendaMomentInfo};
pub use course::{Course, CourseCondensed, CourseGraphic, DateRange, SkoreWorkYear};
pub use document::{DocumentNode, FileItem, FolderItem, InternetShortcut};
pub use message::{Attachment, FullMessage, MessageChanged, MessageDeletionStatus, ShortMessage};
pub use period::Period;
pub use planner::{
    ApplicableAssignmentType, PlannedElement, PlannedElementAssignmentType, PlannedElementCourse,
    PlannedElementLocation, PlannedElementPeriod, UserCapabilities,
};
pub use report::Report;
pub use result::{
    Component, EvaluationResult, Feedback, FeedbackFull, ResultDetails, ResultGraphic,
};
pub use support::StudentSupportLink;
pub use task::{FutureTask, FutureTaskCourse, FutureTaskDay, FutureTaskItems};
pub use user::{AuthenticatedUser, Group, PersonDescription, SchoolClass, Student, Teacher, User};
