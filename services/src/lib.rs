pub mod attendance_service;
pub mod college_service;
pub mod error;
pub mod event_service;
pub mod feedback_service;
pub mod registration_service;
pub mod report_service;
pub mod student_service;
pub mod user_service;

pub use attendance_service::AttendanceService;
pub use college_service::CollegeService;
pub use error::AppError;
pub use event_service::EventService;
pub use feedback_service::FeedbackService;
pub use registration_service::RegistrationService;
pub use report_service::ReportService;
pub use student_service::StudentService;
pub use user_service::UserService;
