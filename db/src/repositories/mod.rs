pub mod attendance_repository;
pub mod college_repository;
pub mod event_repository;
pub mod feedback_repository;
pub mod registration_repository;
pub mod repository;
pub mod student_repository;

pub use attendance_repository::AttendanceRepository;
pub use college_repository::CollegeRepository;
pub use event_repository::EventRepository;
pub use feedback_repository::FeedbackRepository;
pub use registration_repository::RegistrationRepository;
pub use repository::Repository;
pub use student_repository::StudentRepository;
