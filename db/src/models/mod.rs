pub mod attendance;
pub mod college;
pub mod event;
pub mod feedback;
pub mod registration;
pub mod student;
pub mod user;

pub use attendance::Entity as Attendance;
pub use college::Entity as College;
pub use event::Entity as Event;
pub use feedback::Entity as Feedback;
pub use registration::Entity as Registration;
pub use student::Entity as Student;
pub use user::Entity as User;
