pub mod m202606010001_create_users;
pub mod m202606010002_create_colleges;
pub mod m202606010003_create_students;
pub mod m202606010004_create_events;
pub mod m202606010005_create_registrations;
pub mod m202606010006_create_attendance;
pub mod m202606010007_create_feedback;
