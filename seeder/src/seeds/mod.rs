pub mod attendance;
pub mod college;
pub mod event;
pub mod feedback;
pub mod registration;
pub mod student;
pub mod user;

/// Sample tenants shared across the seeds: (college id, name, domain).
pub const COLLEGES: [(&str, &str, &str); 2] = [
    ("nit", "Northfield Institute of Technology", "northfield.edu"),
    ("svc", "St. Vincent College", "stvincent.edu"),
];

pub const STUDENTS_PER_COLLEGE: usize = 15;
