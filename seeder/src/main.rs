use crate::seed::{Seeder, run_seeder};
use crate::seeds::{
    attendance::AttendanceSeeder, college::CollegeSeeder, event::EventSeeder,
    feedback::FeedbackSeeder, registration::RegistrationSeeder, student::StudentSeeder,
    user::UserSeeder,
};
use common::config::Config;

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    let config = Config::init(".env");
    common::logger::init_logger(&config.log_level, &config.log_file);

    let db = db::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    // order matters: later seeds reference earlier rows
    for (seeder, name) in [
        (Box::new(CollegeSeeder) as Box<dyn Seeder>, "College"),
        (Box::new(UserSeeder), "User"),
        (Box::new(StudentSeeder), "Student"),
        (Box::new(EventSeeder), "Event"),
        (Box::new(RegistrationSeeder), "Registration"),
        (Box::new(AttendanceSeeder), "Attendance"),
        (Box::new(FeedbackSeeder), "Feedback"),
    ] {
        run_seeder(&*seeder, name, &db).await;
    }
}
